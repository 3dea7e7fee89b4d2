// Configurações centralizadas para o classificador de puzzles de xadrez

// Configurações padrão para argumentos da linha de comando
pub const DEFAULT_BATCH_SIZE: u64 = 25;            // Puzzles por arquivo de lote
pub const DEFAULT_NODES: u32 = 1;                  // Nós por consulta (a rede de previsão responde no primeiro nó)
pub const DEFAULT_ENGINE_PATH: &str = "lc0";       // Executável do motor de previsão
pub const DEFAULT_WEIGHTS_PATH: &str = "maia-1100.pb"; // Arquivo de pesos da rede

// Nomes base dos arquivos de saída (os lotes acrescentam _batch_N.pgn)
pub const DEFAULT_EASY_OUTPUT: &str = "easy_puzzles_output.pgn";
pub const DEFAULT_HARD_OUTPUT: &str = "hard_puzzles_output.pgn";

// Arquivo de amostra gerado quando nenhuma entrada é fornecida
pub const SAMPLE_INPUT: &str = "sample_puzzles_to_classify.pgn";

// Timeout de leitura da saída do motor, em segundos
pub const ENGINE_TIMEOUT_SECS: u64 = 10;
