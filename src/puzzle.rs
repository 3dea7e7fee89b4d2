// src/puzzle.rs
// ---------------------------------------------------------------------------
// Leitura de registros de puzzle do PGN: um jogo por registro, posição
// inicial derivada do cabeçalho FEN e lances da linha principal.
// ---------------------------------------------------------------------------

use std::{
    collections::VecDeque,
    fs::File,
    io::BufReader,
    path::Path,
};

use anyhow::{anyhow, Context, Result};
use indexmap::IndexMap;
use log::{trace, warn};
use pgn_reader::{BufferedReader, RawHeader, SanPlus, Skip, Visitor};
use shakmaty::{fen::Fen, CastlingMode, Chess, Move, Position};

// ---------------------------------------------------------------------------
// Contador rápido de registros - implementação do Visitor para contar jogos
// ---------------------------------------------------------------------------
struct RecordCounter { n: usize }

impl Visitor for RecordCounter {
    type Result = ();
    fn begin_game(&mut self) { self.n += 1; if self.n % 1000 == 0 { trace!("… lendo puzzle #{}", self.n); } }
    fn header(&mut self, _: &[u8], _: RawHeader<'_>) {}
    fn san(&mut self, _: SanPlus) {}
    fn begin_variation(&mut self) -> Skip { Skip(true) }
    fn end_variation(&mut self) {}
    fn end_game(&mut self) -> Self::Result {}
}

/// Conta o número total de puzzles em um arquivo PGN
pub fn count_puzzles(path: &Path) -> Result<u64> {
    let f = File::open(path).context("abrir PGN")?;
    let mut rdr = BufferedReader::new(BufReader::new(f));
    let mut c = RecordCounter { n: 0 };
    while rdr.read_game(&mut c)? != None {}
    Ok(c.n as u64)
}

// ---------------------------------------------------------------------------
// PuzzleRecord & iterate_puzzles - um registro completo por jogo do PGN
// ---------------------------------------------------------------------------
/// Registro de um puzzle lido do arquivo PGN
#[derive(Debug, Clone)]
pub struct PuzzleRecord {
    pub index:   u32,                       // Índice 1-based do puzzle no arquivo
    pub headers: IndexMap<String, String>,  // Headers na ordem original
    pub fen:     Option<String>,            // Valor do header FEN, se presente
    pub board:   Chess,                     // Posição inicial do puzzle
    pub moves:   Vec<(String, Move)>,       // Linha principal: (SAN, lance)
    invalid_fen: bool,                      // FEN presente mas não parseável
}

impl PuzzleRecord {
    /// Rótulo curto para logs, no formato "puzzle #N (Event: ...)"
    pub fn label(&self) -> String {
        let event = self.headers.get("Event").map(String::as_str).unwrap_or("N/A");
        format!("puzzle #{} (Event: {})", self.index, event)
    }

    /// Valida o registro e devolve o FEN da posição inicial.
    /// As condições seguem a triagem de entrada: puzzles sem posição
    /// definida ou sem lance de solução não são classificáveis.
    pub fn validate(&self) -> Result<&str> {
        let setup = self.headers.iter()
            .find_map(|(k, v)| k.eq_ignore_ascii_case("setup").then(|| v.as_str()));
        let fen = match &self.fen {
            None if setup == Some("1") => return Err(anyhow!("SetUp \"1\" sem header FEN")),
            None => return Err(anyhow!("header FEN ausente")),
            Some(f) => f.as_str(),
        };
        if self.invalid_fen {
            return Err(anyhow!("FEN inválido: {fen}"));
        }
        if self.moves.is_empty() {
            return Err(anyhow!("sem lance de solução na linha principal"));
        }
        Ok(fen)
    }

    /// Lance de solução: o primeiro da linha principal
    pub fn solution(&self) -> Option<&(String, Move)> { self.moves.first() }

    /// Token de resultado para reconstrução do PGN
    pub fn result_token(&self) -> &str {
        self.headers.iter()
            .find_map(|(k, v)| k.eq_ignore_ascii_case("result").then(|| v.as_str()))
            .unwrap_or("*")
    }
}

// Visitor que monta um PuzzleRecord por jogo
struct RecordVisitor {
    idx:     u32,                           // Índice do registro em construção
    headers: IndexMap<String, String>,      // Headers coletados
    fen:     Option<String>,                // Header FEN bruto
    start:   Chess,                         // Posição inicial (FEN ou startpos)
    cursor:  Chess,                         // Posição corrente durante a leitura
    moves:   Vec<(String, Move)>,           // Lances convertidos
    invalid_fen: bool,                      // FEN não parseou
    broken:  bool,                          // SAN ilegal: descarta o resto da linha
}

impl RecordVisitor {
    fn new(idx: u32) -> Self {
        Self {
            idx,
            headers: IndexMap::new(),
            fen: None,
            start: Chess::default(),
            cursor: Chess::default(),
            moves: Vec::new(),
            invalid_fen: false,
            broken: false,
        }
    }
}

impl Visitor for RecordVisitor {
    type Result = PuzzleRecord;

    fn begin_game(&mut self) {}

    // Coleta headers preservando a ordem; captura o FEN para a posição inicial
    fn header(&mut self, n: &[u8], v: RawHeader<'_>) {
        if let (Ok(k), Ok(val)) = (std::str::from_utf8(n), std::str::from_utf8(v.as_bytes())) {
            let val = val.trim_matches('"').to_string();
            if k.eq_ignore_ascii_case("fen") { self.fen = Some(val.clone()); }
            self.headers.insert(k.into(), val);
        }
    }

    // Com os headers completos, inicializa o tabuleiro a partir do FEN
    fn end_headers(&mut self) -> Skip {
        if let Some(fen) = &self.fen {
            match fen.parse::<Fen>().ok()
                .and_then(|f| f.into_position(CastlingMode::Standard).ok())
            {
                Some(pos) => { self.start = pos; }
                None => { self.invalid_fen = true; }
            }
        }
        self.cursor = self.start.clone();
        Skip(false)
    }

    // Converte cada lance da linha principal sobre a posição corrente
    fn san(&mut self, sp: SanPlus) {
        if self.broken { return; }
        let san_text = sp.to_string();
        match sp.san.to_move(&self.cursor) {
            Ok(mv) => {
                self.moves.push((san_text, mv.clone()));
                self.cursor.play_unchecked(&mv);
            }
            Err(e) => {
                warn!("puzzle #{}: lance ilegal '{}' ({}), linha descartada daqui em diante", self.idx, san_text, e);
                self.broken = true;
            }
        }
    }

    fn begin_variation(&mut self) -> Skip { Skip(true) }
    fn end_variation(&mut self) {}

    fn end_game(&mut self) -> Self::Result {
        PuzzleRecord {
            index:   self.idx,
            headers: std::mem::take(&mut self.headers),
            fen:     self.fen.take(),
            board:   std::mem::replace(&mut self.start, Chess::default()),
            moves:   std::mem::take(&mut self.moves),
            invalid_fen: std::mem::take(&mut self.invalid_fen),
        }
    }
}

/// Iterador preguiçoso de registros do PGN - um puzzle por vez
pub fn iterate_puzzles(path: &Path) -> Result<impl Iterator<Item = PuzzleRecord>> {
    let file = File::open(path).with_context(|| format!("abrir {}", path.display()))?;
    let reader = BufferedReader::new(BufReader::new(file));

    // Estado do iterador
    struct St<R: std::io::Read> {
        rdr: BufferedReader<R>,             // Leitor do arquivo
        q:   VecDeque<PuzzleRecord>,        // Registro pronto para emissão
        idx: u32,                           // Índice do registro atual
    }

    let mut st = St { rdr: reader, q: VecDeque::new(), idx: 0 };

    Ok(std::iter::from_fn(move || loop {
        // Se tem registro na fila, retorna
        if let Some(r) = st.q.pop_front() { return Some(r); }

        // Senão, lê o próximo jogo
        st.idx += 1;
        let mut v = RecordVisitor::new(st.idx);
        match st.rdr.read_game(&mut v) {
            Ok(Some(rec)) => { st.q.push_back(rec); continue; } // Registro lido
            Ok(None) => return None,                            // Fim do arquivo
            Err(e) => { warn!("erro lendo puzzle {}: {}", st.idx, e); continue; } // Erro: pula
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::Color;

    const SAMPLE: &[u8] = br#"[Event "Teste 1"]
[Site "?"]
[Result "*"]
[FEN "r2q3r/ppp2k2/5np1/3p4/6b1/5P2/PP2Q1PP/RNB1R2K b - - 0 1"]
[SetUp "1"]

1... Qd6 *

[Event "Sem posicao"]
[Result "*"]

1. e4 e5 *

[Event "Setup sem FEN"]
[SetUp "1"]
[Result "*"]

1. d4 *

[Event "Sem lances"]
[FEN "8/8/8/8/k7/P7/K7/8 w - - 0 1"]
[SetUp "1"]
[Result "*"]

*

"#;

    fn read_all(bytes: &[u8]) -> Vec<PuzzleRecord> {
        let mut rdr = BufferedReader::new(bytes);
        let mut out = Vec::new();
        let mut idx = 0u32;
        loop {
            idx += 1;
            let mut v = RecordVisitor::new(idx);
            match rdr.read_game(&mut v).unwrap() {
                Some(rec) => out.push(rec),
                None => break,
            }
        }
        out
    }

    #[test]
    fn registro_completo_com_fen() {
        let recs = read_all(SAMPLE);
        assert_eq!(recs.len(), 4);

        let r = &recs[0];
        assert_eq!(r.index, 1);
        assert_eq!(r.headers.get("Event").unwrap(), "Teste 1");
        assert_eq!(r.board.turn(), Color::Black);
        assert_eq!(r.moves.len(), 1);
        assert_eq!(r.moves[0].0, "Qd6");
        let fen = r.validate().unwrap();
        assert!(fen.starts_with("r2q3r/"));
    }

    #[test]
    fn ordem_dos_headers_preservada() {
        let recs = read_all(SAMPLE);
        let keys: Vec<&str> = recs[0].headers.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Event", "Site", "Result", "FEN", "SetUp"]);
    }

    #[test]
    fn fen_ausente_rejeitado() {
        let recs = read_all(SAMPLE);
        let err = recs[1].validate().unwrap_err().to_string();
        assert!(err.contains("FEN ausente"), "mensagem inesperada: {err}");
    }

    #[test]
    fn setup_sem_fen_rejeitado() {
        let recs = read_all(SAMPLE);
        let err = recs[2].validate().unwrap_err().to_string();
        assert!(err.contains("SetUp"), "mensagem inesperada: {err}");
    }

    #[test]
    fn linha_principal_vazia_rejeitada() {
        let recs = read_all(SAMPLE);
        let err = recs[3].validate().unwrap_err().to_string();
        assert!(err.contains("solução"), "mensagem inesperada: {err}");
    }

    #[test]
    fn fen_invalido_rejeitado() {
        let pgn = b"[Event \"FEN quebrado\"]\n[FEN \"isto nao e um fen\"]\n[SetUp \"1\"]\n\n*\n\n";
        let recs = read_all(pgn);
        let err = recs[0].validate().unwrap_err().to_string();
        assert!(err.contains("FEN inv"), "mensagem inesperada: {err}");
    }

    #[test]
    fn rotulo_para_logs() {
        let recs = read_all(SAMPLE);
        assert_eq!(recs[0].label(), "puzzle #1 (Event: Teste 1)");
    }

    #[test]
    fn lances_convertidos_a_partir_do_fen() {
        // Sem o FEN aplicado antes dos lances, Qd6 seria ilegal a partir da
        // posição inicial; a conversão correta prova o end_headers
        let recs = read_all(SAMPLE);
        let (san, mv) = recs[0].solution().unwrap();
        assert_eq!(san, "Qd6");
        let uci = shakmaty::uci::UciMove::from_move(mv, CastlingMode::Standard);
        assert_eq!(uci.to_string(), "d8d6");
    }
}
