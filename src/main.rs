// src/main.rs
// ---------------------------------------------------------------------------
// CLI simples para classificar a dificuldade de puzzles.
// ---------------------------------------------------------------------------

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

mod classifier;
mod config;
mod engine;
mod exporter;
mod puzzle;
mod sample;
mod statistics;
mod utils;
mod visual;

/// Args CLI - Argumentos da linha de comando para configuração
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    pub input: Option<PathBuf>,                               // PGN de entrada (ausente: gera e usa amostra)
    #[arg(long, default_value = config::DEFAULT_EASY_OUTPUT)]
    pub easy_output: PathBuf,                                 // Base de saída dos puzzles fáceis
    #[arg(long, default_value = config::DEFAULT_HARD_OUTPUT)]
    pub hard_output: PathBuf,                                 // Base de saída dos puzzles difíceis
    #[arg(short, long, default_value = config::DEFAULT_ENGINE_PATH)]
    pub engine: String,                                       // Executável do motor de previsão
    #[arg(short, long, default_value = config::DEFAULT_WEIGHTS_PATH)]
    pub weights: String,                                      // Arquivo de pesos da rede
    #[arg(short, long, default_value_t = config::DEFAULT_BATCH_SIZE)]
    pub batch_size: u64,                                      // Puzzles por arquivo de lote
    #[arg(short, long, default_value_t = config::DEFAULT_NODES)]
    pub nodes: u32,                                           // Nós por consulta ao motor
    #[arg(long)]
    pub report: Option<PathBuf>,                              // Relatório JSON opcional da execução
    #[arg(short, long)]
    pub verbose: bool,                                        // Verbosidade
    #[arg(long, default_value = "info")]
    pub log_level: String,                                    // Nível de logging
}

/// Configura o logger com o nível especificado
fn setup_logger(level:&str){ env_logger::Builder::new().filter_level(level.parse().unwrap_or(log::LevelFilter::Info)).init(); }

/// Ponto de entrada principal do programa
#[tokio::main]
async fn main() -> Result<()> {
    // Parse argumentos e configura logger
    let args = Args::parse();
    setup_logger(&args.log_level);

    visual::print_main_header();

    // Entrada: arquivo do usuário ou amostra gerada na hora
    let (input, sample_mode) = match &args.input {
        Some(path) => (path.clone(), false),
        None => {
            let path = PathBuf::from(config::SAMPLE_INPUT);
            info!("nenhuma entrada fornecida; gerando amostra em {}", path.display());
            sample::write_sample_pgn(&path).context("gerar arquivo de amostra")?;
            (path, true)
        }
    };

    // Verifica disponibilidade do motor e dos pesos antes de começar
    let engine_path = match utils::detect_engine_path(&args.engine) {
        Ok(path) => path,
        Err(e) => {
            visual::print_error("Motor de previsão não encontrado");
            return Err(e);
        }
    };
    utils::ensure_weights_exist(&args.weights)?;
    visual::print_engine_info(&engine_path, &args.weights);

    // Executa o pipeline de classificação
    let cls_args = classifier::ClassifierArgs {
        engine_path,
        weights_path: args.weights.clone(),
        nodes: args.nodes,
        batch_size: args.batch_size,
        verbose: args.verbose,
    };
    let result = classifier::classify_puzzles(&input, &args.easy_output, &args.hard_output, cls_args)
        .await
        .context("erro classificando puzzles")?;

    // Exibe resumo e grava relatório opcional
    visual::print_success("Classificação concluída");
    result.display_summary()?;
    if let Some(report) = &args.report {
        result.write_report(report)?;
        info!("relatório salvo em {}", report.display());
    }
    if sample_mode {
        visual::print_cleanup_hint(&input, &result.easy_base, &result.hard_base);
    }

    info!("puzzles classificados: {}", result.total());
    Ok(())
}
