//src/visual.rs
// Interface visual e componentes de progresso para o terminal

// Biblioteca padrão
use std::collections::HashMap;
use std::path::Path;

// Bibliotecas externas
use anyhow::Result;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

// Mensagens coloridas
pub fn console_yellow(message: &str) {
    println!("{}", message.yellow());
}

pub fn print_error(message: &str) {
    println!("{}", message.red().bold());
}

pub fn print_success(message: &str) {
    println!("{}", message.green().bold());
}

// Estrutura para barra de progresso personalizada
pub struct CustomProgressBar {
    progress_bar: ProgressBar,
}

impl CustomProgressBar {
    pub fn new(total: u64) -> Self {
        let pb = ProgressBar::new(total);
        pb.set_style(ProgressStyle::default_bar()
            .template("{spinner:.blue} {msg} [{elapsed_precise}] {wide_bar:.cyan/blue} {pos}/{len} ({eta})")
            .unwrap()
            .progress_chars("#>-"));

        CustomProgressBar { progress_bar: pb }
    }

    pub fn inc(&self, delta: u64) {
        self.progress_bar.inc(delta);
    }

    pub fn set_message(&self, msg: &str) {
        self.progress_bar.set_message(msg.to_string());
    }

    pub fn finish_with_message(&self, msg: &str) {
        self.progress_bar.finish_with_message(msg.to_string());
    }

    pub fn log(&self, msg: &str) {
        self.progress_bar.println(msg);
    }
}

// Cria uma barra de progresso para o total de puzzles
pub fn create_progress(total: u64) -> CustomProgressBar {
    CustomProgressBar::new(total)
}

// Imprime o cabeçalho principal
pub fn print_main_header() {
    println!("\n{}", "♟️  Classificador de Dificuldade de Puzzles".blue().bold());
    println!("{}", "═".repeat(50).cyan());
}

// Imprime informações do motor de previsão
pub fn print_engine_info(engine_path: &str, weights_path: &str) {
    println!("{} {}", "Motor de previsão:".blue().bold(), engine_path);
    println!("{} {}", "Pesos da rede:    ".blue().bold(), weights_path);
}

// Informações iniciais da execução
pub fn print_run_info(input: &Path, file_size: &str, total: u64, batch_size: u64, nodes: u32) {
    println!("{}", "Iniciando classificação de dificuldade dos puzzles...".cyan().bold());
    println!("Arquivo de entrada: {} ({})", input.display().to_string().magenta(), file_size.cyan());
    println!("Total de puzzles a classificar: {}", total.to_string().cyan());
    println!("Puzzles por lote de saída: {}", batch_size.to_string().cyan());
    println!("Nós por consulta ao motor: {}\n", nodes.to_string().cyan());
}

// Classificação fácil: previsão do motor coincide com a solução
pub fn print_classification_easy(progress_bar: &CustomProgressBar, label: &str) {
    progress_bar.log(&format!("{}: {}", label, "Fácil".green().bold()));
}

// Classificação difícil: mostra solução e lance previsto em SAN
pub fn print_classification_hard(progress_bar: &CustomProgressBar, label: &str, solution: &str, predicted: &str) {
    progress_bar.log(&format!(
        "{}: {} (solução: {}, previsto: {})",
        label,
        "Difícil".red().bold(),
        solution.cyan(),
        predicted.yellow(),
    ));
}

// Puzzle ignorado e o motivo
pub fn print_skip(progress_bar: &CustomProgressBar, label: &str, reason: &str) {
    progress_bar.log(&format!("{}: {} ({})", label, "Ignorado".yellow().bold(), reason));
}

// Exibe o PGN completo em modo verbose
pub fn print_verbose_pgn(progress_bar: &CustomProgressBar, pgn_text: &str) {
    progress_bar.log(pgn_text);
    progress_bar.log("");
}

// Dica de limpeza dos arquivos gerados em modo amostra
pub fn print_cleanup_hint(input: &Path, easy_base: &Path, hard_base: &Path) {
    console_yellow(&format!(
        "\nPara limpar os arquivos de teste desta execução, apague {} e os lotes iniciados por '{}_batch_' e '{}_batch_'.",
        input.display(),
        easy_base.display(),
        hard_base.display(),
    ));
}

// Resumo final da execução
pub fn render_end_statistics(
    processed: u64,
    easy: u64,
    hard: u64,
    skipped: u64,
    total_time: u64,
    average_time_per_puzzle: f64,
    skip_reasons: &HashMap<String, u64>,
    easy_batches: u64,
    easy_base: &Path,
    hard_batches: u64,
    hard_base: &Path,
) -> Result<()> {
    println!("\nResumo da classificação:");
    println!("- Puzzles processados: {}", processed);
    println!("- Puzzles fáceis: {}", easy);
    println!("- Puzzles difíceis: {}", hard);
    println!("- Puzzles ignorados: {}", skipped);

    let hours = total_time / 3600;
    let minutes = (total_time % 3600) / 60;
    let seconds = total_time % 60;

    println!("- Tempo total: {:02}h {:02}m {:02}s", hours, minutes, seconds);
    println!("- Tempo médio por puzzle: {:.2}s", average_time_per_puzzle);

    if !skip_reasons.is_empty() {
        println!("- Motivos de descarte:");
        for (reason, count) in skip_reasons {
            println!("  - {}: {}", reason, count);
        }
    }

    if easy_batches > 0 {
        println!("- Fáceis gravados em {} lote(s) (base: {}_batch_N.pgn)", easy_batches, easy_base.display());
    }
    if hard_batches > 0 {
        println!("- Difíceis gravados em {} lote(s) (base: {}_batch_N.pgn)", hard_batches, hard_base.display());
    }

    Ok(())
}
