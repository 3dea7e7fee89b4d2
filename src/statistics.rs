// src/statistics.rs
// Coleta e gerencia estatísticas sobre a classificação de puzzles

// Biblioteca padrão
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;

// Bibliotecas externas
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Clone, Serialize, Default)]
pub struct ClassifyStatistics {
    // Dados de tempo
    #[serde(skip)]
    start_time: Option<Instant>,
    pub elapsed_secs: u64,

    // Contadores principais
    pub processed: u64,
    pub easy: u64,
    pub hard: u64,
    pub skipped: u64,

    // Motivos pelos quais puzzles foram ignorados
    pub skip_reasons: HashMap<String, u64>,
}

impl ClassifyStatistics {
    pub fn new() -> Self {
        let mut stats = Self::default();
        stats.start_time = Some(Instant::now());
        stats
    }

    pub fn increment_processed(&mut self) {
        self.processed += 1;
    }

    pub fn add_easy(&mut self) {
        self.easy += 1;
    }

    pub fn add_hard(&mut self) {
        self.hard += 1;
    }

    pub fn add_skipped(&mut self, reason: &str) {
        self.skipped += 1;
        *self.skip_reasons.entry(reason.to_string()).or_insert(0) += 1;
    }

    pub fn get_elapsed_time(&self) -> u64 {
        let current = self.start_time.map(|t| t.elapsed().as_secs()).unwrap_or(0);
        self.elapsed_secs + current
    }

    pub fn get_average_time_per_puzzle(&self) -> f64 {
        if self.processed == 0 {
            0.0
        } else {
            self.get_elapsed_time() as f64 / self.processed as f64
        }
    }
}

/// Resultado consolidado de uma execução de classificação
#[derive(Debug)]
pub struct ClassifyResult {
    pub processed: u64,
    pub easy: u64,
    pub hard: u64,
    pub skipped: u64,
    pub elapsed_time: u64,
    pub avg_time_per_puzzle: f64,
    pub easy_batches: u64,
    pub hard_batches: u64,
    pub easy_base: PathBuf,
    pub hard_base: PathBuf,
    pub stats: ClassifyStatistics,
}

impl ClassifyResult {
    pub fn new(
        stats: ClassifyStatistics,
        easy_batches: u64,
        easy_base: PathBuf,
        hard_batches: u64,
        hard_base: PathBuf,
    ) -> Self {
        ClassifyResult {
            processed: stats.processed,
            easy: stats.easy,
            hard: stats.hard,
            skipped: stats.skipped,
            elapsed_time: stats.get_elapsed_time(),
            avg_time_per_puzzle: stats.get_average_time_per_puzzle(),
            easy_batches,
            hard_batches,
            easy_base,
            hard_base,
            stats,
        }
    }

    pub fn total(&self) -> u64 {
        self.processed
    }

    pub fn display_summary(&self) -> Result<()> {
        crate::visual::render_end_statistics(
            self.processed,
            self.easy,
            self.hard,
            self.skipped,
            self.elapsed_time,
            self.avg_time_per_puzzle,
            &self.stats.skip_reasons,
            self.easy_batches,
            &self.easy_base,
            self.hard_batches,
            &self.hard_base,
        )?;
        Ok(())
    }

    /// Grava o relatório JSON da execução
    pub fn write_report(&self, path: &Path) -> Result<()> {
        let data = json!({
            "elapsed_time": self.elapsed_time,
            "avg_time_per_puzzle": self.avg_time_per_puzzle,
            "easy_batches": self.easy_batches,
            "hard_batches": self.hard_batches,
            "easy_base": self.easy_base.display().to_string(),
            "hard_base": self.hard_base.display().to_string(),
            "stats": &self.stats,
        });
        let file = File::create(path).context("Falha ao criar arquivo de relatório")?;
        serde_json::to_writer_pretty(file, &data).context("Falha ao gravar relatório")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contadores_agregam() {
        let mut stats = ClassifyStatistics::new();
        stats.increment_processed();
        stats.add_easy();
        stats.increment_processed();
        stats.add_hard();
        stats.increment_processed();
        stats.add_skipped("header FEN ausente");
        stats.increment_processed();
        stats.add_skipped("header FEN ausente");

        assert_eq!(stats.processed, 4);
        assert_eq!(stats.easy, 1);
        assert_eq!(stats.hard, 1);
        assert_eq!(stats.skipped, 2);
        assert_eq!(stats.skip_reasons.get("header FEN ausente"), Some(&2));
    }

    #[test]
    fn media_sem_puzzles_processados() {
        let stats = ClassifyStatistics::new();
        assert_eq!(stats.get_average_time_per_puzzle(), 0.0);
    }

    #[test]
    fn resultado_copia_contadores() {
        let mut stats = ClassifyStatistics::new();
        stats.increment_processed();
        stats.add_easy();

        let result = ClassifyResult::new(
            stats,
            1,
            PathBuf::from("easy_puzzles_output"),
            0,
            PathBuf::from("hard_puzzles_output"),
        );
        assert_eq!(result.total(), 1);
        assert_eq!(result.easy, 1);
        assert_eq!(result.hard, 0);
        assert_eq!(result.easy_batches, 1);
    }

    #[test]
    fn relatorio_serializa() {
        let mut stats = ClassifyStatistics::new();
        stats.increment_processed();
        stats.add_hard();
        let result = ClassifyResult::new(
            stats,
            0,
            PathBuf::from("easy"),
            1,
            PathBuf::from("hard"),
        );

        let path = std::env::temp_dir()
            .join(format!("puzzle_classifier_report_{}.json", std::process::id()));
        result.write_report(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["stats"]["hard"], 1);
        assert_eq!(parsed["hard_batches"], 1);
        let _ = std::fs::remove_file(&path);
    }
}
