// src/exporter.rs
// Exporta puzzles classificados em lotes rotativos de arquivos PGN

// Biblioteca padrão
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

// Bibliotecas externas
use anyhow::{Context, Result};
use log::{debug, info};

use crate::utils::ensure_dir_exists;

/// Caminho de um lote: `{base}_batch_{n}.pgn`
pub fn batch_path(base: &Path, n: u64) -> PathBuf {
    PathBuf::from(format!("{}_batch_{}.pgn", base.display(), n))
}

/// Escritor de lotes de uma classe de puzzle ("fácil" ou "difícil").
/// O primeiro arquivo só é criado quando o primeiro puzzle da classe chega;
/// ao atingir a capacidade, o lote corrente é fechado e o próximo aberto.
pub struct BatchWriter {
    base:       PathBuf,      // Caminho base sem extensão
    label:      String,       // Rótulo da classe para logs
    batch_size: u64,          // Capacidade de cada lote
    file:       Option<File>, // Lote corrente (None até o primeiro write)
    batch_num:  u64,          // Número do lote corrente (1-based)
    in_batch:   u64,          // Puzzles escritos no lote corrente
    written:    u64,          // Puzzles escritos no total
}

impl BatchWriter {
    pub fn new(output: &Path, label: &str, batch_size: u64) -> Self {
        // Base = caminho de saída sem a extensão final
        let base = output.with_extension("");
        BatchWriter {
            base,
            label: label.to_string(),
            batch_size,
            file: None,
            batch_num: 0,
            in_batch: 0,
            written: 0,
        }
    }

    /// Fecha o lote corrente (se houver) e abre o próximo.
    /// Uma falha de abertura deixa o stream vazio; a próxima escrita tenta
    /// de novo com um número de lote novo, como convém a uma saída
    /// best-effort.
    fn rotate(&mut self) -> Result<()> {
        if let Some(_old) = self.file.take() {
            info!("lote de {} fechado: {}", self.label, batch_path(&self.base, self.batch_num).display());
        }
        self.batch_num += 1;
        self.in_batch = 0;

        let path = batch_path(&self.base, self.batch_num);
        if let Some(p) = path.parent() {
            if !p.as_os_str().is_empty() { ensure_dir_exists(p)?; }
        }
        let f = File::create(&path)
            .with_context(|| format!("criar lote de {} em {}", self.label, path.display()))?;
        info!("novo lote de {} aberto: {}", self.label, path.display());
        self.file = Some(f);
        Ok(())
    }

    /// Escreve um puzzle no lote corrente, rotacionando quando necessário
    pub fn write(&mut self, pgn: &str) -> Result<()> {
        if self.file.is_none() || self.in_batch >= self.batch_size {
            self.rotate()?;
        }
        // rotate garante Some em caso de sucesso
        if let Some(f) = self.file.as_mut() {
            writeln!(f, "{}", pgn).context("escrever puzzle no lote")?;
            writeln!(f).context("escrever separador no lote")?;
            self.in_batch += 1;
            self.written += 1;
            debug!("puzzle escrito no lote {} de {} ({}/{})", self.batch_num, self.label, self.in_batch, self.batch_size);
        }
        Ok(())
    }

    /// Fecha o lote corrente e loga o encerramento
    pub fn finish(&mut self) {
        if self.file.take().is_some() {
            info!("lote final de {} fechado: {}", self.label, batch_path(&self.base, self.batch_num).display());
        }
    }

    /// Número de lotes abertos até agora
    pub fn batches(&self) -> u64 { self.batch_num }

    /// Total de puzzles escritos
    pub fn written(&self) -> u64 { self.written }

    /// Caminho base dos lotes desta classe
    pub fn base(&self) -> &Path { &self.base }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_base(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("puzzle_classifier_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir.join("easy_output.pgn")
    }

    #[test]
    fn nome_do_lote() {
        let p = batch_path(Path::new("saida/easy_output"), 3);
        assert_eq!(p, PathBuf::from("saida/easy_output_batch_3.pgn"));
    }

    #[test]
    fn base_remove_extensao() {
        let w = BatchWriter::new(Path::new("dir/easy_output.pgn"), "fáceis", 25);
        assert_eq!(w.base(), Path::new("dir/easy_output"));
    }

    #[test]
    fn rotaciona_ao_encher_o_lote() {
        let out = temp_base("rotacao");
        let mut w = BatchWriter::new(&out, "fáceis", 2);

        for i in 0..5 {
            w.write(&format!("[Event \"P{i}\"]\n\n1. e4 *")).unwrap();
        }
        w.finish();

        assert_eq!(w.batches(), 3);
        assert_eq!(w.written(), 5);

        // Dois lotes cheios e um com o resto
        let b1 = fs::read_to_string(batch_path(w.base(), 1)).unwrap();
        let b3 = fs::read_to_string(batch_path(w.base(), 3)).unwrap();
        assert_eq!(b1.matches("[Event").count(), 2);
        assert_eq!(b3.matches("[Event").count(), 1);
        // Separador em branco após cada registro
        assert!(b3.ends_with("*\n\n"));
    }

    #[test]
    fn sem_arquivo_antes_da_primeira_escrita() {
        let out = temp_base("preguicoso");
        let w = BatchWriter::new(&out, "difíceis", 25);
        assert_eq!(w.batches(), 0);
        assert!(!batch_path(w.base(), 1).exists());
    }
}
