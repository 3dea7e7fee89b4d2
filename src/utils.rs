// src/utils.rs
// ---------------------------------------------------------------------------
// Utilitários de PGN e de arquivos.
// ---------------------------------------------------------------------------

use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::{anyhow, Context, Result};
use shakmaty::{Color, Position};

use crate::puzzle::PuzzleRecord;

// ---------------------------------------------------------------------------
// Build PGN - reconstrói o texto PGN de um registro classificado
// ---------------------------------------------------------------------------
/// Reconstrói o PGN a partir dos headers ordenados e da linha principal.
/// A numeração começa no contador de lances completos do FEN, com "N..."
/// quando as pretas iniciam.
pub fn build_pgn(record: &PuzzleRecord) -> String {
    // Cabeçalhos PGN na ordem original
    let mut pgn = String::new();
    for (k, v) in &record.headers {
        pgn.push_str(&format!("[{} \"{}\"]\n", k, v));
    }
    pgn.push('\n');

    // Linha principal com numeração a partir da posição do puzzle
    let init = record.board.turn();
    let start_num = record.board.fullmoves().get();
    for (i, (san, _)) in record.moves.iter().enumerate() {
        if i == 0 {
            pgn.push_str(&format!("{}{} ", start_num, if init == Color::White { "." } else { "..." }));
        } else if (init == Color::White && i % 2 == 0) || (init == Color::Black && i % 2 == 1) {
            let offset = (i as u32 + if init == Color::Black { 1 } else { 0 }) / 2;
            pgn.push_str(&format!("{}. ", start_num + offset));
        }
        pgn.push_str(san);
        pgn.push(' ');
    }

    // Token de resultado fecha o registro
    pgn.push_str(record.result_token());
    pgn
}

// ---------------------------------------------------------------------------
// I/O helpers - formatação e verificação de arquivos
// ---------------------------------------------------------------------------
/// Formata tamanho de arquivo em B, KB ou MB
pub fn format_size(path: &Path) -> Result<String> {
    let b = fs::metadata(path)?.len();
    Ok(if b < 1024 { format!("{b} B") }
       else if b < 1_048_576 { format!("{:.2} KB", b as f64 / 1024.0) }
       else { format!("{:.2} MB", b as f64 / 1_048_576.0) })
}

/// Garante que um diretório exista, criando-o se necessário
pub fn ensure_dir_exists(dir: &Path) -> Result<()> {
    if dir.exists() { return Ok(()); }
    fs::create_dir_all(dir).with_context(|| format!("criar {}", dir.display()))
}

/// Verifica o executável do motor: caminho explícito ou disponível no PATH
pub fn detect_engine_path(engine: &str) -> Result<String> {
    let local = PathBuf::from(engine);
    if local.exists() { return Ok(local.to_string_lossy().into()); }
    if Command::new(engine).arg("--help").output().is_ok() { return Ok(engine.into()); }
    Err(anyhow!("motor não encontrado em '{engine}' (nem local, nem no PATH)"))
}

/// Verifica que o arquivo de pesos da rede existe antes de subir o motor
pub fn ensure_weights_exist(weights: &str) -> Result<()> {
    if Path::new(weights).exists() { return Ok(()); }
    Err(anyhow!("arquivo de pesos não encontrado em '{weights}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle;

    fn first_record(name: &str, pgn: &[u8]) -> PuzzleRecord {
        // Reaproveita o iterador via arquivo temporário por teste
        let path = std::env::temp_dir()
            .join(format!("puzzle_classifier_utils_{}_{}.pgn", name, std::process::id()));
        std::fs::write(&path, pgn).unwrap();
        let rec = puzzle::iterate_puzzles(&path).unwrap().next().unwrap();
        let _ = std::fs::remove_file(&path);
        rec
    }

    #[test]
    fn reconstroi_puzzle_das_pretas() {
        let rec = first_record("pretas", b"[Event \"T\"]\n[Result \"*\"]\n[FEN \"r2q3r/ppp2k2/5np1/3p4/6b1/5P2/PP2Q1PP/RNB1R2K b - - 0 1\"]\n[SetUp \"1\"]\n\n1... Qd6 *\n\n");
        let pgn = build_pgn(&rec);
        assert!(pgn.starts_with("[Event \"T\"]\n[Result \"*\"]\n[FEN \"r2q3r/"));
        assert!(pgn.ends_with("\n1... Qd6 *"), "linha de lances inesperada: {pgn}");
    }

    #[test]
    fn reconstroi_numeracao_do_fen() {
        // Fullmove 6 no FEN: a numeração deve retomar em "6."
        let rec = first_record("fullmove", b"[Event \"T\"]\n[FEN \"rnbqkb1r/1p2pppp/p2p1n2/8/3NP3/2N5/PPP2PPP/R1BQKB1R w KQkq - 0 6\"]\n[SetUp \"1\"]\n\n6. Be3 e5 7. Nb3 *\n\n");
        let pgn = build_pgn(&rec);
        assert!(pgn.ends_with("\n6. Be3 e5 7. Nb3 *"), "linha de lances inesperada: {pgn}");
    }

    #[test]
    fn numeracao_continuada_das_pretas() {
        let rec = first_record("continuada", b"[Event \"T\"]\n[Result \"1-0\"]\n[FEN \"r2q3r/ppp2k2/5np1/3p4/6b1/5P2/PP2Q1PP/RNB1R2K b - - 0 3\"]\n[SetUp \"1\"]\n\n3... Qd6 4. Na3 Kg7 *\n\n");
        let pgn = build_pgn(&rec);
        assert!(pgn.ends_with("\n3... Qd6 4. Na3 Kg7 1-0"), "linha de lances inesperada: {pgn}");
    }

    #[test]
    fn tamanho_formatado() {
        let path = std::env::temp_dir()
            .join(format!("puzzle_classifier_size_{}.bin", std::process::id()));
        std::fs::write(&path, vec![0u8; 512]).unwrap();
        assert_eq!(format_size(&path).unwrap(), "512 B");
        std::fs::write(&path, vec![0u8; 2048]).unwrap();
        assert_eq!(format_size(&path).unwrap(), "2.00 KB");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn motor_inexistente_rejeitado() {
        assert!(detect_engine_path("/caminho/que/nao/existe/lc0").is_err());
    }
}
