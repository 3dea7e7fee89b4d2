// src/sample.rs
// Gera um arquivo PGN de amostra quando nenhuma entrada é fornecida

// Biblioteca padrão
use std::fs;
use std::path::Path;

// Bibliotecas externas
use anyhow::{Context, Result};
use chrono::Local;
use log::info;

// Posições de amostra: (evento, FEN, linha de lances).
// A primeira e a terceira têm como solução o lance mais natural da posição;
// a segunda usa a posição inicial, onde redes de previsão tendem a preferir
// outro primeiro lance.
const SAMPLE_PUZZLES: &[(&str, &str, &str)] = &[
    (
        "Amostra 1",
        "r2q3r/ppp2k2/5np1/3p4/6b1/5P2/PP2Q1PP/RNB1R2K b - - 0 1",
        "1... Qd6 *",
    ),
    (
        "Amostra 2 (posição inicial)",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "1. d4 *",
    ),
    (
        "Amostra 3 (igual à 1)",
        "r2q3r/ppp2k2/5np1/3p4/6b1/5P2/PP2Q1PP/RNB1R2K b - - 0 1",
        "1... Qd6 *",
    ),
    (
        "Amostra 4 (Najdorf, 6º lance das brancas)",
        "rnbqkb1r/1p2pppp/p2p1n2/8/3NP3/2N5/PPP2PPP/R1BQKB1R w KQkq - 0 6",
        "6. Be3 *",
    ),
    (
        "Amostra 5 (final de rei e peão)",
        "8/8/8/8/k7/P7/K7/8 w - - 0 1",
        "1. Kb2 *",
    ),
];

/// Escreve o arquivo de amostra com cinco puzzles prontos para classificar
pub fn write_sample_pgn(path: &Path) -> Result<()> {
    let date = Local::now().format("%Y.%m.%d").to_string();

    let mut pgn = String::new();
    for (event, fen, movetext) in SAMPLE_PUZZLES {
        pgn.push_str(&format!("[Event \"{}\"]\n", event));
        pgn.push_str("[Site \"Amostra\"]\n");
        pgn.push_str(&format!("[Date \"{}\"]\n", date));
        pgn.push_str("[Round \"?\"]\n");
        pgn.push_str("[White \"?\"]\n");
        pgn.push_str("[Black \"?\"]\n");
        pgn.push_str("[Result \"*\"]\n");
        pgn.push_str(&format!("[FEN \"{}\"]\n", fen));
        pgn.push_str("[SetUp \"1\"]\n");
        pgn.push('\n');
        pgn.push_str(movetext);
        pgn.push_str("\n\n");
    }

    fs::write(path, pgn).with_context(|| format!("gravar amostra em {}", path.display()))?;
    info!("amostra com {} puzzles gravada em {}", SAMPLE_PUZZLES.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::{count_puzzles, iterate_puzzles};

    #[test]
    fn amostra_e_legivel_e_valida() {
        let path = std::env::temp_dir()
            .join(format!("puzzle_classifier_sample_{}.pgn", std::process::id()));
        write_sample_pgn(&path).unwrap();

        assert_eq!(count_puzzles(&path).unwrap(), 5);

        let records: Vec<_> = iterate_puzzles(&path).unwrap().collect();
        assert_eq!(records.len(), 5);
        for rec in &records {
            rec.validate().unwrap();
            assert_eq!(rec.moves.len(), 1);
        }
        assert_eq!(records[0].solution().unwrap().0, "Qd6");
        assert_eq!(records[4].solution().unwrap().0, "Kb2");

        let _ = std::fs::remove_file(&path);
    }
}
