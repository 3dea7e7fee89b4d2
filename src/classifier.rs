// src/classifier.rs
// ---------------------------------------------------------------------------
// Pipeline de classificação: lê cada puzzle, consulta o motor de previsão e
// separa os registros em lotes de fáceis e difíceis.
// ---------------------------------------------------------------------------

use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use shakmaty::san::San;

use crate::{
    engine::Engine,
    exporter::BatchWriter,
    puzzle::{count_puzzles, iterate_puzzles},
    statistics::{ClassifyResult, ClassifyStatistics},
    utils::{build_pgn, format_size},
    visual::{self, CustomProgressBar},
};

pub struct ClassifierArgs {
    pub engine_path:  String,  // Executável do motor de previsão
    pub weights_path: String,  // Pesos da rede
    pub nodes:        u32,     // Limite de nós por consulta
    pub batch_size:   u64,     // Puzzles por lote de saída
    pub verbose:      bool,    // Exibe o PGN de cada puzzle classificado
}

pub async fn classify_puzzles(
    input: &Path,
    easy_out: &Path,
    hard_out: &Path,
    args: ClassifierArgs,
) -> Result<ClassifyResult> {
    let total = count_puzzles(input)?;
    let size  = format_size(input).unwrap_or_else(|_| "?".into());
    visual::print_run_info(input, &size, total, args.batch_size, args.nodes);

    let mut engine = Engine::new(&args.engine_path, &args.weights_path)
        .await
        .context("inicializar motor de previsão")?;
    info!("motor de previsão inicializado");

    let mut easy  = BatchWriter::new(easy_out, "fáceis", args.batch_size);
    let mut hard  = BatchWriter::new(hard_out, "difíceis", args.batch_size);
    let mut stats = ClassifyStatistics::new();
    let pb        = visual::create_progress(total);

    let run = process_records(input, &mut engine, &mut easy, &mut hard, &mut stats, &pb, &args).await;

    // O motor encerra mesmo quando a leitura falha no meio do arquivo
    engine.quit().await;
    info!("motor de previsão encerrado");
    easy.finish();
    hard.finish();
    pb.finish_with_message("classificação concluída");
    run?;

    Ok(ClassifyResult::new(
        stats,
        easy.batches(),
        easy.base().to_path_buf(),
        hard.batches(),
        hard.base().to_path_buf(),
    ))
}

// Laço principal sobre os registros: valida, consulta, compara e exporta.
// Qualquer erro restrito a um puzzle vira descarte contado; só erros de
// leitura do arquivo de entrada abortam a execução.
async fn process_records(
    input:  &Path,
    engine: &mut Engine,
    easy:   &mut BatchWriter,
    hard:   &mut BatchWriter,
    stats:  &mut ClassifyStatistics,
    pb:     &CustomProgressBar,
    args:   &ClassifierArgs,
) -> Result<()> {
    for record in iterate_puzzles(input)? {
        stats.increment_processed();
        let label = record.label();
        debug!("processando {label}");
        pb.set_message(&label);

        // Triagem do registro
        let fen = match record.validate() {
            Ok(f) => f,
            Err(e) => {
                warn!("{label} ignorado: {e}");
                visual::print_skip(pb, &label, &e.to_string());
                stats.add_skipped(&e.to_string());
                pb.inc(1);
                continue;
            }
        };

        // Consulta o motor; falhas valem só para este registro
        let predicted = match engine.predict(fen, args.nodes).await {
            Ok(Some(uci)) => match uci.to_move(&record.board) {
                Ok(mv) => mv,
                Err(e) => {
                    warn!("{label}: previsão '{uci}' ilegal na posição ({e})");
                    visual::print_skip(pb, &label, "previsão ilegal");
                    stats.add_skipped("previsão ilegal");
                    pb.inc(1);
                    continue;
                }
            },
            Ok(None) => {
                warn!("{label}: motor não devolveu variante principal");
                visual::print_skip(pb, &label, "sem previsão do motor");
                stats.add_skipped("sem previsão do motor");
                pb.inc(1);
                continue;
            }
            Err(e) => {
                warn!("{label}: falha na consulta ao motor: {e}");
                visual::print_skip(pb, &label, "falha do motor");
                stats.add_skipped("falha do motor");
                pb.inc(1);
                continue;
            }
        };

        // validate garante linha principal não vazia
        let Some((solution_san, solution)) = record.solution() else {
            pb.inc(1);
            continue;
        };

        let pgn = build_pgn(&record);
        if *solution == predicted {
            stats.add_easy();
            visual::print_classification_easy(pb, &label);
            if let Err(e) = easy.write(&pgn) {
                warn!("falha exportando {label} para o lote de fáceis: {e}");
            }
        } else {
            let predicted_san = San::from_move(&record.board, &predicted).to_string();
            stats.add_hard();
            visual::print_classification_hard(pb, &label, solution_san, &predicted_san);
            if let Err(e) = hard.write(&pgn) {
                warn!("falha exportando {label} para o lote de difíceis: {e}");
            }
        }

        if args.verbose {
            visual::print_verbose_pgn(pb, &pgn);
        }
        pb.inc(1);
    }

    Ok(())
}
