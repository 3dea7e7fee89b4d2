// src/engine.rs
// ---------------------------------------------------------------------------
// Wrapper UCI do motor de previsão (Lc0 carregado com pesos de rede treinada
// para prever o próximo lance humano).
// ---------------------------------------------------------------------------

use std::process::Stdio;

use anyhow::{anyhow, Context, Result};
use log::trace;
use shakmaty::uci::UciMove;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    process::{Child, ChildStdin, ChildStdout, Command},
    time::{timeout, Duration},
};

use crate::config::ENGINE_TIMEOUT_SECS;

const ENGINE_TIMEOUT: Duration = Duration::from_secs(ENGINE_TIMEOUT_SECS);

/// Motor de previsão UCI. Uma consulta por vez; o processo é reutilizado
/// para todos os puzzles e morto no Drop caso `quit` não tenha sido chamado.
pub struct Engine {
    child:  Child,
    stdin:  ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl Drop for Engine { fn drop(&mut self) { let _ = self.child.start_kill(); } }

impl Engine {
    /// Inicializa o motor: handshake "uci"/"uciok" e configuração dos pesos.
    pub async fn new(path: &str, weights: &str) -> Result<Self> {
        let mut child = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("iniciar motor em {path}"))?;
        let stdin  = child.stdin.take().unwrap();
        let stdout = BufReader::new(child.stdout.take().unwrap());

        let mut engine = Engine { child, stdin, stdout };
        engine.cmd("uci").await?;
        engine.wait_for("uciok").await?;
        engine.cmd(&format!("setoption name WeightsFile value {weights}")).await?;
        engine.wait_ready().await?;
        Ok(engine)
    }

    /// Envia comando UCI
    async fn cmd(&mut self, c: &str) -> Result<()> {
        trace!("motor < {c}");
        self.stdin.write_all(c.as_bytes()).await?;
        self.stdin.write_all(b"\n").await?;
        self.stdin.flush().await?;
        Ok(())
    }

    /// Lê linhas até encontrar `expected`, com timeout por linha
    async fn wait_for(&mut self, expected: &str) -> Result<()> {
        let mut line = String::new();
        loop {
            line.clear();
            let n = timeout(ENGINE_TIMEOUT, self.stdout.read_line(&mut line))
                .await
                .map_err(|_| anyhow!("timeout esperando '{expected}' do motor"))??;
            if n == 0 {
                return Err(anyhow!("motor encerrou antes de responder '{expected}'"));
            }
            trace!("motor > {}", line.trim_end());
            if line.trim() == expected { return Ok(()); }
        }
    }

    /// Envia "isready" e espera por "readyok"; essencial após setoption
    async fn wait_ready(&mut self) -> Result<()> {
        self.cmd("isready").await?;
        self.wait_for("readyok").await
    }

    /// Pede o lance previsto para a posição dada, limitado a `nodes` nós.
    /// O token "bestmove" é a resposta definitiva; a cabeça da última PV
    /// serve de reserva. "bestmove (none)" vira None.
    pub async fn predict(&mut self, fen: &str, nodes: u32) -> Result<Option<UciMove>> {
        self.cmd(&format!("position fen {fen}")).await?;
        self.cmd(&format!("go nodes {nodes}")).await?;

        let mut pv_head: Option<UciMove> = None;
        let mut line = String::new();
        loop {
            line.clear();
            let n = timeout(ENGINE_TIMEOUT, self.stdout.read_line(&mut line))
                .await
                .map_err(|_| anyhow!("timeout na previsão para {fen}"))??;
            if n == 0 {
                return Err(anyhow!("motor encerrou durante a previsão"));
            }
            let trimmed = line.trim();
            trace!("motor > {trimmed}");
            if trimmed.starts_with("info ") && trimmed.contains(" pv ") {
                if let Some(mv) = parse_pv_head(trimmed) { pv_head = Some(mv); }
            } else if trimmed.starts_with("bestmove") {
                return Ok(parse_bestmove(trimmed).or(pv_head));
            }
        }
    }

    /// Encerra o motor educadamente e espera o processo terminar
    pub async fn quit(&mut self) {
        let _ = self.cmd("quit").await;
        let _ = self.child.wait().await;
    }
}

/// Extrai o lance do token "bestmove"; "(none)" e linhas malformadas viram None
fn parse_bestmove(line: &str) -> Option<UciMove> {
    let tok = line.split_whitespace().nth(1)?;
    if tok == "(none)" { return None; }
    UciMove::from_ascii(tok.as_bytes()).ok()
}

/// Primeiro lance da variante principal de uma linha "info ... pv ..."
fn parse_pv_head(line: &str) -> Option<UciMove> {
    let mut parts = line.split_whitespace();
    while let Some(tok) = parts.next() {
        if tok == "pv" {
            return parts.next().and_then(|u| UciMove::from_ascii(u.as_bytes()).ok());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bestmove_simples() {
        let mv = parse_bestmove("bestmove e2e4 ponder e7e5").unwrap();
        assert_eq!(mv.to_string(), "e2e4");
    }

    #[test]
    fn bestmove_none() {
        assert!(parse_bestmove("bestmove (none)").is_none());
        assert!(parse_bestmove("bestmove").is_none());
        assert!(parse_bestmove("bestmove ????").is_none());
    }

    #[test]
    fn bestmove_promocao() {
        let mv = parse_bestmove("bestmove e7e8q").unwrap();
        assert_eq!(mv.to_string(), "e7e8q");
    }

    #[test]
    fn pv_head_de_linha_info() {
        let line = "info depth 1 seldepth 2 time 4 nodes 1 score cp 12 pv d2d4 g8f6";
        let mv = parse_pv_head(line).unwrap();
        assert_eq!(mv.to_string(), "d2d4");
    }

    #[test]
    fn pv_head_sem_pv() {
        assert!(parse_pv_head("info depth 1 nodes 1 score cp 12").is_none());
    }
}
