use anyhow::Result;
use chess_agents::{Engine, EngineConfig, MoveSource, RepetitionGuard};
use chess_core::GamePosition;
use std::io::{self, BufRead, Write};
use tracing::{debug, warn};

pub struct UciEngine {
    engine: Engine,
    position: GamePosition,
    /// Moves of the current game, as sent with `position ... moves`.
    guard: RepetitionGuard,
}

impl UciEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            guard: RepetitionGuard::new(&config),
            engine: Engine::new(config),
            position: GamePosition::new(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout().lock();

        for line in stdin.lock().lines() {
            let line = line?;
            let parts: Vec<&str> = line.split_whitespace().collect();
            let Some(&command) = parts.first() else {
                continue;
            };

            match command {
                "quit" => break,
                _ => {
                    for reply in self.handle(command, &parts) {
                        writeln!(stdout, "{reply}")?;
                    }
                    stdout.flush()?;
                }
            }
        }
        Ok(())
    }

    /// Responds to one command line; the replies are returned rather than
    /// printed.
    pub fn handle(&mut self, command: &str, parts: &[&str]) -> Vec<String> {
        match command {
            "uci" => vec![
                "id name chess".to_string(),
                "id author chess developers".to_string(),
                "uciok".to_string(),
            ],
            "isready" => vec!["readyok".to_string()],
            "ucinewgame" => {
                self.position = GamePosition::new();
                self.guard.clear();
                Vec::new()
            }
            "position" => {
                self.handle_position(parts);
                Vec::new()
            }
            "go" => self.handle_go(parts),
            _ => {
                debug!(command, "ignoring unknown command");
                Vec::new()
            }
        }
    }

    fn handle_position(&mut self, parts: &[&str]) {
        let mut idx = 1;

        let position = match parts.get(idx) {
            Some(&"startpos") => {
                idx += 1;
                GamePosition::new()
            }
            Some(&"fen") => {
                idx += 1;
                let start = idx;
                while idx < parts.len() && parts[idx] != "moves" {
                    idx += 1;
                }
                match GamePosition::from_fen(&parts[start..idx].join(" ")) {
                    Ok(position) => position,
                    Err(e) => {
                        warn!(%e, "ignoring position command");
                        return;
                    }
                }
            }
            _ => return,
        };

        self.position = position;
        self.guard.clear();

        if parts.get(idx) == Some(&"moves") {
            for encoding in &parts[idx + 1..] {
                match self.position.parse_move(encoding) {
                    Ok(mv) => {
                        self.position = self.position.apply(&mv);
                        self.guard.record(mv.encoding());
                    }
                    Err(e) => {
                        warn!(%e, "stopping at bad move in position command");
                        break;
                    }
                }
            }
        }
    }

    fn handle_go(&self, parts: &[&str]) -> Vec<String> {
        let mut depth = self.engine.config().depth;
        if let Some(pos) = parts.iter().position(|&p| p == "depth") {
            if let Some(d) = parts.get(pos + 1).and_then(|d| d.parse::<u8>().ok()) {
                depth = d.max(1);
            }
        }

        let result = self.engine.search(&self.position, depth, &self.guard);
        let mut replies = Vec::new();
        if let (MoveSource::Search, Some(score)) = (result.source, result.score) {
            replies.push(format!(
                "info depth {} score cp {} nodes {}",
                depth, score, result.nodes
            ));
        }
        replies.push(match result.best_move {
            Some(best_move) => format!("bestmove {best_move}"),
            None => "bestmove 0000".to_string(),
        });
        replies
    }
}
