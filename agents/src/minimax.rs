use crate::{config::EngineConfig, history::RepetitionGuard, search::Engine, Agent};
use chess_core::{GamePosition, Move};

pub struct MinimaxAgent {
    name: String,
    engine: Engine,
    depth: u8,
}

impl Default for MinimaxAgent {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl MinimaxAgent {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_engine(Engine::new(config))
    }

    pub fn with_engine(engine: Engine) -> Self {
        let depth = engine.config().depth;
        MinimaxAgent {
            name: format!("Minimax(depth={})", depth),
            engine,
            depth,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }
}

impl Agent for MinimaxAgent {
    fn best_move(&mut self, position: &GamePosition, history: &RepetitionGuard) -> Option<Move> {
        self.engine.best_move(position, self.depth, history)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
