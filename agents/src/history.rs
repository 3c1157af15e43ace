use crate::config::EngineConfig;
use std::collections::VecDeque;

/// Bounded record of the move encodings played in a game, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveHistory {
    moves: VecDeque<String>,
    capacity: usize,
}

impl MoveHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        MoveHistory {
            moves: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Appends a move, evicting from the oldest end once full.
    pub fn push(&mut self, encoding: impl Into<String>) {
        self.moves.push_back(encoding.into());
        while self.moves.len() > self.capacity {
            self.moves.pop_front();
        }
    }

    /// The last `n` moves (or all of them, if fewer), oldest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &str> {
        self.moves
            .iter()
            .skip(self.moves.len().saturating_sub(n))
            .map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.moves.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }
}

/// Discourages the engine from shuffling the same moves back and forth.
///
/// The penalty only looks at moves actually played in the session, never at
/// positions visited during search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepetitionGuard {
    history: MoveHistory,
    window: usize,
    unit_penalty: i32,
}

impl Default for RepetitionGuard {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl RepetitionGuard {
    pub fn new(config: &EngineConfig) -> Self {
        RepetitionGuard {
            history: MoveHistory::with_capacity(config.history_capacity),
            window: config.repetition_window,
            unit_penalty: config.repetition_penalty,
        }
    }

    pub fn record(&mut self, encoding: impl Into<String>) {
        self.history.push(encoding);
    }

    /// Centipawns charged against `encoding`: the unit penalty times its
    /// occurrences among the most recent moves.
    pub fn penalty(&self, encoding: &str) -> i32 {
        let occurrences = self
            .history
            .recent(self.window)
            .filter(|&played| played == encoding)
            .count();
        self.unit_penalty * occurrences as i32
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_is_bounded_fifo() {
        let mut history = MoveHistory::with_capacity(20);
        for i in 0..25 {
            history.push(format!("m{i}"));
            assert!(history.len() <= 20);
        }
        assert_eq!(history.len(), 20);
        assert_eq!(history.iter().next(), Some("m5"));
        assert_eq!(history.recent(2).collect::<Vec<_>>(), ["m23", "m24"]);
    }

    #[test]
    fn test_recent_with_short_history() {
        let mut history = MoveHistory::with_capacity(20);
        history.push("e2e4");
        assert_eq!(history.recent(6).collect::<Vec<_>>(), ["e2e4"]);
    }

    #[test]
    fn test_penalty_counts_window_only() {
        let mut guard = RepetitionGuard::default();
        for encoding in ["g1f3", "b8c6", "f3g1", "c6b8", "g1f3", "b8c6", "f3g1", "c6b8", "g1f3"] {
            guard.record(encoding);
        }
        // Last six: c6b8 g1f3 b8c6 f3g1 c6b8 g1f3
        assert_eq!(guard.penalty("g1f3"), 200);
        assert_eq!(guard.penalty("c6b8"), 200);
        assert_eq!(guard.penalty("e2e4"), 0);
    }

    #[test]
    fn test_three_repeats_cost_300() {
        let mut guard = RepetitionGuard::default();
        for encoding in ["a1a2", "h8h7", "a1a2", "h8h7", "a1a2", "h8h7"] {
            guard.record(encoding);
        }
        assert_eq!(guard.penalty("a1a2"), 300);

        guard.clear();
        assert_eq!(guard.penalty("a1a2"), 0);
        assert!(guard.history().is_empty());
    }
}
