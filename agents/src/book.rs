use chess_core::{GamePosition, Move};
use std::collections::HashMap;

/// Main lines after 1.e4, 1.d4 and 1.Nf3, keyed by FEN.
const STANDARD_LINES: &[(&str, &[&str])] = &[
    (
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        &["e2e4", "d2d4", "g1f3", "c2c4"],
    ),
    (
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1",
        &["e7e5", "c7c5", "e7e6", "c7c6"],
    ),
    (
        "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2",
        &["g1f3", "f1c4", "b1c3"],
    ),
    (
        "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 0 3",
        &["f1c4", "b1c3", "d2d3"],
    ),
    (
        "rnbqkbnr/pppppppp/8/8/3P4/8/PPP1PPPP/RNBQKBNR b KQkq - 0 1",
        &["d7d5", "g8f6", "e7e6", "c7c5"],
    ),
    (
        "rnbqkb1r/pppppppp/5n2/8/3P4/8/PPP1PPPP/RNBQKBNR w KQkq - 0 2",
        &["c2c4", "b1c3", "g1f3"],
    ),
    (
        "rnbqkbnr/pppppppp/8/8/8/5N2/PPPPPPPP/RNBQKB1R b KQkq - 0 1",
        &["d7d5", "g8f6", "c7c5", "e7e6"],
    ),
];

/// Static map from position to candidate moves in preference order.
///
/// Keys are compared on the first four FEN fields (placement, side to move,
/// castling rights, en-passant square); the move counters are ignored.
#[derive(Debug, Clone)]
pub struct OpeningBook {
    entries: HashMap<String, Vec<String>>,
}

impl Default for OpeningBook {
    fn default() -> Self {
        Self::standard()
    }
}

impl OpeningBook {
    pub fn empty() -> Self {
        OpeningBook {
            entries: HashMap::new(),
        }
    }

    pub fn standard() -> Self {
        let mut book = Self::empty();
        for (fen, moves) in STANDARD_LINES {
            book.insert(fen, moves.iter().map(|m| m.to_string()).collect());
        }
        book
    }

    /// Adds or replaces the entry for `key`.
    pub fn insert(&mut self, key: &str, moves: Vec<String>) {
        self.entries.insert(normalize(key), moves);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, key: &str) -> Option<&[String]> {
        self.entries.get(&normalize(key)).map(Vec::as_slice)
    }

    /// First book move that is legal in `pos`, if any.
    ///
    /// Unparseable or illegal entries are skipped.
    pub fn probe(&self, pos: &GamePosition) -> Option<Move> {
        self.lookup(&pos.canonical_key())?
            .iter()
            .find_map(|encoding| pos.parse_move(encoding).ok())
    }
}

fn normalize(key: &str) -> String {
    key.split_whitespace().take(4).collect::<Vec<_>>().join(" ")
}
