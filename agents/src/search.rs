use crate::book::OpeningBook;
use crate::config::EngineConfig;
use crate::evaluation::Evaluator;
use crate::history::RepetitionGuard;
use crate::ordering::order_successors;
use chess_core::{Color, GamePosition, Move};
use tracing::{debug, info};

/// Wider than any reachable score, including checkmate.
pub const INFINITY: i32 = 1_000_000;

/// Where a chosen move came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveSource {
    Book,
    Search,
}

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    /// Score of the chosen move after the repetition adjustment. `None` for
    /// book moves and when there is no legal move.
    pub score: Option<i32>,
    pub nodes: u64,
    pub source: MoveSource,
}

/// Fixed-depth minimax with alpha-beta pruning over absolute scores
/// (positive favours White), with a capture/check extension at the leaves.
pub struct Searcher<'a> {
    evaluator: &'a Evaluator,
    quiescence: bool,
    quiescence_depth: u8,
    nodes: u64,
}

impl<'a> Searcher<'a> {
    pub fn new(evaluator: &'a Evaluator, config: &EngineConfig) -> Self {
        Searcher {
            evaluator,
            quiescence: config.quiescence,
            quiescence_depth: config.quiescence_depth,
            nodes: 0,
        }
    }

    /// Nodes visited so far, quiescence nodes included.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Minimax value of `pos` searched `depth` plies deep.
    ///
    /// `maximizing` is true when White is to move. Sibling moves stop being
    /// explored as soon as `beta <= alpha`.
    pub fn minimax(
        &mut self,
        pos: &GamePosition,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> i32 {
        self.nodes += 1;

        if depth == 0 || pos.is_game_over() {
            return self.leaf(pos, alpha, beta);
        }

        let successors = order_successors(pos.successors());

        if maximizing {
            let mut best = -INFINITY;
            for successor in &successors {
                let score = self.minimax(&successor.position, depth - 1, alpha, beta, false);
                best = best.max(score);
                alpha = alpha.max(score);
                if beta <= alpha {
                    break;
                }
            }
            best
        } else {
            let mut best = INFINITY;
            for successor in &successors {
                let score = self.minimax(&successor.position, depth - 1, alpha, beta, true);
                best = best.min(score);
                beta = beta.min(score);
                if beta <= alpha {
                    break;
                }
            }
            best
        }
    }

    /// Capture/check search from the side to move's point of view.
    ///
    /// Scores and bounds here are relative: positive is good for whoever is
    /// to move. `q_depth` counts the plies already added; at the cap the
    /// static evaluation is returned as is.
    pub fn quiesce(&mut self, pos: &GamePosition, mut alpha: i32, beta: i32, q_depth: u8) -> i32 {
        self.nodes += 1;

        let stand_pat = self.evaluator.relative_score(pos);
        if q_depth >= self.quiescence_depth {
            return stand_pat;
        }
        if stand_pat >= beta {
            return beta;
        }
        alpha = alpha.max(stand_pat);

        let mut tactical = pos.successors();
        tactical.retain(|successor| successor.is_capture() || successor.gives_check());

        for successor in order_successors(tactical) {
            let score = -self.quiesce(&successor.position, -beta, -alpha, q_depth + 1);
            if score >= beta {
                return beta;
            }
            alpha = alpha.max(score);
        }

        alpha
    }

    fn leaf(&mut self, pos: &GamePosition, alpha: i32, beta: i32) -> i32 {
        if !self.quiescence {
            return self.evaluator.score(pos);
        }
        match pos.side_to_move() {
            Color::White => self.quiesce(pos, alpha, beta, 0),
            Color::Black => -self.quiesce(pos, -beta, -alpha, 0),
        }
    }
}

/// Plain minimax without pruning or quiescence, scored by `evaluator` at
/// the leaves. Exponentially slower than [`Searcher::minimax`]; useful to
/// check that pruning never changes a result.
pub fn minimax_exhaustive(evaluator: &Evaluator, pos: &GamePosition, depth: u8) -> i32 {
    if depth == 0 || pos.is_game_over() {
        return evaluator.score(pos);
    }

    let scores = pos
        .successors()
        .into_iter()
        .map(|successor| minimax_exhaustive(evaluator, &successor.position, depth - 1));

    match pos.side_to_move() {
        Color::White => scores.max(),
        Color::Black => scores.min(),
    }
    .unwrap_or_else(|| evaluator.score(pos))
}

/// Move selection: opening book first, then a root search over every legal
/// move with the repetition penalty applied.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    evaluator: Evaluator,
    book: OpeningBook,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_book(config, OpeningBook::standard())
    }

    pub fn with_book(config: EngineConfig, book: OpeningBook) -> Self {
        Engine {
            evaluator: Evaluator::new(&config),
            config,
            book,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    pub fn book(&self) -> &OpeningBook {
        &self.book
    }

    /// The move judged best for the side to move, or `None` without legal moves.
    pub fn best_move(
        &self,
        pos: &GamePosition,
        depth: u8,
        guard: &RepetitionGuard,
    ) -> Option<Move> {
        self.search(pos, depth, guard).best_move
    }

    pub fn search(&self, pos: &GamePosition, depth: u8, guard: &RepetitionGuard) -> SearchResult {
        let successors = pos.successors();
        if successors.is_empty() {
            return SearchResult {
                best_move: None,
                score: None,
                nodes: 0,
                source: MoveSource::Search,
            };
        }

        if pos.fullmove_number() <= self.config.book_max_fullmove {
            if let Some(book_move) = self.book.probe(pos) {
                info!(%book_move, "using opening book move");
                return SearchResult {
                    best_move: Some(book_move),
                    score: None,
                    nodes: 0,
                    source: MoveSource::Book,
                };
            }
        }

        let white_to_move = pos.side_to_move() == Color::White;
        let mut searcher = Searcher::new(&self.evaluator, &self.config);

        let mut candidates: Vec<(i32, Move)> = successors
            .iter()
            .map(|successor| {
                let raw = searcher.minimax(
                    &successor.position,
                    depth.saturating_sub(1),
                    -INFINITY,
                    INFINITY,
                    !white_to_move,
                );
                let encoding = successor.mv.encoding();
                let penalty = guard.penalty(&encoding);
                let adjusted = if white_to_move {
                    raw - penalty
                } else {
                    raw + penalty
                };
                debug!(mv = %encoding, raw, penalty, adjusted, "scored root move");
                (adjusted, successor.mv)
            })
            .collect();

        // Stable sorts: ties stay in the rules engine's enumeration order.
        if white_to_move {
            candidates.sort_by_key(|&(score, _)| std::cmp::Reverse(score));
        } else {
            candidates.sort_by_key(|&(score, _)| score);
        }

        let (score, best_move) = candidates
            .first()
            .copied()
            .unwrap_or((0, successors[0].mv));

        debug!(%best_move, score, nodes = searcher.nodes(), depth, "search finished");

        SearchResult {
            best_move: Some(best_move),
            score: Some(score),
            nodes: searcher.nodes(),
            source: MoveSource::Search,
        }
    }
}
