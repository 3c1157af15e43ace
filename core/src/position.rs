use crate::error::{CoreError, CoreResult};
use crate::types::{CastlingSide, Color, Move, Piece, Role, Square};
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, EnPassantMode, Move as RulesMove, Position};

/// Well-known positions used by the CLI and the tests.
pub mod positions {
    pub const STARTING: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
    pub const KIWIPETE: &str =
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
}

/// A legal move together with the metadata the engine orders by and the
/// position it leads to.
#[derive(Debug, Clone)]
pub struct Successor {
    pub mv: Move,
    /// The piece that moves (the king, for castling).
    pub role: Role,
    /// The piece taken, including the pawn taken en passant.
    pub captured: Option<Role>,
    pub position: GamePosition,
}

impl Successor {
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    pub fn gives_check(&self) -> bool {
        self.position.is_check()
    }
}

/// A chess position owned by the rules engine.
///
/// Positions are values: [`GamePosition::apply`] returns the successor and
/// leaves `self` untouched, so a search can branch from the same parent
/// without undo bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct GamePosition {
    inner: Chess,
}

impl GamePosition {
    /// The standard starting position.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fen(fen: &str) -> CoreResult<Self> {
        let invalid = |reason: String| CoreError::InvalidFen {
            fen: fen.to_string(),
            reason,
        };

        let parsed: Fen = fen.trim().parse().map_err(|e| invalid(format!("{e}")))?;
        let inner: Chess = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|e| invalid(format!("{e}")))?;

        Ok(GamePosition { inner })
    }

    /// FEN of the position: board, side to move, castling rights, legal
    /// en-passant target and both move counters.
    pub fn canonical_key(&self) -> String {
        Fen::from_position(self.inner.clone(), EnPassantMode::Legal).to_string()
    }

    /// Legal moves in the rules engine's enumeration order.
    pub fn legal_moves(&self) -> Vec<Move> {
        self.inner
            .legal_moves()
            .iter()
            .filter_map(Move::from_rules)
            .collect()
    }

    /// Every legal move with its resulting position, in enumeration order.
    pub fn successors(&self) -> Vec<Successor> {
        self.inner
            .legal_moves()
            .iter()
            .filter_map(|rules_move| {
                let mv = Move::from_rules(rules_move)?;
                let mut inner = self.inner.clone();
                inner.play_unchecked(rules_move);
                Some(Successor {
                    mv,
                    role: rules_move.role(),
                    captured: rules_move.capture(),
                    position: GamePosition { inner },
                })
            })
            .collect()
    }

    pub fn legal_move_count(&self) -> usize {
        self.inner.legal_moves().len()
    }

    pub fn is_legal(&self, mv: &Move) -> bool {
        self.find(mv).is_some()
    }

    /// Parses a move encoding and checks it against the legal moves.
    pub fn parse_move(&self, encoding: &str) -> CoreResult<Move> {
        let mv: Move = encoding.parse()?;
        if self.is_legal(&mv) {
            Ok(mv)
        } else {
            Err(CoreError::IllegalMove {
                encoding: encoding.to_string(),
            })
        }
    }

    pub fn try_apply(&self, mv: &Move) -> CoreResult<GamePosition> {
        let rules_move = self.find(mv).ok_or_else(|| CoreError::IllegalMove {
            encoding: mv.to_string(),
        })?;

        let mut inner = self.inner.clone();
        inner.play_unchecked(&rules_move);
        Ok(GamePosition { inner })
    }

    /// Returns the position after `mv`.
    ///
    /// # Panics
    ///
    /// Panics if `mv` is not legal here. Callers only pass moves taken from
    /// [`GamePosition::legal_moves`] of this same position.
    pub fn apply(&self, mv: &Move) -> GamePosition {
        match self.try_apply(mv) {
            Ok(next) => next,
            Err(e) => panic!("rules contract violated in {}: {e}", self.canonical_key()),
        }
    }

    pub fn is_check(&self) -> bool {
        self.inner.is_check()
    }

    pub fn is_checkmate(&self) -> bool {
        self.inner.is_checkmate()
    }

    pub fn is_stalemate(&self) -> bool {
        self.inner.is_stalemate()
    }

    pub fn is_insufficient_material(&self) -> bool {
        self.inner.is_insufficient_material()
    }

    pub fn is_game_over(&self) -> bool {
        self.is_checkmate() || self.is_stalemate() || self.is_insufficient_material()
    }

    /// True for ordinary captures and en passant.
    pub fn is_capture(&self, mv: &Move) -> bool {
        self.find(mv).is_some_and(|m| m.is_capture())
    }

    pub fn gives_check(&self, mv: &Move) -> bool {
        match self.find(mv) {
            Some(rules_move) => {
                let mut next = self.inner.clone();
                next.play_unchecked(&rules_move);
                next.is_check()
            }
            None => false,
        }
    }

    pub fn fullmove_number(&self) -> u32 {
        self.inner.fullmoves().get()
    }

    pub fn side_to_move(&self) -> Color {
        self.inner.turn()
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.inner.board().piece_at(square)
    }

    pub fn role_at(&self, square: Square) -> Option<Role> {
        self.piece_at(square).map(|piece| piece.role)
    }

    pub fn king(&self, color: Color) -> Option<Square> {
        self.inner.board().king_of(color)
    }

    /// Occupied squares with their pieces, a1 first.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        let board = self.inner.board();
        board
            .occupied()
            .into_iter()
            .filter_map(move |square| board.piece_at(square).map(|piece| (square, piece)))
    }

    pub fn occupied_count(&self) -> usize {
        self.inner.board().occupied().into_iter().count()
    }

    pub fn has_castling_right(&self, color: Color, side: CastlingSide) -> bool {
        self.inner.castles().has(color, side)
    }

    pub fn has_any_castling_rights(&self, color: Color) -> bool {
        self.has_castling_right(color, CastlingSide::KingSide)
            || self.has_castling_right(color, CastlingSide::QueenSide)
    }

    /// The same placement with the other side to move (a null move).
    ///
    /// Returns `None` when the side to move is in check, since the swapped
    /// position would let the opponent capture the king.
    pub fn with_turn_swapped(&self) -> Option<GamePosition> {
        self.inner
            .clone()
            .swap_turn()
            .ok()
            .map(|inner| GamePosition { inner })
    }

    /// PGN-style result tag: `1-0`, `0-1`, `1/2-1/2`, or `*` while in play.
    pub fn result(&self) -> &'static str {
        if self.is_checkmate() {
            match self.side_to_move() {
                Color::White => "0-1",
                Color::Black => "1-0",
            }
        } else if self.is_stalemate() || self.is_insufficient_material() {
            "1/2-1/2"
        } else {
            "*"
        }
    }

    fn find(&self, mv: &Move) -> Option<RulesMove> {
        self.inner
            .legal_moves()
            .into_iter()
            .find(|m| Move::from_rules(m).as_ref() == Some(mv))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_position() {
        let pos = GamePosition::new();
        assert_eq!(pos.canonical_key(), positions::STARTING);
        assert_eq!(pos.legal_moves().len(), 20);
        assert_eq!(pos.fullmove_number(), 1);
        assert_eq!(pos.side_to_move(), Color::White);
        assert_eq!(pos.occupied_count(), 32);
        assert!(!pos.is_game_over());
        assert_eq!(pos.result(), "*");
    }

    #[test]
    fn test_apply_does_not_mutate_parent() {
        let pos = GamePosition::new();
        let next = pos.apply(&"e2e4".parse().unwrap());

        assert_eq!(pos.canonical_key(), positions::STARTING);
        assert_eq!(
            next.canonical_key(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
        );
        assert_eq!(next.side_to_move(), Color::Black);
    }

    #[test]
    fn test_parse_move_distinguishes_malformed_from_illegal() {
        let pos = GamePosition::new();
        assert!(matches!(
            pos.parse_move("e2e5"),
            Err(CoreError::IllegalMove { .. })
        ));
        assert!(matches!(
            pos.parse_move("zz"),
            Err(CoreError::MalformedMove { .. })
        ));
        assert!(pos.parse_move("g1f3").is_ok());
    }

    #[test]
    fn test_castling_is_king_step() {
        let pos = GamePosition::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let encodings: Vec<String> = pos.legal_moves().iter().map(Move::to_string).collect();
        assert!(encodings.contains(&"e1g1".to_string()));
        assert!(encodings.contains(&"e1c1".to_string()));

        let castled = pos.apply(&"e1g1".parse().unwrap());
        assert_eq!(castled.role_at(Square::G1), Some(Role::King));
        assert_eq!(castled.role_at(Square::F1), Some(Role::Rook));
        assert!(!castled.has_any_castling_rights(Color::White));
        assert!(castled.has_any_castling_rights(Color::Black));
    }

    #[test]
    fn test_capture_and_check_queries() {
        let pos = GamePosition::from_fen("4k3/8/8/3p4/4P3/8/8/4K2R w K - 0 1").unwrap();
        assert!(pos.is_capture(&"e4d5".parse().unwrap()));
        assert!(!pos.is_capture(&"e4e5".parse().unwrap()));
        assert!(pos.gives_check(&"h1h8".parse().unwrap()));
        assert!(!pos.gives_check(&"h1h7".parse().unwrap()));
    }

    #[test]
    fn test_en_passant_counts_as_capture() {
        let pos =
            GamePosition::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").unwrap();
        assert!(pos.is_capture(&"e5d6".parse().unwrap()));
    }

    #[test]
    fn test_terminal_states() {
        let mate = GamePosition::from_fen(
            "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3",
        )
        .unwrap();
        assert!(mate.is_checkmate());
        assert!(mate.is_game_over());
        assert_eq!(mate.result(), "0-1");
        assert!(mate.with_turn_swapped().is_none());

        let stalemate = GamePosition::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(stalemate.is_stalemate());
        assert_eq!(stalemate.result(), "1/2-1/2");

        let bare = GamePosition::from_fen("8/8/8/4k3/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(bare.is_insufficient_material());
    }

    #[test]
    fn test_successors_match_legal_moves() {
        let pos = GamePosition::from_fen(positions::KIWIPETE).unwrap();
        let successors = pos.successors();
        let legal = pos.legal_moves();
        assert_eq!(successors.len(), 48);
        assert_eq!(successors.iter().map(|s| s.mv).collect::<Vec<_>>(), legal);

        for successor in &successors {
            assert_eq!(successor.is_capture(), pos.is_capture(&successor.mv));
            assert_eq!(successor.gives_check(), pos.gives_check(&successor.mv));
            assert_eq!(
                successor.position.canonical_key(),
                pos.apply(&successor.mv).canonical_key()
            );
        }
    }

    #[test]
    fn test_invalid_fen() {
        assert!(matches!(
            GamePosition::from_fen("not a fen"),
            Err(CoreError::InvalidFen { .. })
        ));
    }
}
