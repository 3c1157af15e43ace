//! Move ordering for alpha-beta pruning.
//!
//! Likely-strong moves go first so cutoffs happen early: captures by
//! MVV-LVA, then promotions, checks, central destinations and castling.

use chess_core::{GamePosition, Move, Role, Successor};
use std::cmp::Reverse;

const CAPTURE_BASE: i32 = 10_000;
const PROMOTION_BASE: i32 = 2_000;
const CHECK_BONUS: i32 = 1_000;
const CASTLE_BONUS: i32 = 100;
const CENTER_BONUS: i32 = 50;

/// d4, e4, d5, e5.
const CENTER_INDICES: [usize; 4] = [27, 28, 35, 36];

/// Coarse piece values used only for ordering.
fn ordering_value(role: Role) -> i32 {
    match role {
        Role::Pawn => 1,
        Role::Knight | Role::Bishop => 3,
        Role::Rook => 5,
        Role::Queen => 9,
        Role::King => 100,
    }
}

/// A move that shifts its piece exactly two squares along the board index.
///
/// This is a geometric shortcut rather than a rules check: any piece moving
/// two files sideways on a rank qualifies.
pub fn is_castling(mv: &Move) -> bool {
    mv.from_index().abs_diff(mv.to_index()) == 2
}

/// Heuristic priority of a move; higher is searched first.
pub fn move_score(successor: &Successor) -> i32 {
    let mv = &successor.mv;
    let mut score = 0;

    if let Some(victim) = successor.captured {
        score += CAPTURE_BASE + ordering_value(victim) * 10 - ordering_value(successor.role);
    }

    if successor.gives_check() {
        score += CHECK_BONUS;
    }

    if let Some(role) = mv.promotion {
        score += PROMOTION_BASE + ordering_value(role) * 100;
    }

    if CENTER_INDICES.contains(&mv.to_index()) {
        score += CENTER_BONUS;
    }

    if is_castling(mv) {
        score += CASTLE_BONUS;
    }

    score
}

/// Sorts by descending [`move_score`]; equal scores keep their input order.
pub fn order_successors(mut successors: Vec<Successor>) -> Vec<Successor> {
    successors.sort_by_cached_key(|successor| Reverse(move_score(successor)));
    successors
}

/// Orders a subset of the legal moves of `pos`; ties keep the caller's
/// order. Moves that are not legal there are dropped.
pub fn order_moves(pos: &GamePosition, moves: &[Move]) -> Vec<Move> {
    let mut successors = pos.successors();
    successors.retain(|successor| moves.contains(&successor.mv));
    successors.sort_by_key(|successor| moves.iter().position(|mv| *mv == successor.mv));

    order_successors(successors)
        .into_iter()
        .map(|successor| successor.mv)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(fen: &str) -> GamePosition {
        GamePosition::from_fen(fen).unwrap()
    }

    fn successor(pos: &GamePosition, encoding: &str) -> Successor {
        pos.successors()
            .into_iter()
            .find(|successor| successor.mv.to_string() == encoding)
            .unwrap()
    }

    fn encodings(moves: &[Move]) -> Vec<String> {
        moves.iter().map(Move::to_string).collect()
    }

    #[test]
    fn test_single_capture_first() {
        let pos = position("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1");
        let ordered = order_moves(&pos, &pos.legal_moves());
        assert_eq!(ordered[0].to_string(), "e4d5");
        assert_eq!(ordered.len(), pos.legal_moves().len());
    }

    #[test]
    fn test_mvv_lva() {
        // Pawn and queen can both capture; pawn takes queen, queen takes pawn.
        // The queen stays off the e-file so exd5 is not a discovered check.
        let pos = position("4k3/8/8/3q4/3pP3/2Q5/8/4K3 w - - 0 1");
        let pxq = successor(&pos, "e4d5");
        let qxp = successor(&pos, "c3d4");
        assert!(!pxq.gives_check() && !qxp.gives_check());

        assert_eq!(move_score(&pxq), CAPTURE_BASE + 9 * 10 - 1 + CENTER_BONUS);
        assert_eq!(move_score(&qxp), CAPTURE_BASE + 10 - 9 + CENTER_BONUS);
        assert_eq!(order_moves(&pos, &pos.legal_moves())[0], pxq.mv);
    }

    #[test]
    fn test_promotion_scores() {
        let pos = position("8/P6k/8/8/8/8/8/4K3 w - - 0 1");
        assert_eq!(move_score(&successor(&pos, "a7a8q")), PROMOTION_BASE + 900);
        assert_eq!(move_score(&successor(&pos, "a7a8n")), PROMOTION_BASE + 300);
    }

    #[test]
    fn test_check_and_castle_bonus() {
        let pos = position("4k3/8/8/8/8/8/8/4K2R w K - 0 1");
        let castle = successor(&pos, "e1g1");
        assert!(is_castling(&castle.mv));
        assert_eq!(move_score(&castle), CASTLE_BONUS);
        assert_eq!(move_score(&successor(&pos, "h1h8")), CHECK_BONUS);
    }

    #[test]
    fn test_castle_shortcut_is_geometric() {
        // A rook sliding two files also matches.
        assert!(is_castling(&"a1c1".parse().unwrap()));
        assert!(!is_castling(&"e2e4".parse().unwrap()));
        assert!(!is_castling(&"e1f1".parse().unwrap()));
    }

    #[test]
    fn test_order_moves_drops_foreign_moves() {
        let pos = GamePosition::new();
        let moves: Vec<Move> = ["g1f3", "e2e5", "e2e4"]
            .iter()
            .map(|m| m.parse().unwrap())
            .collect();
        assert_eq!(encodings(&order_moves(&pos, &moves)), ["e2e4", "g1f3"]);
    }

    #[test]
    fn test_stable_on_ties() {
        let pos = GamePosition::new();
        let legal = pos.legal_moves();
        let ordered = order_moves(&pos, &legal);

        // Only d4 and e4 score at the start; everything else keeps its order.
        let quiet_in: Vec<String> = encodings(&legal)
            .into_iter()
            .filter(|m| m != "d2d4" && m != "e2e4")
            .collect();
        let quiet_out: Vec<String> = encodings(&ordered[2..]);
        assert_eq!(quiet_in, quiet_out);
        assert!(encodings(&ordered[..2]).contains(&"e2e4".to_string()));
    }
}
