use crate::config::{EngineConfig, MobilityMode};
use chess_core::{Color, GamePosition, Role, Square};

/// Score of a checkmated position, from the winner's side.
pub const CHECKMATE_SCORE: i32 = 100_000;

/// Positions with at most this many pieces on the board use the endgame tables.
const ENDGAME_PIECE_COUNT: usize = 12;
/// Opening principles apply up to and including this full move.
const OPENING_LAST_MOVE: u32 = 15;
/// A king in the centre is penalised up to and including this full move.
const KING_SAFETY_LAST_MOVE: u32 = 20;

const MOBILITY_WEIGHT: i32 = 2;
const DEVELOPED_MINOR_BONUS: i32 = 30;
const CASTLED_BONUS: i32 = 50;
const CASTLING_RIGHTS_LOST_BONUS: i32 = 20;
const EARLY_QUEEN_PENALTY: i32 = 20;
const CENTRAL_KING_PENALTY: i32 = 50;
const CENTER_OCCUPANCY_BONUS: i32 = 20;
const DOUBLED_PAWN_PENALTY: i32 = 20;
const UNDEVELOPED_PIECE_PENALTY: i32 = 10;

const CENTER: [Square; 4] = [Square::D4, Square::D5, Square::E4, Square::E5];

const WIDE_CENTER: [Square; 8] = [
    Square::D4,
    Square::D5,
    Square::E4,
    Square::E5,
    Square::C4,
    Square::C5,
    Square::F4,
    Square::F5,
];

const HOME_SQUARES: [(Square, Role); 12] = [
    (Square::A1, Role::Rook),
    (Square::H1, Role::Rook),
    (Square::B1, Role::Knight),
    (Square::G1, Role::Knight),
    (Square::C1, Role::Bishop),
    (Square::F1, Role::Bishop),
    (Square::A8, Role::Rook),
    (Square::H8, Role::Rook),
    (Square::B8, Role::Knight),
    (Square::G8, Role::Knight),
    (Square::C8, Role::Bishop),
    (Square::F8, Role::Bishop),
];

/// Material value in centipawns.
pub fn piece_value(role: Role) -> i32 {
    match role {
        Role::Pawn => 100,
        Role::Knight => 320,
        Role::Bishop => 330,
        Role::Rook => 500,
        Role::Queen => 900,
        Role::King => 20_000,
    }
}

fn sign(color: Color) -> i32 {
    match color {
        Color::White => 1,
        Color::Black => -1,
    }
}

/// Static evaluation of a position.
///
/// Scores are absolute: positive favours White, negative favours Black.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Evaluator {
    mirror_tables: bool,
    mobility: MobilityMode,
}

impl Evaluator {
    pub fn new(config: &EngineConfig) -> Self {
        Evaluator {
            mirror_tables: config.mirror_tables,
            mobility: config.mobility,
        }
    }

    pub fn score(&self, pos: &GamePosition) -> i32 {
        if pos.is_checkmate() {
            return -sign(pos.side_to_move()) * CHECKMATE_SCORE;
        }
        if pos.is_stalemate() || pos.is_insufficient_material() {
            return 0;
        }

        let mut score = self.material_and_placement(pos);

        if pos.fullmove_number() <= OPENING_LAST_MOVE {
            score += opening_principles(pos);
        }
        score += self.piece_activity(pos);
        score += king_safety(pos);
        score += center_control(pos);
        score += pawn_structure(pos);
        score += development(pos);

        score
    }

    /// The same score seen from the side to move (positive is good for it).
    pub fn relative_score(&self, pos: &GamePosition) -> i32 {
        sign(pos.side_to_move()) * self.score(pos)
    }

    fn material_and_placement(&self, pos: &GamePosition) -> i32 {
        let endgame = pos.occupied_count() <= ENDGAME_PIECE_COUNT;

        pos.pieces()
            .map(|(square, piece)| {
                let mut index = usize::from(square);
                if self.mirror_tables && piece.color == Color::Black {
                    index ^= 56;
                }
                let placement = placement_table(piece.role, endgame)[index];
                sign(piece.color) * (piece_value(piece.role) + placement)
            })
            .sum()
    }

    fn piece_activity(&self, pos: &GamePosition) -> i32 {
        let to_move = pos.side_to_move();
        let own = pos.legal_move_count() as i32;

        match self.mobility {
            MobilityMode::SideToMove => sign(to_move) * own * MOBILITY_WEIGHT,
            MobilityMode::Symmetric => {
                // In check there is no legal null move; the other side counts as immobile.
                let other = pos
                    .with_turn_swapped()
                    .map_or(0, |swapped| swapped.legal_move_count() as i32);
                sign(to_move) * (own - other) * MOBILITY_WEIGHT
            }
        }
    }
}

fn placement_table(role: Role, endgame: bool) -> &'static [i32; 64] {
    match (role, endgame) {
        (Role::Pawn, true) => &ENDGAME_PAWN_TABLE,
        (Role::King, true) => &ENDGAME_KING_TABLE,
        (Role::Pawn, false) => &PAWN_TABLE,
        (Role::King, false) => &KING_TABLE,
        (Role::Knight, _) => &KNIGHT_TABLE,
        (Role::Bishop, _) => &BISHOP_TABLE,
        (Role::Rook, _) => &ROOK_TABLE,
        (Role::Queen, _) => &QUEEN_TABLE,
    }
}

fn opening_principles(pos: &GamePosition) -> i32 {
    let off_square = |square: Square, role: Role| pos.role_at(square) != Some(role);

    let mut developed = 0;
    for square in [Square::B1, Square::G1] {
        developed += i32::from(off_square(square, Role::Knight));
    }
    for square in [Square::C1, Square::F1] {
        developed += i32::from(off_square(square, Role::Bishop));
    }
    for square in [Square::B8, Square::G8] {
        developed -= i32::from(off_square(square, Role::Knight));
    }
    for square in [Square::C8, Square::F8] {
        developed -= i32::from(off_square(square, Role::Bishop));
    }

    let mut score = developed * DEVELOPED_MINOR_BONUS;

    for color in [Color::White, Color::Black] {
        score += sign(color) * castling_bonus(pos, color);
        score -= sign(color) * early_queen_penalty(pos, color);
    }

    score
}

/// Rights gone with the king on a castled square counts as castled;
/// rights gone otherwise earns the smaller bonus.
fn castling_bonus(pos: &GamePosition, color: Color) -> i32 {
    if pos.has_any_castling_rights(color) {
        return 0;
    }
    let castled_squares = match color {
        Color::White => [Square::G1, Square::C1],
        Color::Black => [Square::G8, Square::C8],
    };
    match pos.king(color) {
        Some(king) if castled_squares.contains(&king) => CASTLED_BONUS,
        _ => CASTLING_RIGHTS_LOST_BONUS,
    }
}

fn early_queen_penalty(pos: &GamePosition, color: Color) -> i32 {
    let home = match color {
        Color::White => Square::D1,
        Color::Black => Square::D8,
    };
    let queen = pos
        .pieces()
        .filter(|(_, piece)| piece.color == color && piece.role == Role::Queen)
        .map(|(square, _)| square)
        .last();

    match queen {
        Some(square) if square != home => EARLY_QUEEN_PENALTY,
        _ => 0,
    }
}

fn king_safety(pos: &GamePosition) -> i32 {
    if pos.fullmove_number() > KING_SAFETY_LAST_MOVE {
        return 0;
    }

    [Color::White, Color::Black]
        .into_iter()
        .filter(|&color| pos.king(color).is_some_and(|king| WIDE_CENTER.contains(&king)))
        .map(|color| -sign(color) * CENTRAL_KING_PENALTY)
        .sum()
}

fn center_control(pos: &GamePosition) -> i32 {
    CENTER
        .iter()
        .filter_map(|&square| pos.piece_at(square))
        .map(|piece| sign(piece.color) * CENTER_OCCUPANCY_BONUS)
        .sum()
}

fn pawn_structure(pos: &GamePosition) -> i32 {
    let mut pawns_per_file = [[0i32; 8]; 2];
    for (square, piece) in pos.pieces() {
        if piece.role == Role::Pawn {
            let side = usize::from(piece.color == Color::Black);
            pawns_per_file[side][usize::from(square) % 8] += 1;
        }
    }

    let doubled = |counts: &[i32; 8]| -> i32 { counts.iter().map(|&n| (n - 1).max(0)).sum() };

    -(doubled(&pawns_per_file[0]) - doubled(&pawns_per_file[1])) * DOUBLED_PAWN_PENALTY
}

fn development(pos: &GamePosition) -> i32 {
    HOME_SQUARES
        .iter()
        .filter_map(|&(square, role)| pos.piece_at(square).filter(|piece| piece.role == role))
        .map(|piece| -sign(piece.color) * UNDEVELOPED_PIECE_PENALTY)
        .sum()
}

// Piece-square tables, indexed a1 = 0 .. h8 = 63.

const PAWN_TABLE: [i32; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0,
     50,  50,  50,  50,  50,  50,  50,  50,
     10,  10,  20,  30,  30,  20,  10,  10,
      5,   5,  10,  25,  25,  10,   5,   5,
      0,   0,   0,  20,  20,   0,   0,   0,
      5,  -5, -10,   0,   0, -10,  -5,   5,
      5,  10,  10, -20, -20,  10,  10,   5,
      0,   0,   0,   0,   0,   0,   0,   0,
];

const KNIGHT_TABLE: [i32; 64] = [
    -50, -40, -30, -30, -30, -30, -40, -50,
    -40, -20,   0,   0,   0,   0, -20, -40,
    -30,   0,  10,  15,  15,  10,   0, -30,
    -30,   5,  15,  20,  20,  15,   5, -30,
    -30,   0,  15,  20,  20,  15,   0, -30,
    -30,   5,  10,  15,  15,  10,   5, -30,
    -40, -20,   0,   5,   5,   0, -20, -40,
    -50, -40, -30, -30, -30, -30, -40, -50,
];

const BISHOP_TABLE: [i32; 64] = [
    -20, -10, -10, -10, -10, -10, -10, -20,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   5,  10,  10,   5,   0, -10,
    -10,   5,   5,  10,  10,   5,   5, -10,
    -10,   0,  10,  10,  10,  10,   0, -10,
    -10,  10,  10,  10,  10,  10,  10, -10,
    -10,   5,   0,   0,   0,   0,   5, -10,
    -20, -10, -10, -10, -10, -10, -10, -20,
];

const ROOK_TABLE: [i32; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0,
      5,  10,  10,  10,  10,  10,  10,   5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
      5,  10,  10,  10,  10,  10,  10,   5,
      0,   0,   0,   0,   0,   0,   0,   0,
];

const QUEEN_TABLE: [i32; 64] = [
    -20, -10, -10,  -5,  -5, -10, -10, -20,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   5,   5,   5,   5,   0, -10,
     -5,   0,   5,   5,   5,   5,   0,  -5,
      0,   0,   5,   5,   5,   5,   0,  -5,
    -10,   5,   5,   5,   5,   5,   0, -10,
    -10,   0,   5,   0,   0,   0,   0, -10,
    -20, -10, -10,  -5,  -5, -10, -10, -20,
];

const KING_TABLE: [i32; 64] = [
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -20, -30, -30, -40, -40, -30, -30, -20,
    -10, -20, -20, -20, -20, -20, -20, -10,
     20,  20,   0,   0,   0,   0,  20,  20,
     20,  30,  10,   0,   0,  10,  30,  20,
];

const ENDGAME_PAWN_TABLE: [i32; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0,
     50,  50,  50,  50,  50,  50,  50,  50,
     30,  30,  30,  30,  30,  30,  30,  30,
     20,  20,  20,  20,  20,  20,  20,  20,
     10,  10,  10,  10,  10,  10,  10,  10,
      5,   5,   5,   5,   5,   5,   5,   5,
      0,   0,   0,   0,   0,   0,   0,   0,
      0,   0,   0,   0,   0,   0,   0,   0,
];

const ENDGAME_KING_TABLE: [i32; 64] = [
    -50, -40, -30, -20, -20, -30, -40, -50,
    -30, -20, -10,   0,   0, -10, -20, -30,
    -30, -10,  20,  30,  30,  20, -10, -30,
    -30, -10,  30,  40,  40,  30, -10, -30,
    -30, -10,  30,  40,  40,  30, -10, -30,
    -30, -10,  20,  30,  30,  20, -10, -30,
    -30, -30,   0,   0,   0,   0, -30, -30,
    -50, -30, -30, -30, -30, -30, -30, -50,
];
