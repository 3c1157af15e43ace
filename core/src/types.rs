use crate::error::CoreError;
use shakmaty::Move as RulesMove;
use std::fmt;
use std::str::FromStr;

pub use shakmaty::{CastlingSide, Color, File, Piece, Rank, Role, Square};

/// A move as the engine sees it: origin, destination and an optional
/// promotion piece.
///
/// Castling is expressed as the king's two-square step (`e1g1`), the same
/// shape the move encoding uses on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Role>,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            promotion: None,
        }
    }

    pub fn new_promotion(from: Square, to: Square, promotion: Role) -> Self {
        Move {
            from,
            to,
            promotion: Some(promotion),
        }
    }

    /// Board index (a1 = 0 .. h8 = 63) of the origin square.
    pub fn from_index(&self) -> usize {
        usize::from(self.from)
    }

    /// Board index (a1 = 0 .. h8 = 63) of the destination square.
    pub fn to_index(&self) -> usize {
        usize::from(self.to)
    }

    /// The wire encoding, e.g. `e2e4` or `a7a8q`.
    pub fn encoding(&self) -> String {
        self.to_string()
    }

    pub(crate) fn from_rules(m: &RulesMove) -> Option<Move> {
        match *m {
            RulesMove::Normal {
                from,
                to,
                promotion,
                ..
            } => Some(Move {
                from,
                to,
                promotion,
            }),
            RulesMove::EnPassant { from, to } => Some(Move::new(from, to)),
            RulesMove::Castle { king, rook } => {
                let file = if rook > king { File::G } else { File::C };
                Some(Move::new(king, Square::from_coords(file, king.rank())))
            }
            RulesMove::Put { .. } => None,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(role) = self.promotion {
            write!(f, "{}", role.char())?;
        }
        Ok(())
    }
}

impl FromStr for Move {
    type Err = CoreError;

    fn from_str(encoding: &str) -> Result<Self, Self::Err> {
        let malformed = || CoreError::MalformedMove {
            encoding: encoding.to_string(),
        };

        if !encoding.is_ascii() || !(4..=5).contains(&encoding.len()) {
            return Err(malformed());
        }

        let from: Square = encoding[0..2].parse().map_err(|_| malformed())?;
        let to: Square = encoding[2..4].parse().map_err(|_| malformed())?;

        let promotion = match encoding.as_bytes().get(4) {
            None => None,
            Some(b'q') => Some(Role::Queen),
            Some(b'r') => Some(Role::Rook),
            Some(b'b') => Some(Role::Bishop),
            Some(b'n') => Some(Role::Knight),
            Some(_) => return Err(malformed()),
        };

        Ok(Move {
            from,
            to,
            promotion,
        })
    }
}
