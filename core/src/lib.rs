//! Rules-engine boundary for the chess opponent.
//!
//! Legal move generation, move application and terminal detection are
//! delegated to `shakmaty`; this crate narrows that API down to the
//! handful of queries the decision engine is allowed to make.

pub mod error;
pub mod position;
pub mod types;

pub use error::{CoreError, CoreResult};
pub use position::{positions, GamePosition, Successor};
pub use types::*;
