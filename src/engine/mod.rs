//! Orthodox chess rules: board representation, move generation and SAN.
//!
//! The variant layer in `crate::variant` builds on these primitives.

pub mod attacks;
pub mod board;
pub mod movegen;
pub mod san;
pub mod types;

pub use board::{Position, STARTING_FEN};
pub use movegen::{is_checkmate, is_stalemate, legal_moves, legal_moves_from};
pub use types::*;
