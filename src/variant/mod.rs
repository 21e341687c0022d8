//! Variant move and position engine.
//!
//! Pure functions over positions and move inputs for the categories a chess
//! server plays: orthodox chess, crazyhouse, bughouse, losers, the wild
//! family and Chess960 (`wild/fr`). Nothing here keeps state between calls;
//! the caller owns the game's [`VariantRules`] and [`Holdings`].

pub mod attack;
pub mod castling;
pub mod category;
pub mod chess960;
pub mod dests;
pub mod fen;
pub mod holdings;
pub mod interpret;
pub mod moves;
pub mod standard;
pub mod validate;

pub use attack::is_attacked;
pub use castling::{CastleSide, CastlingAnchor, CastlingAnchors, adjust_castling_rights};
pub use category::Category;
pub use chess960::{Chess960Start, generate as generate_chess960};
pub use dests::{Destinations, destinations};
pub use fen::FenFields;
pub use holdings::Holdings;
pub use interpret::{MoveOutcome, VariantRules, interpret};
pub use moves::{CanonicalMove, MoveInput};
pub use validate::{ValidationError, validate_fen};
