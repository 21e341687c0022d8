//! Position validation for set-up and server-supplied FENs.

use crate::engine::board::Position;
use crate::engine::types::{Color, PieceType};

use super::castling::{CastleSide, CastlingAnchors};
use super::category::Category;

/// First rule a FEN breaks. `Display` gives the message shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid FEN format.")]
    InvalidFormat,

    /// Carries the side to move; its opponent is the one in check.
    #[error("{}", opponent_in_check_message(.0))]
    OpponentInCheck(Color),

    #[error("Missing king.")]
    MissingKing,

    #[error("Too many kings.")]
    TooManyKings,

    #[error("Pawn on 1st or 8th rank.")]
    PawnOnBackRank,

    #[error("{}", castling_message(.0))]
    CastlingPiecesMisplaced(Color),
}

fn opponent_in_check_message(to_move: &Color) -> &'static str {
    match to_move {
        Color::White => "White's turn but black is in check.",
        Color::Black => "Black's turn but white is in check.",
    }
}

fn castling_message(color: &Color) -> &'static str {
    match color {
        Color::White => "White's king or rooks aren't in valid locations for castling.",
        Color::Black => "Black's king or rooks aren't in valid locations for castling.",
    }
}

/// Check `fen` against the structural and chess rules, in a fixed order, and
/// report the first violation.
///
/// Castling rights are checked against anchors located in this same FEN, as
/// if it were the game's starting position.
pub fn validate_fen(fen: &str, category: &Category) -> Result<(), ValidationError> {
    let pos = Position::from_fen_unchecked(fen).map_err(|_| ValidationError::InvalidFormat)?;
    validate_position(&pos, category)
}

pub fn validate_position(pos: &Position, category: &Category) -> Result<(), ValidationError> {
    let to_move = pos.side_to_move;
    if pos.is_color_in_check(!to_move) {
        return Err(ValidationError::OpponentInCheck(to_move));
    }

    for color in Color::BOTH {
        match pos.bb(color, PieceType::King).pop_count() {
            0 => return Err(ValidationError::MissingKing),
            1 => {}
            _ => return Err(ValidationError::TooManyKings),
        }
    }

    let pawns = pos.bb(Color::White, PieceType::Pawn) | pos.bb(Color::Black, PieceType::Pawn);
    if pawns.iter().any(|sq| sq.rank() == 0 || sq.rank() == 7) {
        return Err(ValidationError::PawnOnBackRank);
    }

    let anchors = CastlingAnchors::locate(pos, category);
    for color in Color::BOTH {
        let anchor = anchors.for_color(color);
        for side in [CastleSide::Short, CastleSide::Long] {
            if pos.castling_rights.has(side.rights_flag(color))
                && (anchor.king.is_none() || anchor.rook_for(side).is_none())
            {
                return Err(ValidationError::CastlingPiecesMisplaced(color));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::STARTING_FEN;

    fn check(fen: &str, category: Category) -> Result<(), ValidationError> {
        validate_fen(fen, &category)
    }

    #[test]
    fn starting_position_is_valid() {
        assert_eq!(check(STARTING_FEN, Category::Standard), Ok(()));
        assert_eq!(check(STARTING_FEN, Category::WildFr), Ok(()));
    }

    #[test]
    fn malformed_fen() {
        let err = check("rnbqkbnr/pppppppp/8/8 w KQkq - 0 1", Category::Standard).unwrap_err();
        assert_eq!(err, ValidationError::InvalidFormat);
        assert_eq!(err.to_string(), "Invalid FEN format.");
        assert!(check("not a fen", Category::Standard).is_err());
    }

    #[test]
    fn opponent_in_check() {
        // Black king attacked by the e1 rook with white to move.
        let err = check("4k3/8/8/8/8/8/8/3KR3 w - - 0 1", Category::Standard).unwrap_err();
        assert_eq!(err.to_string(), "White's turn but black is in check.");
        let err = check("4k3/8/8/8/8/8/8/3Kr3 b - - 0 1", Category::Standard).unwrap_err();
        assert_eq!(err.to_string(), "Black's turn but white is in check.");
    }

    #[test]
    fn king_counts() {
        assert_eq!(
            check("8/8/8/8/8/8/8/4K3 w - - 0 1", Category::Standard),
            Err(ValidationError::MissingKing)
        );
        assert_eq!(
            check("k6k/8/8/8/8/8/8/4K3 w - - 0 1", Category::Standard),
            Err(ValidationError::TooManyKings)
        );
    }

    #[test]
    fn pawn_on_back_rank() {
        let err = check("4k2P/8/8/8/8/8/8/4K3 w - - 0 1", Category::Standard).unwrap_err();
        assert_eq!(err.to_string(), "Pawn on 1st or 8th rank.");
    }

    #[test]
    fn castling_rights_need_anchors() {
        // White claims K but the h1 rook is missing.
        let err = check("r3k2r/8/8/8/8/8/8/R3K3 w Kkq - 0 1", Category::Standard).unwrap_err();
        assert_eq!(
            err.to_string(),
            "White's king or rooks aren't in valid locations for castling."
        );
        // Black king off its anchor file.
        let err = check("r2k3r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", Category::Crazyhouse).unwrap_err();
        assert_eq!(err, ValidationError::CastlingPiecesMisplaced(Color::Black));
        // The same layout is fine in wild/0, where black's king starts on d8.
        assert_eq!(
            check("r2k3r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", Category::Wild0),
            Ok(())
        );
    }

    #[test]
    fn validation_is_repeatable() {
        let fen = "4k2P/8/8/8/8/8/8/4K3 w - - 0 1";
        assert_eq!(check(fen, Category::Losers), check(fen, Category::Losers));
    }
}
