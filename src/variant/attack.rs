//! Would a king of a given color be attacked on a given square?

use crate::engine::board::Position;
use crate::engine::types::{ChessError, Color, PieceType, Square};

/// Is `square` attacked by `color`'s opponent, as if `color`'s king stood there?
///
/// The king is lifted off its current square first so it cannot shield the
/// target from sliders, and whatever occupies `square` is ignored. The side to
/// move does not matter.
pub fn is_attacked(pos: &Position, square: Square, color: Color) -> bool {
    let mut probe = pos.clone();
    if let Some(king) = probe.king_sq(color) {
        probe.remove_piece(king, color, PieceType::King);
    }
    probe.clear_square(square);
    probe.is_square_attacked(square, !color)
}

/// FEN-level form of [`is_attacked`].
pub fn is_attacked_fen(fen: &str, square: Square, color: Color) -> Result<bool, ChessError> {
    Ok(is_attacked(&Position::from_fen_unchecked(fen)?, square, color))
}
