//! Orthodox moves, applied straight through the rules library.

use crate::engine::board::Position;
use crate::engine::movegen;
use crate::engine::san;
use crate::engine::types::{ChessError, Move, MoveFlags, PieceType, Square};

use super::moves::{CanonicalMove, MoveInput};

/// Play `input` under orthodox rules.
///
/// Coordinate input must match a legal move; a pawn reaching the last rank
/// without a promotion piece promotes to a queen. Drops and removals are
/// refused.
pub fn apply_standard(
    pos: &Position,
    input: &MoveInput,
) -> Result<(Position, CanonicalMove), ChessError> {
    let legal = movegen::legal_moves(pos);
    let mv = match input {
        MoveInput::Board {
            from,
            to,
            promotion,
        } => find_board_move(&legal, *from, *to, *promotion)
            .ok_or_else(|| ChessError::illegal(input, "not a legal move"))?,
        MoveInput::San(text) => san::parse_san(pos, text)?,
        MoveInput::Drop { .. } => {
            return Err(ChessError::illegal(input, "drops are not allowed here"));
        }
        MoveInput::Remove { .. } => {
            return Err(ChessError::illegal(input, "pieces cannot be removed during play"));
        }
    };
    Ok(play_move(pos, mv, &legal))
}

fn find_board_move(
    legal: &[Move],
    from: Square,
    to: Square,
    promotion: Option<PieceType>,
) -> Option<Move> {
    let wanted = promotion.unwrap_or(PieceType::Queen);
    legal
        .iter()
        .find(|m| m.from == from && m.to == to && m.promotion.is_none_or(|p| p == wanted))
        .copied()
}

/// Apply a move taken from `legal` and describe it.
pub(crate) fn play_move(pos: &Position, mv: Move, legal: &[Move]) -> (Position, CanonicalMove) {
    let color = pos.side_to_move;
    let piece = pos.piece_at(mv.from).map_or(PieceType::Pawn, |(_, p)| p);
    let mut san = san::move_to_san(pos, mv, legal);

    let mut next = pos.clone();
    let undo = next.make_move(mv);
    san.push_str(san::check_suffix(&next));

    let mut flags = mv.flags;
    if undo.captured_piece.is_some() {
        flags = flags | MoveFlags::CAPTURE;
    }

    let record = CanonicalMove {
        san,
        color,
        piece,
        from: Some(mv.from),
        to: Some(mv.to),
        promotion: mv.promotion,
        captured: undo.captured_piece,
        flags,
    };
    (next, record)
}
