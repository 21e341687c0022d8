//! Legal move generation.
//!
//! Pipeline:
//!   1. Generate pseudo-legal moves (ignoring pins / check evasion).
//!   2. Filter: make the move on a copy, keep it if the mover's king is safe.
//!
//! Positions handed in by variant games may carry non-orthodox back ranks,
//! so every step tolerates missing kings, extra rooks and pawns on any rank.

use crate::engine::attacks;
use crate::engine::board::Position;
use crate::engine::types::{Bitboard, CastlingRights, Color, Move, MoveFlags, PieceType, Square};

// =========================================================================
// Public API
// =========================================================================

/// Generate all legal moves for the side to move.
pub fn legal_moves(pos: &Position) -> Vec<Move> {
    let mut pseudo = Vec::with_capacity(128);
    generate_pseudo_legal(pos, &mut pseudo);

    let us = pos.side_to_move;
    pseudo
        .into_iter()
        .filter(|&mv| {
            let mut copy = pos.clone();
            copy.make_move(mv);
            !copy.is_color_in_check(us)
        })
        .collect()
}

/// Generate all legal moves originating from a specific square.
pub fn legal_moves_from(pos: &Position, from: Square) -> Vec<Move> {
    legal_moves(pos)
        .into_iter()
        .filter(|m| m.from == from)
        .collect()
}

/// The side to move is in check and has no legal reply.
pub fn is_checkmate(pos: &Position) -> bool {
    pos.is_in_check() && legal_moves(pos).is_empty()
}

/// The side to move is not in check but has no legal move.
pub fn is_stalemate(pos: &Position) -> bool {
    !pos.is_in_check() && legal_moves(pos).is_empty()
}

// =========================================================================
// Pseudo-legal generation (internal)
// =========================================================================

fn generate_pseudo_legal(pos: &Position, moves: &mut Vec<Move>) {
    let us = pos.side_to_move;
    let occ = pos.all_occupied;
    generate_pawn_moves(pos, us, moves);
    generate_piece_moves(pos, us, PieceType::Knight, moves, |sq| {
        attacks::knight_attacks(sq)
    });
    generate_piece_moves(pos, us, PieceType::King, moves, attacks::king_attacks);
    generate_piece_moves(pos, us, PieceType::Bishop, moves, |sq| {
        attacks::bishop_attacks(sq, occ)
    });
    generate_piece_moves(pos, us, PieceType::Rook, moves, |sq| {
        attacks::rook_attacks(sq, occ)
    });
    generate_piece_moves(pos, us, PieceType::Queen, moves, |sq| {
        attacks::queen_attacks(sq, occ)
    });
    generate_castling_moves(pos, us, moves);
}

// =========================================================================
// Pawn moves
// =========================================================================

fn generate_pawn_moves(pos: &Position, us: Color, moves: &mut Vec<Move>) {
    let enemy = pos.occupied[(!us).index()];
    let empty = !pos.all_occupied;

    let (dir, start_rank, last_rank): (i8, u8, u8) = match us {
        Color::White => (1, 1, 7),
        Color::Black => (-1, 6, 0),
    };

    for from in pos.bb(us, PieceType::Pawn).iter() {
        if let Some(to) = from.offset(0, dir)
            && empty.is_set(to)
        {
            push_pawn_move(from, to, last_rank, MoveFlags::NONE, moves);

            if from.rank() == start_rank
                && let Some(to2) = to.offset(0, dir)
                && empty.is_set(to2)
            {
                moves.push(Move::with_flags(from, to2, MoveFlags::DOUBLE_PUSH));
            }
        }

        let attacked = attacks::pawn_attacks(us, from);
        for to in (attacked & enemy).iter() {
            push_pawn_move(from, to, last_rank, MoveFlags::CAPTURE, moves);
        }

        if let Some(ep_sq) = pos.en_passant
            && attacked.is_set(ep_sq)
            && !pos.all_occupied.is_set(ep_sq)
        {
            moves.push(Move::with_flags(
                from,
                ep_sq,
                MoveFlags::CAPTURE | MoveFlags::EN_PASSANT,
            ));
        }
    }
}

/// Push a pawn move, expanding it into the four promotions on the last rank.
fn push_pawn_move(from: Square, to: Square, last_rank: u8, flags: MoveFlags, moves: &mut Vec<Move>) {
    if to.rank() != last_rank {
        moves.push(Move::with_flags(from, to, flags));
        return;
    }
    for promo in [
        PieceType::Queen,
        PieceType::Rook,
        PieceType::Bishop,
        PieceType::Knight,
    ] {
        moves.push(Move::with_promotion(from, to, promo, flags));
    }
}

// =========================================================================
// Knight, king and slider moves
// =========================================================================

fn generate_piece_moves(
    pos: &Position,
    us: Color,
    piece: PieceType,
    moves: &mut Vec<Move>,
    targets_from: impl Fn(Square) -> Bitboard,
) {
    let friendly = pos.occupied[us.index()];
    let enemy = pos.occupied[(!us).index()];

    for from in pos.bb(us, piece).iter() {
        for to in (targets_from(from) & !friendly).iter() {
            let flags = if enemy.is_set(to) {
                MoveFlags::CAPTURE
            } else {
                MoveFlags::NONE
            };
            moves.push(Move::with_flags(from, to, flags));
        }
    }
}

// =========================================================================
// Castling (orthodox layout only)
// =========================================================================

fn generate_castling_moves(pos: &Position, us: Color, moves: &mut Vec<Move>) {
    let them = !us;
    let rank = us.back_rank();
    let king_home = Square::from_file_rank(4, rank);

    // Only a single king on e1/e8 castles here; irregular layouts are the
    // variant interpreter's business.
    if pos.bb(us, PieceType::King) != Bitboard::from_square(king_home)
        || pos.is_square_attacked(king_home, them)
    {
        return;
    }

    let rook_on = |file: u8| pos.bb(us, PieceType::Rook).is_set(Square::from_file_rank(file, rank));
    let empty = |files: &[u8]| {
        files
            .iter()
            .all(|&f| !pos.all_occupied.is_set(Square::from_file_rank(f, rank)))
    };
    let safe = |files: &[u8]| {
        files
            .iter()
            .all(|&f| !pos.is_square_attacked(Square::from_file_rank(f, rank), them))
    };

    if pos.castling_rights.has(CastlingRights::kingside(us))
        && rook_on(7)
        && empty(&[5, 6])
        && safe(&[5, 6])
    {
        moves.push(Move::with_flags(
            king_home,
            Square::from_file_rank(6, rank),
            MoveFlags::CASTLING,
        ));
    }

    if pos.castling_rights.has(CastlingRights::queenside(us))
        && rook_on(0)
        && empty(&[1, 2, 3])
        && safe(&[2, 3])
    {
        moves.push(Move::with_flags(
            king_home,
            Square::from_file_rank(2, rank),
            MoveFlags::CASTLING | MoveFlags::QUEENSIDE,
        ));
    }
}

// =========================================================================
// Tests
// =========================================================================
