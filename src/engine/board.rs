//! Bitboard-based chess position representation.
//!
//! `Position` stores piece placement as 12 bitboards (2 colours × 6 piece types),
//! redundant occupancy bitboards, side to move, castling rights, en-passant square
//! and the two move counters. It is the typed record behind every FEN string the
//! variant engine touches; only `from_fen` / `to_fen` deal with raw text.

use crate::engine::attacks;
use crate::engine::types::{Bitboard, CastlingRights, ChessError, Color, Move, PieceType, Square};

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

// ---------------------------------------------------------------------------
// UndoInfo: saved state for reversing a move
// ---------------------------------------------------------------------------

/// State that must be saved before making a move so it can be restored on undo.
#[derive(Clone, Debug)]
pub struct UndoInfo {
    pub moved_piece: Option<PieceType>,
    pub captured_piece: Option<PieceType>,
    pub castling_rights: CastlingRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u16,
    pub fullmove_number: u16,
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A complete chess position using bitboard representation.
///
/// Board layout follows LERF (Little-Endian Rank-File) mapping:
/// a1 = 0, b1 = 1, … h1 = 7, a2 = 8, … h8 = 63.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    /// Piece bitboards: `pieces[color][piece_type]`.
    pub pieces: [[Bitboard; PieceType::COUNT]; 2],

    /// Per-colour occupancy (union of all piece bitboards for that colour).
    pub occupied: [Bitboard; 2],

    /// Total occupancy (union of both colours).
    pub all_occupied: Bitboard,

    pub side_to_move: Color,

    pub castling_rights: CastlingRights,

    /// En-passant target square (the square *behind* the double-pushed pawn).
    pub en_passant: Option<Square>,

    /// Plies since the last capture, pawn move or drop.
    pub halfmove_clock: u16,

    /// Full-move number (starts at 1, incremented after Black moves).
    pub fullmove_number: u16,
}

impl Position {
    /// Create an empty board with no pieces.
    pub fn empty() -> Self {
        Position {
            pieces: [[Bitboard::EMPTY; PieceType::COUNT]; 2],
            occupied: [Bitboard::EMPTY; 2],
            all_occupied: Bitboard::EMPTY,
            side_to_move: Color::White,
            castling_rights: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Standard starting position.
    pub fn starting() -> Self {
        let mut pos = Position::empty();
        let back = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];
        for (file, &pt) in back.iter().enumerate() {
            let file = file as u8;
            pos.put_piece(Square::from_file_rank(file, 0), Color::White, pt);
            pos.put_piece(Square::from_file_rank(file, 1), Color::White, PieceType::Pawn);
            pos.put_piece(Square::from_file_rank(file, 6), Color::Black, PieceType::Pawn);
            pos.put_piece(Square::from_file_rank(file, 7), Color::Black, pt);
        }
        pos.castling_rights = CastlingRights::ALL;
        pos
    }

    // -----------------------------------------------------------------------
    // Piece manipulation (low-level)
    // -----------------------------------------------------------------------

    #[inline]
    pub fn put_piece(&mut self, sq: Square, color: Color, piece: PieceType) {
        let bb = Bitboard::from_square(sq);
        self.pieces[color.index()][piece.index()] |= bb;
        self.occupied[color.index()] |= bb;
        self.all_occupied |= bb;
    }

    #[inline]
    pub fn remove_piece(&mut self, sq: Square, color: Color, piece: PieceType) {
        let bb = Bitboard::from_square(sq);
        self.pieces[color.index()][piece.index()] &= !bb;
        self.occupied[color.index()] &= !bb;
        self.all_occupied &= !bb;
    }

    /// Empty a square, returning whatever stood there.
    pub fn clear_square(&mut self, sq: Square) -> Option<(Color, PieceType)> {
        let found = self.piece_at(sq)?;
        self.remove_piece(sq, found.0, found.1);
        Some(found)
    }

    /// Put a piece on a square, replacing any occupant.
    pub fn set_square(&mut self, sq: Square, color: Color, piece: PieceType) {
        self.clear_square(sq);
        self.put_piece(sq, color, piece);
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// What piece (if any) is on a given square?
    pub fn piece_at(&self, sq: Square) -> Option<(Color, PieceType)> {
        if !self.all_occupied.is_set(sq) {
            return None;
        }
        let color = if self.occupied[Color::White.index()].is_set(sq) {
            Color::White
        } else {
            Color::Black
        };
        self.piece_type_at(sq, color).map(|pt| (color, pt))
    }

    /// Bitboard of all pieces of a given colour and type.
    #[inline]
    pub fn bb(&self, color: Color, piece: PieceType) -> Bitboard {
        self.pieces[color.index()][piece.index()]
    }

    /// Bitboard of friendly (side-to-move) pieces.
    #[inline]
    pub fn friendly(&self) -> Bitboard {
        self.occupied[self.side_to_move.index()]
    }

    /// Bitboard of enemy pieces.
    #[inline]
    pub fn enemy(&self) -> Bitboard {
        self.occupied[(!self.side_to_move).index()]
    }

    /// The king square for `color`, if that side has a king on the board.
    #[inline]
    pub fn king_sq(&self, color: Color) -> Option<Square> {
        self.bb(color, PieceType::King).lsb()
    }

    #[inline]
    fn piece_type_at(&self, sq: Square, color: Color) -> Option<PieceType> {
        PieceType::ALL
            .into_iter()
            .find(|pt| self.pieces[color.index()][pt.index()].is_set(sq))
    }

    /// Verify that redundant occupancy bitboards are consistent with piece bitboards.
    #[cfg(any(debug_assertions, test))]
    pub fn assert_consistent(&self) {
        for color in Color::BOTH {
            let mut expected = Bitboard::EMPTY;
            for pt in PieceType::ALL {
                expected |= self.pieces[color.index()][pt.index()];
            }
            assert_eq!(
                self.occupied[color.index()],
                expected,
                "occupancy mismatch for {color:?}",
            );
        }
        assert_eq!(
            self.all_occupied,
            self.occupied[0] | self.occupied[1],
            "all_occupied mismatch",
        );
    }

    // -----------------------------------------------------------------------
    // Attack detection
    // -----------------------------------------------------------------------

    /// Is `sq` attacked by any piece of colour `by`?
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        let occ = self.all_occupied;

        // A pawn of `by` attacks `sq` iff a pawn of the other colour on `sq`
        // would attack the pawn's square.
        if (attacks::pawn_attacks(!by, sq) & self.bb(by, PieceType::Pawn)).is_not_empty() {
            return true;
        }
        if (attacks::knight_attacks(sq) & self.bb(by, PieceType::Knight)).is_not_empty() {
            return true;
        }
        if (attacks::king_attacks(sq) & self.bb(by, PieceType::King)).is_not_empty() {
            return true;
        }

        let queens = self.bb(by, PieceType::Queen);
        let straight = self.bb(by, PieceType::Rook) | queens;
        if (attacks::rook_attacks(sq, occ) & straight).is_not_empty() {
            return true;
        }
        let diagonal = self.bb(by, PieceType::Bishop) | queens;
        (attacks::bishop_attacks(sq, occ) & diagonal).is_not_empty()
    }

    /// Is `color`'s king attacked? A side without a king is never in check.
    pub fn is_color_in_check(&self, color: Color) -> bool {
        self.king_sq(color)
            .is_some_and(|king| self.is_square_attacked(king, !color))
    }

    /// Is the side-to-move's king currently in check?
    #[inline]
    pub fn is_in_check(&self) -> bool {
        self.is_color_in_check(self.side_to_move)
    }

    // -----------------------------------------------------------------------
    // Make / Undo move
    // -----------------------------------------------------------------------

    /// Apply a move to the position. Returns `UndoInfo` for reversal.
    ///
    /// The move must come from the move generator; legality (own king left in
    /// check) is the caller's concern. A move from an empty square leaves the
    /// board untouched.
    pub fn make_move(&mut self, mv: Move) -> UndoInfo {
        let us = self.side_to_move;
        let them = !us;

        let mut undo = UndoInfo {
            moved_piece: self.piece_type_at(mv.from, us),
            captured_piece: None,
            castling_rights: self.castling_rights,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        };
        let Some(moving_piece) = undo.moved_piece else {
            return undo;
        };

        self.en_passant = None;

        if mv.flags.is_en_passant() {
            if let Some(cap_sq) = mv.to.offset(0, pawn_back(us)) {
                self.remove_piece(cap_sq, them, PieceType::Pawn);
                undo.captured_piece = Some(PieceType::Pawn);
            }
        } else if let Some(cap_piece) = self.piece_type_at(mv.to, them) {
            self.remove_piece(mv.to, them, cap_piece);
            undo.captured_piece = Some(cap_piece);
        }

        self.remove_piece(mv.from, us, moving_piece);
        self.put_piece(mv.to, us, mv.promotion.unwrap_or(moving_piece));

        if mv.flags.is_castling()
            && let Some((rook_from, rook_to)) = castling_rook_squares(mv.to)
        {
            self.remove_piece(rook_from, us, PieceType::Rook);
            self.put_piece(rook_to, us, PieceType::Rook);
        }

        // Moving king or rook, or capturing on a rook's home square.
        self.castling_rights.0 &= CASTLING_MASK[mv.from.0 as usize];
        self.castling_rights.0 &= CASTLING_MASK[mv.to.0 as usize];

        if mv.flags.is_double_push() {
            self.en_passant = mv.from.offset(0, -pawn_back(us));
        }

        if moving_piece == PieceType::Pawn || undo.captured_piece.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }

        if us == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        self.side_to_move = them;

        undo
    }

    /// Reverse a move previously applied with `make_move`.
    pub fn undo_move(&mut self, mv: Move, undo: &UndoInfo) {
        let Some(original_piece) = undo.moved_piece else {
            return;
        };
        let them = self.side_to_move;
        let us = !them;
        self.side_to_move = us;

        let landing_piece = mv.promotion.unwrap_or(original_piece);
        self.remove_piece(mv.to, us, landing_piece);
        self.put_piece(mv.from, us, original_piece);

        if mv.flags.is_en_passant() {
            if let Some(cap_sq) = mv.to.offset(0, pawn_back(us)) {
                self.put_piece(cap_sq, them, PieceType::Pawn);
            }
        } else if let Some(cap_piece) = undo.captured_piece {
            self.put_piece(mv.to, them, cap_piece);
        }

        if mv.flags.is_castling()
            && let Some((rook_from, rook_to)) = castling_rook_squares(mv.to)
        {
            self.remove_piece(rook_to, us, PieceType::Rook);
            self.put_piece(rook_from, us, PieceType::Rook);
        }

        self.castling_rights = undo.castling_rights;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;
    }

    // -----------------------------------------------------------------------
    // Board display (8×8 text grid)
    // -----------------------------------------------------------------------

    /// Render the board as an 8-line string (rank 8 at top), useful for debugging.
    pub fn board_string(&self) -> String {
        let mut s = String::with_capacity(200);
        for rank in (0..8).rev() {
            s.push((b'1' + rank) as char);
            for file in 0..8 {
                s.push(' ');
                s.push(match self.piece_at(Square::from_file_rank(file, rank)) {
                    Some((c, p)) => p.to_char(c),
                    None => '.',
                });
            }
            s.push('\n');
        }
        s.push_str("  a b c d e f g h");
        s
    }
}

/// Rank step from a pawn's destination back to its origin.
#[inline]
fn pawn_back(color: Color) -> i8 {
    match color {
        Color::White => -1,
        Color::Black => 1,
    }
}

// ---------------------------------------------------------------------------
// Orthodox castling geometry
// ---------------------------------------------------------------------------

/// For an orthodox castling king destination, return (rook_from, rook_to).
fn castling_rook_squares(king_to: Square) -> Option<(Square, Square)> {
    match king_to.0 {
        6 => Some((Square(7), Square(5))),
        2 => Some((Square(0), Square(3))),
        62 => Some((Square(63), Square(61))),
        58 => Some((Square(56), Square(59))),
        _ => None,
    }
}

/// Castling rights that survive a move touching the indexed square.
#[rustfmt::skip]
const CASTLING_MASK: [u8; 64] = {
    let mut mask = [0b1111u8; 64];
    mask[0]  = 0b1111 & !CastlingRights::WHITE_QUEENSIDE;
    mask[4]  = 0b1111 & !(CastlingRights::WHITE_KINGSIDE | CastlingRights::WHITE_QUEENSIDE);
    mask[7]  = 0b1111 & !CastlingRights::WHITE_KINGSIDE;
    mask[56] = 0b1111 & !CastlingRights::BLACK_QUEENSIDE;
    mask[60] = 0b1111 & !(CastlingRights::BLACK_KINGSIDE | CastlingRights::BLACK_QUEENSIDE);
    mask[63] = 0b1111 & !CastlingRights::BLACK_KINGSIDE;
    mask
};

// ---------------------------------------------------------------------------
// FEN parsing & generation
// ---------------------------------------------------------------------------

impl Position {
    /// Parse a FEN string into a `Position`, requiring exactly one king per side.
    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        let pos = Self::from_fen_unchecked(fen)?;
        for color in Color::BOTH {
            let king_count = pos.bb(color, PieceType::King).pop_count();
            if king_count != 1 {
                return Err(ChessError::InvalidFen(format!(
                    "{color} has {king_count} kings (expected 1)"
                )));
            }
        }
        Ok(pos)
    }

    /// Parse the six FEN fields without checking the king count.
    ///
    /// Variant positions can be inspected (and reported on) before they are
    /// known to be playable.
    pub fn from_fen_unchecked(fen: &str) -> Result<Self, ChessError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(ChessError::InvalidFen(format!(
                "expected 6 fields, got {}",
                fields.len()
            )));
        }

        let mut pos = Position::empty();
        pos.set_placement(fields[0])?;

        pos.side_to_move = fields[1]
            .chars()
            .next()
            .filter(|_| fields[1].len() == 1)
            .and_then(Color::from_fen_char)
            .ok_or_else(|| {
                ChessError::InvalidFen(format!("invalid side to move: '{}'", fields[1]))
            })?;

        pos.castling_rights = CastlingRights::from_fen(fields[2]).ok_or_else(|| {
            ChessError::InvalidFen(format!("invalid castling string: '{}'", fields[2]))
        })?;

        if fields[3] != "-" {
            let ep_sq = Square::from_algebraic(fields[3]).ok_or_else(|| {
                ChessError::InvalidFen(format!("invalid en passant square: '{}'", fields[3]))
            })?;
            if ep_sq.rank() != 2 && ep_sq.rank() != 5 {
                return Err(ChessError::InvalidFen(format!(
                    "en passant square {} is not on rank 3 or 6",
                    fields[3]
                )));
            }
            pos.en_passant = Some(ep_sq);
        }

        pos.halfmove_clock = fields[4].parse::<u16>().map_err(|_| {
            ChessError::InvalidFen(format!("invalid halfmove clock: '{}'", fields[4]))
        })?;
        pos.fullmove_number = fields[5].parse::<u16>().map_err(|_| {
            ChessError::InvalidFen(format!("invalid fullmove number: '{}'", fields[5]))
        })?;
        if pos.fullmove_number == 0 {
            return Err(ChessError::InvalidFen(
                "fullmove number must be >= 1".to_string(),
            ));
        }

        #[cfg(debug_assertions)]
        pos.assert_consistent();

        Ok(pos)
    }

    /// Replace the board with the pieces described by a FEN placement field.
    fn set_placement(&mut self, placement: &str) -> Result<(), ChessError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(ChessError::InvalidFen(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_idx as u8;
            let mut file: u8 = 0;
            for ch in rank_str.chars() {
                if file > 7 {
                    return Err(ChessError::InvalidFen(format!(
                        "too many squares in rank {}",
                        rank + 1
                    )));
                }
                if let Some(digit) = ch.to_digit(10) {
                    if !(1..=8).contains(&digit) {
                        return Err(ChessError::InvalidFen(format!(
                            "invalid empty count '{ch}' in rank {}",
                            rank + 1
                        )));
                    }
                    file += digit as u8;
                } else if let Some((color, piece)) = PieceType::from_char(ch) {
                    self.put_piece(Square::from_file_rank(file, rank), color, piece);
                    file += 1;
                } else {
                    return Err(ChessError::InvalidFen(format!(
                        "invalid character '{ch}' in piece placement"
                    )));
                }
            }
            if file != 8 {
                return Err(ChessError::InvalidFen(format!(
                    "rank {} has {} squares instead of 8",
                    rank + 1,
                    file
                )));
            }
        }
        Ok(())
    }

    /// The piece-placement field of the FEN.
    pub fn placement(&self) -> String {
        let mut out = String::with_capacity(64);
        for rank in (0..8).rev() {
            let mut empty_count = 0u8;
            for file in 0..8 {
                match self.piece_at(Square::from_file_rank(file, rank)) {
                    Some((color, piece)) => {
                        if empty_count > 0 {
                            out.push((b'0' + empty_count) as char);
                            empty_count = 0;
                        }
                        out.push(piece.to_char(color));
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                out.push((b'0' + empty_count) as char);
            }
            if rank > 0 {
                out.push('/');
            }
        }
        out
    }

    /// Export the position as a FEN string.
    pub fn to_fen(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.placement(),
            self.side_to_move.fen_char(),
            self.castling_rights.to_fen(),
            self.en_passant
                .map_or_else(|| "-".to_string(), |sq| sq.to_algebraic()),
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.board_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
