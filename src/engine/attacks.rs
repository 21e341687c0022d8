//! Attack sets for every piece kind.
//!
//! Leaper tables (knight, king, pawn captures) are built at compile time.
//! Sliders walk their rays against the occupancy bitboard, stopping at the
//! first blocker (which is included so captures fall out naturally).

use crate::engine::types::{Bitboard, Color, Square};

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_DELTAS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// (file, rank) steps for orthogonal rays.
const ROOK_RAYS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// (file, rank) steps for diagonal rays.
const BISHOP_RAYS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

// =========================================================================
// Compile-time leaper tables
// =========================================================================

const fn leaper_table(deltas: &[(i8, i8)]) -> [u64; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0;
    while sq < 64 {
        let file = (sq & 7) as i8;
        let rank = (sq >> 3) as i8;
        let mut bb = 0u64;
        let mut i = 0;
        while i < deltas.len() {
            let f = file + deltas[i].0;
            let r = rank + deltas[i].1;
            if f >= 0 && f < 8 && r >= 0 && r < 8 {
                bb |= 1u64 << (r * 8 + f);
            }
            i += 1;
        }
        table[sq] = bb;
        sq += 1;
    }
    table
}

const KNIGHT_TABLE: [u64; 64] = leaper_table(&KNIGHT_DELTAS);
const KING_TABLE: [u64; 64] = leaper_table(&KING_DELTAS);
const WHITE_PAWN_TABLE: [u64; 64] = leaper_table(&[(-1, 1), (1, 1)]);
const BLACK_PAWN_TABLE: [u64; 64] = leaper_table(&[(-1, -1), (1, -1)]);

// =========================================================================
// Lookups
// =========================================================================

/// Knight attacks from a square.
#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    Bitboard(KNIGHT_TABLE[sq.0 as usize])
}

/// King attacks from a square.
#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    Bitboard(KING_TABLE[sq.0 as usize])
}

/// Squares a pawn of `color` standing on `sq` captures on.
#[inline]
pub fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    match color {
        Color::White => Bitboard(WHITE_PAWN_TABLE[sq.0 as usize]),
        Color::Black => Bitboard(BLACK_PAWN_TABLE[sq.0 as usize]),
    }
}

fn ray_attacks(sq: Square, occupied: Bitboard, rays: &[(i8, i8)]) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;
    for &(df, dr) in rays {
        let mut cur = sq;
        while let Some(next) = cur.offset(df, dr) {
            attacks.set(next);
            if occupied.is_set(next) {
                break;
            }
            cur = next;
        }
    }
    attacks
}

/// Rook attacks from `sq` given the current occupancy.
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    ray_attacks(sq, occupied, &ROOK_RAYS)
}

/// Bishop attacks from `sq` given the current occupancy.
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    ray_attacks(sq, occupied, &BISHOP_RAYS)
}

/// Queen attacks = rook | bishop.
#[inline]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    rook_attacks(sq, occupied) | bishop_attacks(sq, occupied)
}

// =========================================================================
// Tests
// =========================================================================
