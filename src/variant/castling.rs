//! Castling anchors: where the castle-eligible king and rooks stood in the
//! game's starting position, and the rights bookkeeping derived from them.

use crate::engine::board::Position;
use crate::engine::types::{CastlingRights, ChessError, Color, PieceType, Square};

use super::category::Category;

const D_FILE: u8 = 3;
const E_FILE: u8 = 4;

// ---------------------------------------------------------------------------
// CastleSide
// ---------------------------------------------------------------------------

/// `O-O` or `O-O-O`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CastleSide {
    Short,
    Long,
}

impl CastleSide {
    pub fn san(self) -> &'static str {
        match self {
            CastleSide::Short => "O-O",
            CastleSide::Long => "O-O-O",
        }
    }

    /// Recognise castling SAN, ignoring check marks. Zeros are accepted too.
    pub fn from_san(san: &str) -> Option<Self> {
        match san.trim().trim_end_matches(['+', '#', '!', '?']) {
            "O-O" | "0-0" => Some(CastleSide::Short),
            "O-O-O" | "0-0-0" => Some(CastleSide::Long),
            _ => None,
        }
    }

    /// The rights letter consumed by this side: `K`/`k` for short, `Q`/`q` for long.
    pub fn rights_flag(self, color: Color) -> u8 {
        match self {
            CastleSide::Short => CastlingRights::kingside(color),
            CastleSide::Long => CastlingRights::queenside(color),
        }
    }

    pub fn other(self) -> Self {
        match self {
            CastleSide::Short => CastleSide::Long,
            CastleSide::Long => CastleSide::Short,
        }
    }
}

// ---------------------------------------------------------------------------
// CastlingAnchor
// ---------------------------------------------------------------------------

/// Starting squares of one color's castle-eligible king and rooks.
///
/// "Left" is the a-file side of the king, "right" the h-file side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CastlingAnchor {
    pub color: Color,
    pub king: Option<Square>,
    pub left_rook: Option<Square>,
    pub right_rook: Option<Square>,
    /// Short castling heads for the a-file (king anchored on the d-file
    /// outside Chess960).
    pub short_is_left: bool,
}

impl CastlingAnchor {
    /// Scan `color`'s back rank of the starting position.
    ///
    /// Outside `wild/fr` only corner rooks count. In `wild/fr` any back-rank
    /// rook may be the castling rook: rooks before the king are left
    /// candidates, rooks after it right candidates. A candidate mirrored by
    /// an opposing rook on the same file is preferred, otherwise the one
    /// nearest the king. With more than two rooks this is a best guess.
    pub fn locate(start: &Position, color: Color, category: &Category) -> Self {
        let fr = *category == Category::WildFr;
        let rank = color.back_rank();
        let mut anchor = CastlingAnchor {
            color,
            king: None,
            left_rook: None,
            right_rook: None,
            short_is_left: false,
        };
        let mut left = Vec::new();
        let mut right = Vec::new();
        let mut king_seen = false;

        for file in 0..8 {
            let sq = Square::from_file_rank(file, rank);
            match start.piece_at(sq) {
                Some((c, PieceType::Rook)) if c == color => {
                    if fr {
                        if king_seen {
                            right.push(sq);
                        } else {
                            left.push(sq);
                        }
                    } else if file == 0 {
                        anchor.left_rook = Some(sq);
                    } else if file == 7 {
                        anchor.right_rook = Some(sq);
                    }
                }
                Some((c, PieceType::King)) if c == color => {
                    if king_file_allowed(category, color, file) {
                        anchor.king = Some(sq);
                        king_seen = true;
                    }
                }
                _ => {}
            }
        }

        if fr {
            let opposite_rank = (!color).back_rank();
            let mirrored = |sq: &&Square| {
                start.piece_at(Square::from_file_rank(sq.file(), opposite_rank))
                    == Some((!color, PieceType::Rook))
            };
            anchor.left_rook = left.iter().rev().find(mirrored).or(left.last()).copied();
            anchor.right_rook = right.iter().find(mirrored).or(right.first()).copied();
        }

        anchor.short_is_left = !fr && anchor.king.is_some_and(|k| k.file() == D_FILE);
        anchor
    }

    /// The rook that castles on `side`.
    pub fn rook_for(&self, side: CastleSide) -> Option<Square> {
        if (side == CastleSide::Short) == self.short_is_left {
            self.left_rook
        } else {
            self.right_rook
        }
    }

    /// Which castling side a king heading toward the h-file (`toward_right`)
    /// or the a-file is attempting.
    pub fn side_toward(&self, toward_right: bool) -> CastleSide {
        if toward_right != self.short_is_left {
            CastleSide::Short
        } else {
            CastleSide::Long
        }
    }

    fn left_flag(&self) -> u8 {
        self.side_toward(false).rights_flag(self.color)
    }

    fn right_flag(&self) -> u8 {
        self.side_toward(true).rights_flag(self.color)
    }

    /// Remove the rights whose anchor piece has left its square.
    fn revoke_displaced(&self, pos: &Position, rights: &mut CastlingRights) {
        let color = self.color;
        if let Some(k) = self.king
            && pos.piece_at(k) != Some((color, PieceType::King))
        {
            rights.remove(CastlingRights::both(color));
        }
        if let Some(r) = self.left_rook
            && pos.piece_at(r) != Some((color, PieceType::Rook))
        {
            rights.remove(self.left_flag());
        }
        if let Some(r) = self.right_rook
            && pos.piece_at(r) != Some((color, PieceType::Rook))
        {
            rights.remove(self.right_flag());
        }
    }
}

/// Whether a king on `file` of its back rank is castle-eligible.
fn king_file_allowed(category: &Category, color: Color, file: u8) -> bool {
    match category {
        Category::WildFr => true,
        Category::Wild0 => file == E_FILE || (color == Color::Black && file == D_FILE),
        Category::Wild1 => file == E_FILE || file == D_FILE,
        _ => file == E_FILE,
    }
}

// ---------------------------------------------------------------------------
// CastlingAnchors (both colors)
// ---------------------------------------------------------------------------

/// Anchors for both colors, computed once from a game's starting position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CastlingAnchors {
    pub white: CastlingAnchor,
    pub black: CastlingAnchor,
}

impl CastlingAnchors {
    pub fn locate(start: &Position, category: &Category) -> Self {
        CastlingAnchors {
            white: CastlingAnchor::locate(start, Color::White, category),
            black: CastlingAnchor::locate(start, Color::Black, category),
        }
    }

    pub fn for_color(&self, color: Color) -> &CastlingAnchor {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }
}

/// Castling rights of `pos` with every right removed whose anchor king or
/// rook no longer stands on its starting square. Never adds rights.
pub fn adjust_castling_rights(pos: &Position, anchors: &CastlingAnchors) -> CastlingRights {
    let mut rights = pos.castling_rights;
    anchors.white.revoke_displaced(pos, &mut rights);
    anchors.black.revoke_displaced(pos, &mut rights);
    rights
}

/// FEN-level form of [`adjust_castling_rights`].
pub fn adjust_castling_rights_fen(
    fen: &str,
    start_fen: &str,
    category: &Category,
) -> Result<String, ChessError> {
    let mut pos = Position::from_fen_unchecked(fen)?;
    let start = Position::from_fen_unchecked(start_fen)?;
    pos.castling_rights = adjust_castling_rights(&pos, &CastlingAnchors::locate(&start, category));
    Ok(pos.to_fen())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::STARTING_FEN;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn pos(fen: &str) -> Position {
        Position::from_fen_unchecked(fen).unwrap()
    }

    fn anchor(fen: &str, color: Color, category: Category) -> CastlingAnchor {
        CastlingAnchor::locate(&pos(fen), color, &category)
    }

    #[test]
    fn castle_side_san() {
        assert_eq!(CastleSide::from_san("O-O+"), Some(CastleSide::Short));
        assert_eq!(CastleSide::from_san("0-0-0"), Some(CastleSide::Long));
        assert_eq!(CastleSide::from_san("Kg1"), None);
        assert_eq!(CastleSide::Long.san(), "O-O-O");
        assert_eq!(CastleSide::Short.other(), CastleSide::Long);
    }

    #[test]
    fn orthodox_anchors() {
        let a = anchor(STARTING_FEN, Color::White, Category::Standard);
        assert_eq!(a.king, Some(sq("e1")));
        assert_eq!(a.left_rook, Some(sq("a1")));
        assert_eq!(a.right_rook, Some(sq("h1")));
        assert!(!a.short_is_left);
        assert_eq!(a.rook_for(CastleSide::Short), Some(sq("h1")));
    }

    #[test]
    fn non_corner_rooks_ignored_outside_fr() {
        let fen = "1r2k1r1/8/8/8/8/8/8/1R2K1R1 w - - 0 1";
        let a = anchor(fen, Color::White, Category::Crazyhouse);
        assert_eq!(a.king, Some(sq("e1")));
        assert_eq!(a.left_rook, None);
        assert_eq!(a.right_rook, None);
    }

    #[test]
    fn king_file_rules_per_category() {
        // Black king on d8, white king on e1.
        let fen = "rnbkqbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        assert_eq!(anchor(fen, Color::Black, Category::Standard).king, None);
        let wild0 = anchor(fen, Color::Black, Category::Wild0);
        assert_eq!(wild0.king, Some(sq("d8")));
        assert!(wild0.short_is_left);
        assert_eq!(wild0.rook_for(CastleSide::Short), Some(sq("a8")));
        assert_eq!(wild0.side_toward(false), CastleSide::Short);
        // wild/0 only allows a d-file king for black.
        let flipped = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBKQBNR w KQkq - 0 1";
        assert_eq!(anchor(flipped, Color::White, Category::Wild0).king, None);
        assert_eq!(anchor(flipped, Color::White, Category::Wild1).king, Some(sq("d1")));
    }

    #[test]
    fn fr_anchors_follow_king() {
        let fen = "bbqnnrkr/pppppppp/8/8/8/8/PPPPPPPP/BBQNNRKR w KQkq - 0 1";
        let a = anchor(fen, Color::White, Category::WildFr);
        assert_eq!(a.king, Some(sq("g1")));
        assert_eq!(a.left_rook, Some(sq("f1")));
        assert_eq!(a.right_rook, Some(sq("h1")));
        assert!(!a.short_is_left);
    }

    #[test]
    fn fr_prefers_mirrored_rook() {
        // White rooks on a1, c1 (left of king e1) and h1; black rook on a8 only
        // mirrors a1.
        let fen = "r3k2r/8/8/8/8/8/8/R1R1K2R w KQkq - 0 1";
        let a = anchor(fen, Color::White, Category::WildFr);
        assert_eq!(a.left_rook, Some(sq("a1")));
        assert_eq!(a.right_rook, Some(sq("h1")));
        // Without a mirror, the rook nearest the king wins.
        let fen = "4k3/8/8/8/8/8/8/R1R1K2R w KQ - 0 1";
        let a = anchor(fen, Color::White, Category::WildFr);
        assert_eq!(a.left_rook, Some(sq("c1")));
    }

    #[test]
    fn adjust_strips_rights_of_moved_pieces() {
        let start = pos(STARTING_FEN);
        let anchors = CastlingAnchors::locate(&start, &Category::Crazyhouse);
        // White h1 rook gone, black king walked to e7.
        let now = pos("rnbq1bnr/ppppkppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBN1 w KQkq - 0 1");
        assert_eq!(adjust_castling_rights(&now, &anchors).to_fen(), "Q");
    }

    #[test]
    fn adjust_never_adds() {
        let start = pos(STARTING_FEN);
        let anchors = CastlingAnchors::locate(&start, &Category::Losers);
        let now = pos("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w Kq - 0 1");
        assert_eq!(adjust_castling_rights(&now, &anchors).to_fen(), "Kq");
    }

    #[test]
    fn adjust_uses_short_side_mapping() {
        // wild/0: black king d8, short castling is toward a8.
        let start = "rnbkqbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        let moved_a8 = "1nbkqbnr/rppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        let out = adjust_castling_rights_fen(moved_a8, start, &Category::Wild0).unwrap();
        assert!(out.contains(" KQq "), "{out}");
    }
}
