//! Pieces in hand for crazyhouse and bughouse.

use std::collections::BTreeMap;
use std::fmt;

use crate::engine::types::{ChessError, Color, PieceType};

use super::category::Category;
use super::moves::CanonicalMove;

/// Per color, per piece kind counts of pieces available to drop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Holdings {
    counts: [[u8; PieceType::COUNT]; 2],
}

impl Holdings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the letter string used by the server (`"PPNbq"`): uppercase is
    /// white, lowercase black, one letter per piece. `-` means empty.
    pub fn from_letters(letters: &str) -> Result<Self, ChessError> {
        let mut holdings = Holdings::new();
        for c in letters.trim().chars().filter(|&c| c != '-') {
            let (color, piece) = PieceType::from_char(c)
                .ok_or_else(|| ChessError::illegal(letters, format!("unknown piece '{c}'")))?;
            holdings.add(color, piece);
        }
        Ok(holdings)
    }

    /// Parse a letter to count map such as `{"P": 2, "n": 1}`.
    pub fn from_counts<'a>(
        counts: impl IntoIterator<Item = (&'a str, u8)>,
    ) -> Result<Self, ChessError> {
        let mut holdings = Holdings::new();
        for (key, count) in counts {
            let (color, piece) = key
                .chars()
                .next()
                .filter(|_| key.len() == 1)
                .and_then(PieceType::from_char)
                .ok_or_else(|| ChessError::illegal(key, "unknown piece in holdings"))?;
            let slot = &mut holdings.counts[color.index()][piece.index()];
            *slot = slot.saturating_add(count);
        }
        Ok(holdings)
    }

    /// Non-zero counts keyed by piece letter.
    pub fn to_counts(&self) -> BTreeMap<String, u8> {
        let mut out = BTreeMap::new();
        for color in Color::BOTH {
            for piece in PieceType::ALL {
                let n = self.get(color, piece);
                if n > 0 {
                    out.insert(piece.to_char(color).to_string(), n);
                }
            }
        }
        out
    }

    pub fn get(&self, color: Color, piece: PieceType) -> u8 {
        self.counts[color.index()][piece.index()]
    }

    pub fn has(&self, color: Color, piece: PieceType) -> bool {
        self.get(color, piece) > 0
    }

    /// Holds a knight, bishop, rook or queen.
    pub fn has_non_pawn(&self, color: Color) -> bool {
        [
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Rook,
            PieceType::Queen,
        ]
        .into_iter()
        .any(|piece| self.has(color, piece))
    }

    pub fn add(&mut self, color: Color, piece: PieceType) {
        let slot = &mut self.counts[color.index()][piece.index()];
        *slot = slot.saturating_add(1);
    }

    /// Remove one piece; `false` if none was held.
    pub fn take(&mut self, color: Color, piece: PieceType) -> bool {
        let slot = &mut self.counts[color.index()][piece.index()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().flatten().all(|&n| n == 0)
    }

    /// Holdings after `mv` was played.
    ///
    /// A drop spends one of the mover's pieces. In crazyhouse a capture hands
    /// the captured kind to the capturer; in bughouse captures feed the
    /// partner board, so they leave these holdings alone. Promoted pieces
    /// are not tracked and return as their promoted kind.
    pub fn after_move(&self, mv: &CanonicalMove, category: &Category) -> Holdings {
        let mut next = *self;
        if mv.flags.is_drop() {
            next.take(mv.color, mv.piece);
        }
        if *category == Category::Crazyhouse
            && let Some(captured) = mv.captured
        {
            next.add(mv.color, captured);
        }
        next
    }
}

impl fmt::Display for Holdings {
    /// White pieces first, strongest first within a color; `-` when empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("-");
        }
        for color in Color::BOTH {
            for piece in PieceType::ALL.into_iter().rev() {
                for _ in 0..self.get(color, piece) {
                    write!(f, "{}", piece.to_char(color))?;
                }
            }
        }
        Ok(())
    }
}
