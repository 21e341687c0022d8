//! FEN field codec.
//!
//! Splits a FEN into its six raw fields and joins them back without
//! normalising anything, so `join(split(fen)) == fen` for single-spaced input.
//! Typed access goes through [`Position`](crate::engine::Position).

use std::fmt;

use crate::engine::types::{ChessError, Color, Square};

/// The six whitespace-separated fields of a FEN string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FenFields {
    pub board: String,
    pub color: String,
    pub castling: String,
    pub en_passant: String,
    pub halfmove: String,
    pub fullmove: String,
}

impl FenFields {
    /// Split a FEN on whitespace. Anything other than six fields is rejected.
    pub fn split(fen: &str) -> Result<Self, ChessError> {
        let words: Vec<&str> = fen.split_whitespace().collect();
        let [board, color, castling, en_passant, halfmove, fullmove] = words.as_slice() else {
            return Err(ChessError::InvalidFen(format!(
                "expected 6 fields, got {}",
                words.len()
            )));
        };
        Ok(FenFields {
            board: board.to_string(),
            color: color.to_string(),
            castling: castling.to_string(),
            en_passant: en_passant.to_string(),
            halfmove: halfmove.to_string(),
            fullmove: fullmove.to_string(),
        })
    }

    /// Concatenate the fields in FEN order, separated by single spaces.
    pub fn join(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.board, self.color, self.castling, self.en_passant, self.halfmove, self.fullmove
        )
    }

    pub fn turn_color(&self) -> Result<Color, ChessError> {
        let mut chars = self.color.chars();
        match (chars.next().and_then(Color::from_fen_char), chars.next()) {
            (Some(color), None) => Ok(color),
            _ => Err(ChessError::InvalidFen(format!(
                "invalid side to move: '{}'",
                self.color
            ))),
        }
    }

    pub fn move_number(&self) -> Result<u32, ChessError> {
        self.fullmove.parse().map_err(|_| {
            ChessError::InvalidFen(format!("invalid fullmove number: '{}'", self.fullmove))
        })
    }

    /// Ply of the move about to be played: the first white move is ply 1.
    pub fn ply_count(&self) -> Result<u32, ChessError> {
        let moves = self.move_number()?;
        let white_to_move = self.turn_color()? == Color::White;
        Ok(moves.saturating_mul(2).saturating_sub(u32::from(white_to_move)))
    }
}

impl fmt::Display for FenFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join())
    }
}

pub fn split(fen: &str) -> Result<FenFields, ChessError> {
    FenFields::split(fen)
}

pub fn join(fields: &FenFields) -> String {
    fields.join()
}

pub fn ply_count(fen: &str) -> Result<u32, ChessError> {
    FenFields::split(fen)?.ply_count()
}

pub fn move_number(fen: &str) -> Result<u32, ChessError> {
    FenFields::split(fen)?.move_number()
}

pub fn turn_color(fen: &str) -> Result<Color, ChessError> {
    FenFields::split(fen)?.turn_color()
}

#[inline]
pub fn swap_color(color: Color) -> Color {
    !color
}

/// The up to eight squares touching `square`, diagonals included.
pub fn adjacent_squares(square: Square) -> Vec<Square> {
    const AROUND: [(i8, i8); 8] = [
        (0, -1),
        (0, 1),
        (-1, 0),
        (-1, -1),
        (-1, 1),
        (1, 0),
        (1, -1),
        (1, 1),
    ];
    AROUND
        .iter()
        .filter_map(|&(df, dr)| square.offset(df, dr))
        .collect()
}
