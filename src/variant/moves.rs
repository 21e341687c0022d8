//! Move inputs accepted by the interpreter and the canonical record it returns.

use std::fmt;

use crate::engine::types::{ChessError, Color, MoveFlags, PieceType, Square};

// ---------------------------------------------------------------------------
// MoveInput
// ---------------------------------------------------------------------------

/// A proposed move, as reported by a board front-end or a server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveInput {
    /// A piece dragged from one square to another.
    Board {
        from: Square,
        to: Square,
        promotion: Option<PieceType>,
    },
    /// A held piece placed on an empty square.
    Drop { piece: PieceType, to: Square },
    /// A piece taken off the board. Only meaningful while setting up a position.
    Remove { from: Square },
    /// Standard algebraic notation, including `O-O`, `O-O-O` and `N@f3`.
    San(String),
}

impl MoveInput {
    /// Parse the coordinate forms `e2e4`, `e2-e4`, `e7e8q`, `e7-e8=q`,
    /// `N@f3` and `xa1`. Anything else is kept as SAN for the rules to resolve.
    pub fn parse(text: &str) -> Result<Self, ChessError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChessError::illegal(text, "empty move"));
        }

        if let Some((piece, to)) = text.split_once('@') {
            let piece = piece
                .chars()
                .next()
                .filter(|_| piece.len() == 1)
                .and_then(|c| PieceType::from_letter(c.to_ascii_uppercase()))
                .ok_or_else(|| ChessError::illegal(text, "unknown drop piece"))?;
            let to = parse_square(to.trim_end_matches(['+', '#']))?;
            return Ok(MoveInput::Drop { piece, to });
        }

        if let Some(from) = text.strip_prefix('x')
            && let Some(from) = Square::from_algebraic(from)
        {
            return Ok(MoveInput::Remove { from });
        }

        Ok(parse_coordinates(text).unwrap_or_else(|| MoveInput::San(text.to_string())))
    }

    pub fn is_drop(&self) -> bool {
        matches!(self, MoveInput::Drop { .. })
            || matches!(self, MoveInput::San(san) if san.contains('@'))
    }
}

fn parse_square(s: &str) -> Result<Square, ChessError> {
    Square::from_algebraic(s).ok_or_else(|| ChessError::InvalidSquare(s.to_string()))
}

/// `from`, optional dash, `to`, optional `=` and promotion letter.
fn parse_coordinates(text: &str) -> Option<MoveInput> {
    let from = Square::from_algebraic(text.get(..2)?)?;
    let rest = text[2..].strip_prefix('-').unwrap_or(&text[2..]);
    let to = Square::from_algebraic(rest.get(..2)?)?;
    let promo = rest[2..].strip_prefix('=').unwrap_or(&rest[2..]);
    let promotion = match promo.len() {
        0 => None,
        1 => {
            let c = promo.chars().next()?;
            let piece = PieceType::from_letter(c.to_ascii_uppercase())?;
            if matches!(piece, PieceType::Pawn | PieceType::King) {
                return None;
            }
            Some(piece)
        }
        _ => return None,
    };
    Some(MoveInput::Board {
        from,
        to,
        promotion,
    })
}

impl fmt::Display for MoveInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveInput::Board {
                from,
                to,
                promotion,
            } => {
                write!(f, "{from}-{to}")?;
                if let Some(promo) = promotion {
                    write!(f, "={}", promo.to_char(Color::Black))?;
                }
                Ok(())
            }
            MoveInput::Drop { piece, to } => write!(f, "{}@{to}", piece.san_letter()),
            MoveInput::Remove { from } => write!(f, "x{from}"),
            MoveInput::San(san) => f.write_str(san),
        }
    }
}

// ---------------------------------------------------------------------------
// CanonicalMove
// ---------------------------------------------------------------------------

/// The move as it was actually played.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanonicalMove {
    /// SAN with `+` or `#` appended.
    pub san: String,
    pub color: Color,
    pub piece: PieceType,
    /// `None` for drops.
    pub from: Option<Square>,
    pub to: Option<Square>,
    pub promotion: Option<PieceType>,
    pub captured: Option<PieceType>,
    pub flags: MoveFlags,
}

impl CanonicalMove {
    /// Coordinate form sent to the server: `e2-e4`, `e7-e8=q`, `N@f3`, `xa1`,
    /// or the SAN itself for castling.
    pub fn to_coordinate_string(&self) -> String {
        if self.san.starts_with("O-O") {
            return self.san.clone();
        }
        match (self.from, self.to) {
            (None, Some(to)) => format!("{}@{to}", self.piece.san_letter()),
            (Some(from), None) => format!("x{from}"),
            (Some(from), Some(to)) => match self.promotion {
                Some(promo) => format!("{from}-{to}={}", promo.to_char(Color::Black)),
                None => format!("{from}-{to}"),
            },
            (None, None) => self.san.clone(),
        }
    }

    pub fn is_castling(&self) -> bool {
        self.flags.is_castling()
    }
}
