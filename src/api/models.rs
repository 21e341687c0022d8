use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::engine::types::{ChessError, Color, PieceType, Square};
use crate::variant::{CanonicalMove, Destinations, Holdings, MoveInput};

use super::errors::ApiError;

// ---------------------------------------------------------------------------
// Request models
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    pub fen: String,
    pub category: Option<String>,
}

/// A move as text (`"e2-e4"`, `"N@f3"`, `"O-O"`, `"Nf3"`) or as fields.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MoveField {
    Text(String),
    Fields(MoveFields),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveFields {
    pub from: Option<String>,
    pub to: Option<String>,
    pub piece: Option<String>,
    pub promotion: Option<String>,
}

/// Holdings as a letter string (`"PPn"`) or a letter to count map.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum HoldingsField {
    Letters(String),
    Counts(BTreeMap<String, u8>),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub fen: String,
    pub start_fen: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "move")]
    pub mv: MoveField,
    pub holdings: Option<HoldingsField>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationsRequest {
    pub fen: String,
    pub start_fen: Option<String>,
    pub category: Option<String>,
    pub holdings: Option<HoldingsField>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chess960Query {
    pub idn: Option<u32>,
}

// ---------------------------------------------------------------------------
// Response models
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub language: String,
    pub engine: String,
    pub uptime: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveInfo {
    pub san: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub piece: String,
    pub color: String,
    pub promotion: Option<String>,
    pub captured: Option<String>,
    pub flags: String,
    /// Coordinate notation for sending to a server.
    pub coordinate: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveResponse {
    pub fen: String,
    #[serde(rename = "move")]
    pub mv: MoveInfo,
    /// Holdings after the move, when the request carried holdings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holdings: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationsResponse {
    pub dests: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chess960Response {
    pub idn: u32,
    pub fen: String,
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

fn piece_type_name(pt: PieceType) -> &'static str {
    match pt {
        PieceType::Pawn => "pawn",
        PieceType::Knight => "knight",
        PieceType::Bishop => "bishop",
        PieceType::Rook => "rook",
        PieceType::Queen => "queen",
        PieceType::King => "king",
    }
}

fn color_name(c: Color) -> &'static str {
    match c {
        Color::White => "white",
        Color::Black => "black",
    }
}

/// Promotion piece type from a string like "queen" or "q".
pub fn parse_promotion(s: &str) -> Option<PieceType> {
    match s.to_lowercase().as_str() {
        "queen" | "q" => Some(PieceType::Queen),
        "rook" | "r" => Some(PieceType::Rook),
        "bishop" | "b" => Some(PieceType::Bishop),
        "knight" | "n" => Some(PieceType::Knight),
        _ => None,
    }
}

/// Drop piece from a letter (`"N"`) or a name (`"knight"`).
fn parse_piece(s: &str) -> Option<PieceType> {
    match s.to_lowercase().as_str() {
        "pawn" | "p" => Some(PieceType::Pawn),
        "king" | "k" => Some(PieceType::King),
        other => parse_promotion(other),
    }
}

fn parse_square(s: &str) -> Result<Square, ApiError> {
    Square::from_algebraic(s).ok_or_else(|| ChessError::InvalidSquare(s.to_string()).into())
}

impl MoveField {
    pub fn to_input(&self) -> Result<MoveInput, ApiError> {
        let fields = match self {
            MoveField::Text(text) => return Ok(MoveInput::parse(text)?),
            MoveField::Fields(fields) => fields,
        };
        match (&fields.from, &fields.to, &fields.piece) {
            (Some(from), Some(to), _) => {
                let promotion = fields
                    .promotion
                    .as_deref()
                    .map(|p| parse_promotion(p).ok_or_else(|| ChessError::InvalidPromotion(p.to_string())))
                    .transpose()?;
                Ok(MoveInput::Board {
                    from: parse_square(from)?,
                    to: parse_square(to)?,
                    promotion,
                })
            }
            (None, Some(to), Some(piece)) => Ok(MoveInput::Drop {
                piece: parse_piece(piece)
                    .ok_or_else(|| ApiError::InvalidRequest(format!("unknown piece: {piece}")))?,
                to: parse_square(to)?,
            }),
            (Some(from), None, _) => Ok(MoveInput::Remove {
                from: parse_square(from)?,
            }),
            _ => Err(ApiError::InvalidRequest(
                "move needs from and to, or piece and to".into(),
            )),
        }
    }
}

impl HoldingsField {
    pub fn to_holdings(&self) -> Result<Holdings, ApiError> {
        let holdings = match self {
            HoldingsField::Letters(letters) => Holdings::from_letters(letters),
            HoldingsField::Counts(counts) => {
                Holdings::from_counts(counts.iter().map(|(k, v)| (k.as_str(), *v)))
            }
        };
        holdings.map_err(|e| ApiError::InvalidRequest(format!("invalid holdings: {e}")))
    }
}

pub fn move_info(mv: &CanonicalMove) -> MoveInfo {
    MoveInfo {
        san: mv.san.clone(),
        from: mv.from.map(|sq| sq.to_algebraic()),
        to: mv.to.map(|sq| sq.to_algebraic()),
        piece: piece_type_name(mv.piece).to_string(),
        color: color_name(mv.color).to_string(),
        promotion: mv.promotion.map(|pt| piece_type_name(pt).to_string()),
        captured: mv.captured.map(|pt| piece_type_name(pt).to_string()),
        flags: mv.flags.letters(),
        coordinate: mv.to_coordinate_string(),
    }
}

pub fn dests_to_api(dests: &Destinations) -> BTreeMap<String, Vec<String>> {
    dests
        .iter()
        .map(|(from, tos)| {
            (
                from.to_algebraic(),
                tos.iter().map(|sq| sq.to_algebraic()).collect(),
            )
        })
        .collect()
}
