//! Standard Algebraic Notation (SAN) generation and parsing.
//!
//! SAN examples: `e4`, `Nf3`, `Bxe5`, `O-O`, `e8=Q+`, `Raxd1#`.
//! Drop moves (`N@f3`) are outside the orthodox rules and are written by the
//! variant layer, which reuses [`check_suffix`].

use crate::engine::board::Position;
use crate::engine::movegen;
use crate::engine::types::{ChessError, Move, PieceType, Square};

// =========================================================================
// SAN generation
// =========================================================================

/// Convert a move to SAN notation, without a check or mate suffix.
///
/// `legal_moves` should be the full list of legal moves in the position
/// (passed in to avoid redundant generation).
pub fn move_to_san(pos: &Position, mv: Move, legal_moves: &[Move]) -> String {
    if mv.flags.is_castling() {
        return if mv.flags.is_queenside_castle() {
            "O-O-O".into()
        } else {
            "O-O".into()
        };
    }

    let Some((_, piece)) = pos.piece_at(mv.from) else {
        return mv.to_string();
    };
    let capture = mv.flags.is_capture() || pos.enemy().is_set(mv.to);

    let mut san = String::with_capacity(8);
    if piece == PieceType::Pawn {
        if capture {
            san.push((b'a' + mv.from.file()) as char);
            san.push('x');
        }
        san.push_str(&mv.to.to_algebraic());
        if let Some(promo) = mv.promotion {
            san.push('=');
            san.push(promo.san_letter());
        }
    } else {
        san.push(piece.san_letter());
        san.push_str(&disambiguation(pos, mv, piece, legal_moves));
        if capture {
            san.push('x');
        }
        san.push_str(&mv.to.to_algebraic());
    }
    san
}

/// SAN with `+` or `#` appended, determined by applying the move to a copy.
pub fn move_to_san_with_suffix(pos: &Position, mv: Move, legal_moves: &[Move]) -> String {
    let mut san = move_to_san(pos, mv, legal_moves);
    let mut after = pos.clone();
    after.make_move(mv);
    san.push_str(check_suffix(&after));
    san
}

/// `"#"` if the side to move is mated, `"+"` if merely in check, else `""`.
pub fn check_suffix(pos: &Position) -> &'static str {
    if !pos.is_in_check() {
        ""
    } else if movegen::legal_moves(pos).is_empty() {
        "#"
    } else {
        "+"
    }
}

/// The file, rank or square needed to tell `mv` apart from other moves of the
/// same piece kind to the same destination.
fn disambiguation(pos: &Position, mv: Move, piece: PieceType, legal_moves: &[Move]) -> String {
    let us = pos.side_to_move;
    let rivals: Vec<Square> = legal_moves
        .iter()
        .filter(|m| {
            m.to == mv.to
                && m.from != mv.from
                && !m.flags.is_castling()
                && pos.piece_at(m.from) == Some((us, piece))
        })
        .map(|m| m.from)
        .collect();

    if rivals.is_empty() {
        return String::new();
    }

    let file = (b'a' + mv.from.file()) as char;
    let rank = (b'1' + mv.from.rank()) as char;
    let same_file = rivals.iter().any(|s| s.file() == mv.from.file());
    let same_rank = rivals.iter().any(|s| s.rank() == mv.from.rank());
    match (same_file, same_rank) {
        (false, _) => file.to_string(),
        (true, false) => rank.to_string(),
        (true, true) => format!("{file}{rank}"),
    }
}

// =========================================================================
// SAN parsing
// =========================================================================

/// Parse a SAN string and return the corresponding legal move.
///
/// Accepts standard SAN: `e4`, `Nf3`, `Bxe5`, `O-O`, `O-O-O`, `e8=Q`, etc.
/// Check/checkmate and annotation suffixes (`+`, `#`, `!`, `?`) are ignored.
pub fn parse_san(pos: &Position, san: &str) -> Result<Move, ChessError> {
    let legal = movegen::legal_moves(pos);
    let raw = san;
    let san = san.trim().trim_end_matches(['+', '#', '!', '?']);

    match san {
        "O-O" | "0-0" => return find_castling(&legal, raw, false),
        "O-O-O" | "0-0-0" => return find_castling(&legal, raw, true),
        "" => return Err(ChessError::illegal(raw, "empty SAN string")),
        _ => {}
    }

    let (body, promotion) = match san.split_once('=') {
        Some((body, promo)) => {
            let promo_piece = promo
                .chars()
                .next()
                .filter(|_| promo.len() == 1)
                .and_then(PieceType::from_letter)
                .filter(|pt| !matches!(pt, PieceType::Pawn | PieceType::King))
                .ok_or_else(|| ChessError::InvalidPromotion(promo.to_string()))?;
            (body, Some(promo_piece))
        }
        None => (san, None),
    };

    let mut chars = body.chars().peekable();
    let piece = match chars.peek() {
        Some(&c) if "NBRQK".contains(c) => {
            chars.next();
            PieceType::from_letter(c).unwrap_or(PieceType::Pawn)
        }
        _ => PieceType::Pawn,
    };

    let rest: Vec<char> = chars.filter(|&c| c != 'x' && c != '-').collect();
    if rest.len() < 2 {
        return Err(ChessError::illegal(raw, "SAN too short"));
    }

    let dest_str: String = rest[rest.len() - 2..].iter().collect();
    let dest =
        Square::from_algebraic(&dest_str).ok_or_else(|| ChessError::InvalidSquare(dest_str))?;

    let disambig = &rest[..rest.len() - 2];
    let want_file = disambig
        .iter()
        .find(|c| c.is_ascii_lowercase())
        .map(|&c| c as u8 - b'a');
    let want_rank = match disambig.iter().find(|c| c.is_ascii_digit()) {
        Some(&c @ '1'..='8') => Some(c as u8 - b'1'),
        Some(_) => return Err(ChessError::illegal(raw, "rank out of range")),
        None => None,
    };

    let us = pos.side_to_move;
    let candidates: Vec<Move> = legal
        .into_iter()
        .filter(|m| {
            m.to == dest
                && !m.flags.is_castling()
                && pos.piece_at(m.from) == Some((us, piece))
                && want_file.is_none_or(|f| m.from.file() == f)
                && want_rank.is_none_or(|r| m.from.rank() == r)
                && m.promotion == promotion
        })
        .collect();

    match candidates.as_slice() {
        [] => Err(ChessError::illegal(raw, "no legal move matches")),
        [mv] => Ok(*mv),
        many => Err(ChessError::illegal(
            raw,
            format!("ambiguous, {} candidates", many.len()),
        )),
    }
}

fn find_castling(legal: &[Move], raw: &str, queenside: bool) -> Result<Move, ChessError> {
    legal
        .iter()
        .find(|m| m.flags.is_castling() && m.flags.is_queenside_castle() == queenside)
        .copied()
        .ok_or_else(|| ChessError::illegal(raw, "castling not available"))
}

// =========================================================================
// Tests
// =========================================================================
