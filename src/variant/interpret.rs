//! Variant move interpreter.
//!
//! Orthodox categories go straight to the rules library. Every other
//! category layers its own handling on top of it:
//!
//! - castling is resolved against the game's anchors, so Chess960 and wild
//!   back ranks castle correctly;
//! - drops place a held piece on an empty square (crazyhouse, bughouse);
//! - a mate that a drop could still block is reported as check in the
//!   drop variants.

use tracing::{debug, trace};

use crate::engine::board::Position;
use crate::engine::san::check_suffix;
use crate::engine::types::{CastlingRights, ChessError, Color, MoveFlags, PieceType, Square};

use super::attack::is_attacked;
use super::castling::{CastleSide, CastlingAnchors, adjust_castling_rights};
use super::category::Category;
use super::fen::adjacent_squares;
use super::holdings::Holdings;
use super::moves::{CanonicalMove, MoveInput};
use super::standard::apply_standard;

/// Result of a successfully interpreted move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub position: Position,
    pub mv: CanonicalMove,
}

/// What a move input turns out to be once the position is known.
enum Intent {
    Castle(CastleSide),
    Drop { piece: PieceType, to: Square },
    Regular,
}

/// Rules for one game: its category and the castling anchors of its
/// starting position. Built once per game and shared by every move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariantRules {
    category: Category,
    anchors: CastlingAnchors,
}

impl VariantRules {
    pub fn new(category: Category, start: &Position) -> Self {
        let anchors = CastlingAnchors::locate(start, &category);
        VariantRules { category, anchors }
    }

    pub fn from_start_fen(category: Category, start_fen: &str) -> Result<Self, ChessError> {
        let start = Position::from_fen_unchecked(start_fen)?;
        Ok(Self::new(category, &start))
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn anchors(&self) -> &CastlingAnchors {
        &self.anchors
    }

    /// Legalize `input` in `pos` and play it.
    ///
    /// `holdings`, when given, restrict drops to pieces actually in hand and
    /// decide crazyhouse mate demotion. They are only read.
    pub fn interpret(
        &self,
        pos: &Position,
        input: &MoveInput,
        holdings: Option<&Holdings>,
    ) -> Result<MoveOutcome, ChessError> {
        self.category.ensure_supported()?;

        let outcome = if self.category.is_orthodox() {
            let (position, mv) = apply_standard(pos, input)?;
            MoveOutcome { position, mv }
        } else {
            self.interpret_variant(pos, input, holdings)?
        };

        if outcome.position.placement() == pos.placement() {
            debug!(category = %self.category, %input, "move leaves the board unchanged");
            return Err(ChessError::illegal(input, "board unchanged"));
        }
        Ok(outcome)
    }

    fn interpret_variant(
        &self,
        pos: &Position,
        input: &MoveInput,
        holdings: Option<&Holdings>,
    ) -> Result<MoveOutcome, ChessError> {
        let mut outcome = match self.classify(pos, input)? {
            Intent::Castle(side) => self.castle(pos, side)?,
            Intent::Drop { piece, to } => self.drop_piece(pos, piece, to, holdings)?,
            Intent::Regular => self.regular(pos, input)?,
        };
        if self.category.is_drop_variant() {
            outcome.position.halfmove_clock = 0;
            self.demote_blockable_mate(&mut outcome, holdings);
        }
        Ok(outcome)
    }

    fn classify(&self, pos: &Position, input: &MoveInput) -> Result<Intent, ChessError> {
        match input {
            MoveInput::Remove { .. } => Err(ChessError::illegal(
                input,
                "pieces cannot be removed during play",
            )),
            MoveInput::Drop { piece, to } => Ok(Intent::Drop {
                piece: *piece,
                to: *to,
            }),
            MoveInput::San(text) => {
                if let Some(side) = CastleSide::from_san(text) {
                    return Ok(Intent::Castle(side));
                }
                if input.is_drop() {
                    return match MoveInput::parse(text)? {
                        MoveInput::Drop { piece, to } => Ok(Intent::Drop { piece, to }),
                        _ => Err(ChessError::illegal(input, "malformed drop")),
                    };
                }
                Ok(Intent::Regular)
            }
            MoveInput::Board { from, to, .. } => {
                let us = pos.side_to_move;
                let king_move = pos.piece_at(*from) == Some((us, PieceType::King));
                let onto_rook = pos.piece_at(*to) == Some((us, PieceType::Rook));
                if king_move
                    && from.rank() == to.rank()
                    && (onto_rook || from.file().abs_diff(to.file()) >= 2)
                {
                    let anchor = self.anchors.for_color(us);
                    return Ok(Intent::Castle(anchor.side_toward(to.file() > from.file())));
                }
                Ok(Intent::Regular)
            }
        }
    }

    /// Ordinary moves, with castling hidden from the library and the rights
    /// rebuilt from the anchors afterwards.
    fn regular(&self, pos: &Position, input: &MoveInput) -> Result<MoveOutcome, ChessError> {
        let mut work = pos.clone();
        work.castling_rights = CastlingRights::NONE;
        let (mut position, mv) = apply_standard(&work, input)?;
        position.castling_rights = pos.castling_rights;
        position.castling_rights = adjust_castling_rights(&position, &self.anchors);
        Ok(MoveOutcome { position, mv })
    }

    fn drop_piece(
        &self,
        pos: &Position,
        piece: PieceType,
        to: Square,
        holdings: Option<&Holdings>,
    ) -> Result<MoveOutcome, ChessError> {
        let us = pos.side_to_move;
        let notation = format!("{}@{to}", piece.san_letter());
        let reject = |reason: &str| {
            debug!(category = %self.category, mv = %notation, reason, "drop rejected");
            ChessError::illegal(&notation, reason)
        };

        if !self.category.is_drop_variant() {
            return Err(reject("drops are not allowed in this category"));
        }
        if piece == PieceType::King {
            return Err(reject("kings cannot be dropped"));
        }
        if pos.piece_at(to).is_some() {
            return Err(reject("square is occupied"));
        }
        if piece == PieceType::Pawn && (to.rank() == 0 || to.rank() == 7) {
            return Err(reject("pawns cannot be dropped on the first or last rank"));
        }
        if holdings.is_some_and(|h| !h.has(us, piece)) {
            return Err(reject("piece not in hand"));
        }

        let mut next = pos.clone();
        next.put_piece(to, us, piece);
        if next.is_color_in_check(us) {
            return Err(reject("king would be in check"));
        }
        next.en_passant = None;
        next.halfmove_clock = 0;
        finish_turn(&mut next, us);

        let san = format!("{notation}{}", check_suffix(&next));
        Ok(MoveOutcome {
            position: next,
            mv: CanonicalMove {
                san,
                color: us,
                piece,
                from: None,
                to: Some(to),
                promotion: None,
                captured: None,
                flags: MoveFlags::DROP,
            },
        })
    }

    /// Castling by anchors.
    ///
    /// In `wild/fr` the king lands on the g- or c-file and the rook beside
    /// it, toward the centre. Elsewhere the king moves two files toward its
    /// rook, which jumps over it.
    fn castle(&self, pos: &Position, side: CastleSide) -> Result<MoveOutcome, ChessError> {
        let us = pos.side_to_move;
        let reject = |reason: &str| {
            debug!(category = %self.category, mv = side.san(), reason, "castling rejected");
            ChessError::illegal(side.san(), reason)
        };

        if !pos.castling_rights.has(side.rights_flag(us)) {
            return Err(reject("no castling right"));
        }
        let anchor = self.anchors.for_color(us);
        let (Some(king_from), Some(rook_from)) = (anchor.king, anchor.rook_for(side)) else {
            return Err(reject("no castling king or rook"));
        };
        if pos.piece_at(king_from) != Some((us, PieceType::King))
            || pos.piece_at(rook_from) != Some((us, PieceType::Rook))
        {
            return Err(reject("king or rook has left its square"));
        }

        let rank = king_from.rank();
        let (king_to, rook_to) = if self.category == Category::WildFr {
            match side {
                CastleSide::Short => (Square::from_file_rank(6, rank), Square::from_file_rank(5, rank)),
                CastleSide::Long => (Square::from_file_rank(2, rank), Square::from_file_rank(3, rank)),
            }
        } else {
            let step: i8 = if rook_from.file() > king_from.file() { 1 } else { -1 };
            match (king_from.offset(2 * step, 0), king_from.offset(step, 0)) {
                (Some(k), Some(r)) => (k, r),
                _ => return Err(reject("no room to castle")),
            }
        };

        let passable = |sq: Square| sq == king_from || sq == rook_from || pos.piece_at(sq).is_none();

        let mut lifted = pos.clone();
        lifted.remove_piece(rook_from, us, PieceType::Rook);
        for sq in span(king_from, king_to) {
            if !passable(sq) {
                return Err(reject("king's path is blocked"));
            }
            if is_attacked(&lifted, sq, us) {
                return Err(reject("king passes through check"));
            }
        }
        if !span(rook_from, rook_to).all(passable) {
            return Err(reject("rook's path is blocked"));
        }

        let mut next = pos.clone();
        next.remove_piece(king_from, us, PieceType::King);
        next.remove_piece(rook_from, us, PieceType::Rook);
        next.put_piece(king_to, us, PieceType::King);
        next.put_piece(rook_to, us, PieceType::Rook);

        next.castling_rights.remove(side.rights_flag(us));
        if king_to != king_from {
            next.castling_rights.remove(side.other().rights_flag(us));
        }
        next.castling_rights = adjust_castling_rights(&next, &self.anchors);
        next.en_passant = None;
        next.halfmove_clock = next.halfmove_clock.saturating_add(1);
        finish_turn(&mut next, us);

        let mut flags = MoveFlags::CASTLING;
        if side == CastleSide::Long {
            flags = flags | MoveFlags::QUEENSIDE;
        }
        let san = format!("{}{}", side.san(), check_suffix(&next));
        Ok(MoveOutcome {
            position: next,
            mv: CanonicalMove {
                san,
                color: us,
                piece: PieceType::King,
                from: Some(king_from),
                to: Some(king_to),
                promotion: None,
                captured: None,
                flags,
            },
        })
    }

    /// Turn a reported mate into check when a piece dropped next to the mated
    /// king would cut the attack.
    ///
    /// Bughouse always demotes such a mate: the partner may still pass the
    /// piece. Crazyhouse demotes only if the mated side holds a piece that
    /// could be dropped on one of the blocking squares.
    fn demote_blockable_mate(&self, outcome: &mut MoveOutcome, holdings: Option<&Holdings>) {
        if !outcome.mv.san.ends_with('#') {
            return;
        }
        let pos = &outcome.position;
        let mated = pos.side_to_move;
        let Some(king) = pos.king_sq(mated) else {
            return;
        };

        let blocks: Vec<Square> = adjacent_squares(king)
            .into_iter()
            .filter(|&sq| pos.piece_at(sq).is_none() && blocks_check(pos, sq, mated))
            .collect();
        if blocks.is_empty() {
            return;
        }

        let demote = match self.category {
            Category::Bughouse => true,
            Category::Crazyhouse => holdings.is_some_and(|h| {
                h.has_non_pawn(mated)
                    || (h.has(mated, PieceType::Pawn)
                        && blocks.iter().any(|sq| sq.rank() != 0 && sq.rank() != 7))
            }),
            _ => false,
        };
        if demote {
            trace!(category = %self.category, san = %outcome.mv.san, "mate can be blocked by a drop");
            outcome.mv.san.pop();
            outcome.mv.san.push('+');
        }
    }

    /// Interpret a move given as FEN strings. Returns the new FEN.
    pub fn interpret_fen(
        &self,
        fen: &str,
        input: &MoveInput,
        holdings: Option<&Holdings>,
    ) -> Result<(String, CanonicalMove), ChessError> {
        let pos = Position::from_fen_unchecked(fen)?;
        let outcome = self.interpret(&pos, input, holdings)?;
        Ok((outcome.position.to_fen(), outcome.mv))
    }
}

/// One-shot form for callers without a [`VariantRules`] at hand.
pub fn interpret(
    fen: &str,
    input: &MoveInput,
    start_fen: &str,
    category: &Category,
    holdings: Option<&Holdings>,
) -> Result<(String, CanonicalMove), ChessError> {
    category.ensure_supported()?;
    VariantRules::from_start_fen(category.clone(), start_fen)?.interpret_fen(fen, input, holdings)
}

/// Would a friendly piece on `sq` take `color`'s king out of check?
fn blocks_check(pos: &Position, sq: Square, color: Color) -> bool {
    let mut probe = pos.clone();
    probe.put_piece(sq, color, PieceType::Pawn);
    !probe.is_color_in_check(color)
}

/// Hand the move to the other side.
fn finish_turn(pos: &mut Position, mover: Color) {
    if mover == Color::Black {
        pos.fullmove_number = pos.fullmove_number.saturating_add(1);
    }
    pos.side_to_move = !mover;
}

/// Squares from `a` to `b` inclusive along their shared rank.
fn span(a: Square, b: Square) -> impl Iterator<Item = Square> {
    let rank = a.rank();
    let (lo, hi) = (a.file().min(b.file()), a.file().max(b.file()));
    (lo..=hi).map(move |file| Square::from_file_rank(file, rank))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::STARTING_FEN;
    use crate::variant::castling::CastlingAnchor;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn pos(fen: &str) -> Position {
        Position::from_fen_unchecked(fen).unwrap()
    }

    fn rules(category: Category, start: &str) -> VariantRules {
        VariantRules::from_start_fen(category, start).unwrap()
    }

    fn play(
        rules: &VariantRules,
        fen: &str,
        text: &str,
        holdings: Option<&Holdings>,
    ) -> Result<MoveOutcome, ChessError> {
        rules.interpret(&pos(fen), &MoveInput::parse(text).unwrap(), holdings)
    }

    const FR_START: &str = "bbqnnrkr/pppppppp/8/8/8/8/PPPPPPPP/BBQNNRKR w KQkq - 0 1";

    #[test]
    fn unsupported_category() {
        let r = rules(Category::from("atomic"), STARTING_FEN);
        assert_eq!(
            play(&r, STARTING_FEN, "e2e4", None),
            Err(ChessError::UnsupportedCategory("atomic".into()))
        );
    }

    #[test]
    fn orthodox_delegates() {
        let r = rules(Category::Blitz, STARTING_FEN);
        let out = play(&r, STARTING_FEN, "e2-e4", None).unwrap();
        assert_eq!(out.mv.san, "e4");
        assert_eq!(
            out.position.to_fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
    }

    #[test]
    fn regular_variant_move_keeps_rights() {
        let r = rules(Category::WildFr, FR_START);
        let out = play(&r, FR_START, "e2e4", None).unwrap();
        assert_eq!(out.position.castling_rights.to_fen(), "KQkq");
        let by_coordinates = play(&r, FR_START, "d1c3", None).unwrap();
        let by_san = play(&r, FR_START, "Nc3", None).unwrap();
        assert_eq!(by_coordinates, by_san);
        assert_eq!(by_san.mv.san, "Nc3");
    }

    #[test]
    fn fr_castle_with_king_on_g_file() {
        // King g1 and rook h1: short castling only moves the rook to f1, but
        // f1 holds the other rook, so the path is blocked.
        let r = rules(Category::WildFr, FR_START);
        let fen = "bbqnnrkr/pppppppp/8/8/8/8/PPPPPPPP/BBQNNRKR w KQkq - 0 1";
        assert!(play(&r, fen, "O-O", None).is_err());
    }

    #[test]
    fn fr_long_castle_across_the_board() {
        let start = "rkrbbqnn/pppppppp/8/8/8/8/PPPPPPPP/RKRBBQNN w KQkq - 0 1";
        let r = rules(Category::WildFr, start);
        // Rook a1 is the long rook; c1, d1 and e1 cleared.
        let fen = "rkrbbqnn/pppppppp/8/8/8/8/PPPPPPPP/RK3QNN w KQkq - 0 1";
        let out = play(&r, fen, "O-O-O", None).unwrap();
        assert_eq!(out.position.piece_at(sq("c1")), Some((Color::White, PieceType::King)));
        assert_eq!(out.position.piece_at(sq("d1")), Some((Color::White, PieceType::Rook)));
        assert_eq!(out.position.castling_rights.to_fen(), "kq");
        assert!(out.mv.flags.is_queenside_castle());
        // The d1 rook blocks the castling rook's landing square.
        assert!(play(&r, "rkrbbqnn/pppppppp/8/8/8/8/PPPPPPPP/RK1RBQNN w KQkq - 0 1", "O-O-O", None).is_err());
    }

    #[test]
    fn king_onto_own_rook_is_castling() {
        let start = "rk4r1/8/8/8/8/8/8/RK4R1 w KQkq - 0 1";
        let r = rules(Category::WildFr, start);
        let out = play(&r, start, "b1a1", None).unwrap();
        assert_eq!(out.mv.san, "O-O-O");
        assert_eq!(out.position.piece_at(sq("c1")), Some((Color::White, PieceType::King)));
        assert_eq!(out.position.piece_at(sq("d1")), Some((Color::White, PieceType::Rook)));
        assert_eq!(out.position.castling_rights.to_fen(), "kq");
        assert_eq!(out.mv.to_coordinate_string(), "O-O-O");
    }

    #[test]
    fn castling_through_attack_is_rejected() {
        let r = rules(Category::Crazyhouse, STARTING_FEN);
        let fen = "4k3/8/8/8/8/8/5r2/R3K2R w KQ - 0 1";
        let err = play(&r, fen, "O-O", None);
        assert!(err.is_err());
        let ok = play(&r, "4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1", "e1g1", None).unwrap();
        assert_eq!(ok.mv.san, "O-O");
        assert_eq!(ok.position.to_fen(), "4k3/8/8/8/8/8/8/R4RK1 b - - 0 1");
    }

    #[test]
    fn castling_needs_the_right() {
        let r = rules(Category::Losers, STARTING_FEN);
        assert!(play(&r, "4k3/8/8/8/8/8/8/R3K2R w Q - 0 1", "O-O", None).is_err());
        let out = play(&r, "4k3/8/8/8/8/8/8/R3K2R w Q - 0 1", "O-O-O", None).unwrap();
        assert_eq!(out.position.to_fen(), "4k3/8/8/8/8/8/8/2KR3R b - - 1 1");
    }

    #[test]
    fn wild_d_file_king_castles_toward_a_file() {
        // wild/1 with both kings on d: short castling heads for the a-side.
        let start = "r2k3r/8/8/8/8/8/8/R2K3R w KQkq - 0 1";
        let r = rules(Category::Wild1, start);
        let out = play(&r, start, "O-O", None).unwrap();
        assert_eq!(out.position.piece_at(sq("b1")), Some((Color::White, PieceType::King)));
        assert_eq!(out.position.piece_at(sq("c1")), Some((Color::White, PieceType::Rook)));
        let by_drag = play(&r, start, "d1b1", None).unwrap();
        assert_eq!(by_drag.position, out.position);
    }

    #[test]
    fn moving_a_rook_strips_its_side() {
        let r = rules(Category::Wild5, STARTING_FEN);
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
        let out = play(&r, fen, "h1h5", None).unwrap();
        assert_eq!(out.position.castling_rights.to_fen(), "Qkq");
        let out = play(&r, fen, "a1a8", None).unwrap();
        assert_eq!(out.position.castling_rights.to_fen(), "Kk");
    }

    #[test]
    fn drops() {
        let r = rules(Category::Crazyhouse, STARTING_FEN);
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        let hand = Holdings::from_letters("N").unwrap();
        let out = play(&r, "4k3/8/8/8/8/8/8/4K3 w - - 7 30", "N@e4", Some(&hand)).unwrap();
        assert_eq!(out.mv.san, "N@e4");
        assert!(out.mv.flags.is_drop());
        assert_eq!(out.mv.from, None);
        assert_eq!(out.position.halfmove_clock, 0);
        assert_eq!(out.position.to_fen(), "4k3/8/8/8/4N3/8/8/4K3 b - - 0 30");

        let as_san = MoveInput::San("N@e4".into());
        let by_san = r.interpret(&pos("4k3/8/8/8/8/8/8/4K3 w - - 7 30"), &as_san, Some(&hand));
        assert_eq!(by_san.unwrap(), out);

        assert!(play(&r, fen, "N@e2", Some(&hand)).is_err(), "occupied");
        assert!(play(&r, "4k3/8/8/8/8/8/8/4K3 w - - 0 1", "Q@d4", Some(&hand)).is_err(), "not held");
        assert!(play(&r, "4k3/8/8/8/8/8/8/4K3 w - - 0 1", "Q@d4", None).is_ok(), "no holdings given");
        assert!(play(&r, "4k3/8/8/8/8/8/8/4K3 w - - 0 1", "P@a8", None).is_err());
        assert!(play(&r, "4k3/8/8/8/8/8/8/4K3 w - - 0 1", "P@h1", None).is_err());
    }

    #[test]
    fn drops_outside_drop_variants() {
        let r = rules(Category::Losers, STARTING_FEN);
        assert!(play(&r, "4k3/8/8/8/8/8/8/4K3 w - - 0 1", "N@e4", None).is_err());
    }

    #[test]
    fn drop_must_answer_check() {
        let r = rules(Category::Bughouse, STARTING_FEN);
        // Rook on e8 checks the king on e1.
        let fen = "4r2k/8/8/8/8/8/8/4K3 w - - 0 1";
        let out = play(&r, fen, "N@e4", None).unwrap();
        assert_eq!(out.mv.san, "N@e4");
        assert!(play(&r, fen, "N@a4", None).is_err());
    }

    #[test]
    fn crazyhouse_mate_demotion() {
        let r = rules(Category::Crazyhouse, STARTING_FEN);
        // Back-rank mate: Ra8# against the king on g8 boxed in by its pawns.
        // f8 is the only square a dropped piece could block on.
        let fen = "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1";
        let mated = play(&r, fen, "Ra8", Some(&Holdings::new())).unwrap();
        assert_eq!(mated.mv.san, "Ra8#");
        let out = play(&r, fen, "Ra8", Some(&Holdings::from_letters("n").unwrap())).unwrap();
        assert_eq!(out.mv.san, "Ra8+");
        // A pawn cannot go to the back rank, so it does not help.
        let out = play(&r, fen, "Ra8", Some(&Holdings::from_letters("p").unwrap())).unwrap();
        assert_eq!(out.mv.san, "Ra8#");
    }

    #[test]
    fn bughouse_mate_demotion_without_holdings() {
        let r = rules(Category::Bughouse, STARTING_FEN);
        let fen = "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1";
        let out = play(&r, fen, "Ra8", Some(&Holdings::new())).unwrap();
        assert_eq!(out.mv.san, "Ra8+");
        assert_eq!(out.position.halfmove_clock, 0);
    }

    #[test]
    fn contact_mate_is_not_demoted() {
        let r = rules(Category::Bughouse, STARTING_FEN);
        // Queen on g7 protected by the king: nothing can be dropped in between.
        let fen = "7k/8/6KQ/8/8/8/8/8 w - - 0 1";
        let out = play(&r, fen, "Qg7", None).unwrap();
        assert_eq!(out.mv.san, "Qg7#");
    }

    #[test]
    fn removal_is_rejected() {
        let r = rules(Category::Crazyhouse, STARTING_FEN);
        assert!(play(&r, STARTING_FEN, "xa1", None).is_err());
    }

    #[test]
    fn same_square_input_is_rejected() {
        for category in [Category::Standard, Category::Crazyhouse, Category::WildFr] {
            let r = rules(category, STARTING_FEN);
            assert!(matches!(
                play(&r, STARTING_FEN, "e2e2", None),
                Err(ChessError::IllegalMove { .. })
            ));
        }
    }

    #[test]
    fn castling_that_moves_nothing_is_rejected() {
        // King and short rook already stand on their Chess960 landing squares.
        let anchor = CastlingAnchor {
            color: Color::White,
            king: Some(sq("g1")),
            left_rook: None,
            right_rook: Some(sq("f1")),
            short_is_left: false,
        };
        let r = VariantRules {
            category: Category::WildFr,
            anchors: CastlingAnchors {
                white: anchor,
                black: CastlingAnchor {
                    color: Color::Black,
                    king: None,
                    left_rook: None,
                    right_rook: None,
                    short_is_left: false,
                },
            },
        };
        let err = play(&r, "4k3/8/8/8/8/8/8/5RK1 w K - 0 1", "O-O", None).unwrap_err();
        assert!(
            matches!(&err, ChessError::IllegalMove { reason, .. } if reason == "board unchanged"),
            "{err}"
        );
    }

    #[test]
    fn move_counters_saturate() {
        let start = "r3k3/8/8/8/8/8/8/4K3 b q - 0 1";
        let r = rules(Category::WildFr, start);
        let out = play(&r, "r3k3/8/8/8/8/8/8/4K3 b q - 65535 65535", "O-O-O", None).unwrap();
        assert_eq!(out.position.piece_at(sq("c8")), Some((Color::Black, PieceType::King)));
        assert_eq!(out.position.halfmove_clock, u16::MAX);
        assert_eq!(out.position.fullmove_number, u16::MAX);

        let r = rules(Category::Crazyhouse, STARTING_FEN);
        let out = play(&r, "4k3/8/8/8/8/8/8/4K3 b - - 0 65535", "N@e4", None).unwrap();
        assert_eq!(out.position.fullmove_number, u16::MAX);
        let dests = r
            .destinations(&pos("4k3/8/8/8/8/8/8/4K3 w - - 65535 1"), None)
            .unwrap();
        assert_eq!(dests[&sq("e1")].len(), 5);
    }

    #[test]
    fn fen_level_entry_point() {
        let (fen, mv) = interpret(
            STARTING_FEN,
            &MoveInput::parse("e2e4").unwrap(),
            STARTING_FEN,
            &Category::Crazyhouse,
            None,
        )
        .unwrap();
        assert_eq!(mv.san, "e4");
        assert_eq!(fen, "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
    }
}
