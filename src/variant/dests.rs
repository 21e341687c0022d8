//! Legal destination squares per origin square, for board highlighting.

use std::collections::{BTreeMap, BTreeSet};

use crate::engine::board::Position;
use crate::engine::movegen;
use crate::engine::types::{CastlingRights, ChessError, Move, Square};

use super::castling::CastleSide;
use super::category::Category;
use super::holdings::Holdings;
use super::interpret::VariantRules;
use super::moves::MoveInput;

/// Origin square to the set of squares its piece may move to.
pub type Destinations = BTreeMap<Square, BTreeSet<Square>>;

impl VariantRules {
    /// Every legal destination for the side to move.
    ///
    /// Variant castling appears as a king move: onto the castling rook in
    /// `wild/fr`, onto the king's landing square elsewhere. In `losers`,
    /// captures are compulsory, so when any exists only captures are listed.
    pub fn destinations(
        &self,
        pos: &Position,
        holdings: Option<&Holdings>,
    ) -> Result<Destinations, ChessError> {
        let category = self.category();
        category.ensure_supported()?;

        if category.is_orthodox() {
            return Ok(collect(movegen::legal_moves(pos)));
        }

        let mut work = pos.clone();
        work.castling_rights = CastlingRights::NONE;
        let mut moves = movegen::legal_moves(&work);

        if *category == Category::Losers && moves.iter().any(|m| is_capture(pos, m)) {
            moves.retain(|m| is_capture(pos, m));
            return Ok(collect(moves));
        }

        let mut dests = collect(moves);
        let anchor = self.anchors().for_color(pos.side_to_move);
        for side in [CastleSide::Short, CastleSide::Long] {
            let input = MoveInput::San(side.san().to_string());
            let Ok(outcome) = self.interpret(pos, &input, holdings) else {
                continue;
            };
            let (Some(from), Some(landing)) = (outcome.mv.from, outcome.mv.to) else {
                continue;
            };
            let to = if *category == Category::WildFr {
                anchor.rook_for(side).unwrap_or(landing)
            } else {
                landing
            };
            dests.entry(from).or_default().insert(to);
        }
        Ok(dests)
    }

    /// FEN-level form of [`VariantRules::destinations`].
    pub fn destinations_fen(
        &self,
        fen: &str,
        holdings: Option<&Holdings>,
    ) -> Result<Destinations, ChessError> {
        self.destinations(&Position::from_fen_unchecked(fen)?, holdings)
    }
}

/// One-shot form for callers without a [`VariantRules`] at hand.
pub fn destinations(
    fen: &str,
    start_fen: &str,
    category: &Category,
    holdings: Option<&Holdings>,
) -> Result<Destinations, ChessError> {
    category.ensure_supported()?;
    VariantRules::from_start_fen(category.clone(), start_fen)?.destinations_fen(fen, holdings)
}

fn is_capture(pos: &Position, mv: &Move) -> bool {
    mv.flags.is_capture() || pos.enemy().is_set(mv.to)
}

fn collect(moves: impl IntoIterator<Item = Move>) -> Destinations {
    let mut dests = Destinations::new();
    for mv in moves {
        dests.entry(mv.from).or_default().insert(mv.to);
    }
    dests
}
