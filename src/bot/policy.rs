//! Bot move-selection policies.
//!
//! A policy only sees the public `Match` and picks among the legal pawns;
//! it has no path into the engine that a human lacks.

use crate::core::{Action, GameRng, Match, PawnId, PlayerId, TurnPhase};

/// Chooses which legal pawn to move.
pub trait MovePolicy: Send + Sync {
    /// Pick a pawn from `legal`. Returns `None` only when `legal` is empty.
    fn choose_pawn(&self, state: &Match, legal: &[PawnId], rng: &mut GameRng) -> Option<PawnId>;
}

/// Leave base whenever possible, otherwise pick uniformly at random.
#[derive(Clone, Copy, Debug, Default)]
pub struct BaseFirst;

impl MovePolicy for BaseFirst {
    fn choose_pawn(&self, state: &Match, legal: &[PawnId], rng: &mut GameRng) -> Option<PawnId> {
        legal
            .iter()
            .copied()
            .find(|&id| state.pawn(id).is_some_and(|p| p.location.is_in_base()))
            .or_else(|| rng.choose(legal).copied())
    }
}

/// Always the first legal pawn. Used when a human's turn times out.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstLegal;

impl MovePolicy for FirstLegal {
    fn choose_pawn(&self, _state: &Match, legal: &[PawnId], _rng: &mut GameRng) -> Option<PawnId> {
        legal.first().copied()
    }
}

/// Uniformly random legal pawn.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformRandom;

impl MovePolicy for UniformRandom {
    fn choose_pawn(&self, _state: &Match, legal: &[PawnId], rng: &mut GameRng) -> Option<PawnId> {
        rng.choose(legal).copied()
    }
}

/// Decide the next action for `player` with `policy`.
///
/// Rolls when a roll is due, moves when a move is due, and otherwise does
/// nothing: advancing the turn is the table's job, not the player's.
pub fn decide(policy: &dyn MovePolicy, state: &Match, player: PlayerId, rng: &mut GameRng) -> Option<Action> {
    if state.is_over || state.turn_index != player || !state.players[player].is_racing() {
        return None;
    }
    match &state.phase {
        TurnPhase::AwaitingRoll => Some(Action::Roll),
        TurnPhase::AwaitingMove { legal } => policy.choose_pawn(state, legal, rng).map(Action::SelectMove),
        TurnPhase::TurnEnded { .. } | TurnPhase::MatchOver => None,
    }
}
