//! Rules engine trait.
//!
//! The turn engine is exposed through `RulesEngine` so drivers (the session
//! table, bots, simulations, replicas) all act through one surface:
//! - What actions are legal for a seat
//! - How an action changes a match
//! - Whether the match is over

use crate::core::{Action, EngineError, Match, PlayerId};
use crate::events::GameEvent;

/// Final result of a match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameResult {
    /// Seats ordered first to last.
    pub standings: Vec<PlayerId>,
}

impl GameResult {
    /// The first-placed seat.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.standings.first().copied()
    }

    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        self.winner() == Some(player)
    }

    /// 1-based finishing position of a seat.
    #[must_use]
    pub fn rank_of(&self, player: PlayerId) -> Option<u8> {
        self.standings
            .iter()
            .position(|&p| p == player)
            .map(|i| i as u8 + 1)
    }
}

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `legal_actions`: empty if the seat cannot act
/// - `apply_action`: must reject without mutating; deterministic given the match RNG
/// - `is_terminal`: `None` while the match continues
pub trait RulesEngine {
    /// Actions a seat may take right now.
    fn legal_actions(&self, state: &Match, player: PlayerId) -> Vec<Action>;

    /// Apply an action claimed by `player`.
    fn apply_action(&self, state: &mut Match, player: PlayerId, action: &Action) -> Result<Vec<GameEvent>, EngineError>;

    /// Check if the match is over.
    fn is_terminal(&self, state: &Match) -> Option<GameResult>;

    // === Convenience Methods ===

    /// Pure transition: returns the next match and leaves `state` untouched.
    fn step(&self, state: &Match, player: PlayerId, action: &Action) -> Result<(Match, Vec<GameEvent>), EngineError> {
        let mut next = state.clone();
        let events = self.apply_action(&mut next, player, action)?;
        Ok((next, events))
    }
}
