//! Turn-engine actions and the action history record.
//!
//! Actions are the only way a `Match` changes:
//! - `Roll`: roll the die with the match RNG
//! - `RollWith(v)`: apply a die value decided elsewhere (a relayed roll)
//! - `SelectMove(pawn)`: move one of the legal pawns
//! - `Advance`: hand the turn on after a move or a dead roll

use serde::{Deserialize, Serialize};

use super::pawn::PawnId;
use super::player::PlayerId;

/// A turn-engine action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Roll,
    RollWith(u8),
    SelectMove(PawnId),
    Advance,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Roll => f.write_str("roll"),
            Action::RollWith(v) => write!(f, "roll({v})"),
            Action::SelectMove(pawn) => write!(f, "move {pawn}"),
            Action::Advance => f.write_str("advance"),
        }
    }
}

/// An accepted action with metadata, kept in the match history.
///
/// Used for replay and debugging.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The seat that acted.
    pub player: PlayerId,

    /// The action taken.
    pub action: Action,

    /// Die value produced by a roll action.
    pub dice: Option<u8>,

    /// Turn number when the action was taken.
    pub turn: u32,

    /// Sequence number within the turn (for ordering).
    pub sequence: u32,
}

impl ActionRecord {
    #[must_use]
    pub fn new(player: PlayerId, action: Action, dice: Option<u8>, turn: u32, sequence: u32) -> Self {
        Self {
            player,
            action,
            dice,
            turn,
            sequence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Color;

    #[test]
    fn test_action_display() {
        let pawn = PawnId::new(Color::Yellow, 1).unwrap();
        assert_eq!(Action::SelectMove(pawn).to_string(), "move yellow-1");
        assert_eq!(Action::RollWith(6).to_string(), "roll(6)");
    }

    #[test]
    fn test_action_record_serialization() {
        let pawn = PawnId::new(Color::Red, 0).unwrap();
        let record = ActionRecord::new(PlayerId(0), Action::SelectMove(pawn), None, 2, 1);

        let json = serde_json::to_string(&record).unwrap();
        let back: ActionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }
}
