//! Non-authoritative match copy fed by relay messages.
//!
//! The relay forwards whatever any client sends. A replica applies a message
//! only if it is consistent with its own copy of the match: the right seat,
//! the right phase, a legal pawn, the location the rules produce, and the
//! seat the rules would hand the turn to. Anything else is a desync and is
//! rejected without touching the match.

use tracing::warn;

use crate::core::{EngineError, Match, PhaseKind};
use crate::events::GameEvent;
use crate::rules::LudoRules;

use super::messages::SyncMessage;

/// A local match kept in step with relayed messages.
#[derive(Clone, Debug)]
pub struct Replica {
    rules: LudoRules,
    state: Match,
}

impl Replica {
    #[must_use]
    pub fn new(rules: LudoRules, state: Match) -> Self {
        Self { rules, state }
    }

    #[must_use]
    pub fn state(&self) -> &Match {
        &self.state
    }

    /// Apply one relayed message.
    pub fn apply(&mut self, message: &SyncMessage) -> Result<Vec<GameEvent>, EngineError> {
        let result = self.try_apply(message);
        if let Err(err) = &result {
            warn!(?message, %err, "rejected relayed message");
        }
        result
    }

    fn try_apply(&mut self, message: &SyncMessage) -> Result<Vec<GameEvent>, EngineError> {
        let seat = message
            .seat()
            .map_err(|err| EngineError::desync("a seat index", err))?;

        match *message {
            SyncMessage::DiceRolled { value, .. } => self.rules.roll_with(&mut self.state, seat, value),
            SyncMessage::MovePawn {
                pawn_id,
                final_location,
                ..
            } => {
                if self.state.phase.kind() == PhaseKind::AwaitingMove && seat == self.state.turn_index {
                    let expected = self
                        .rules
                        .preview(&self.state, pawn_id)
                        .ok_or(EngineError::IllegalMove(pawn_id))?;
                    if expected.raw() != final_location {
                        return Err(EngineError::desync(
                            format!("{pawn_id} to {expected}"),
                            format!("{pawn_id} to {final_location}"),
                        ));
                    }
                }
                self.rules.select_move(&mut self.state, seat, pawn_id)
            }
            SyncMessage::NextTurn { .. } => {
                if self.state.phase.kind() == PhaseKind::TurnEnded {
                    let expected = self.rules.next_turn(&self.state);
                    if expected != seat {
                        return Err(EngineError::desync(expected, seat));
                    }
                }
                self.rules.advance(&mut self.state)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Color, Location, PawnId, PlayerId};

    fn red(slot: u8) -> PawnId {
        PawnId::new(Color::Red, slot).unwrap()
    }

    #[test]
    fn test_applies_consistent_sequence() {
        let mut replica = Replica::new(LudoRules::default(), Match::all_bots(1));

        replica
            .apply(&SyncMessage::DiceRolled {
                value: 6,
                player_index: 0,
            })
            .unwrap();
        replica
            .apply(&SyncMessage::MovePawn {
                pawn_id: red(1),
                final_location: 0,
                player_index: 0,
            })
            .unwrap();
        replica.apply(&SyncMessage::NextTurn { next_index: 0 }).unwrap();

        assert_eq!(replica.state().pawn(red(1)).unwrap().location, Location::START);
        assert_eq!(replica.state().turn_index, PlayerId(0));
    }

    #[test]
    fn test_rejects_roll_for_wrong_seat() {
        let mut replica = Replica::new(LudoRules::default(), Match::all_bots(1));
        let err = replica
            .apply(&SyncMessage::DiceRolled {
                value: 6,
                player_index: 3,
            })
            .unwrap_err();
        assert!(matches!(err, EngineError::NotYourTurn { .. }));
        assert_eq!(replica.state().version, 0);
    }

    #[test]
    fn test_rejects_forged_final_location() {
        let mut replica = Replica::new(LudoRules::default(), Match::all_bots(1));
        replica
            .apply(&SyncMessage::DiceRolled {
                value: 6,
                player_index: 0,
            })
            .unwrap();

        let err = replica
            .apply(&SyncMessage::MovePawn {
                pawn_id: red(0),
                final_location: 40,
                player_index: 0,
            })
            .unwrap_err();
        assert!(matches!(err, EngineError::Desync { .. }));
        assert_eq!(replica.state().pawn(red(0)).unwrap().location, Location::BASE);
    }

    #[test]
    fn test_rejects_wrong_next_turn() {
        let mut replica = Replica::new(LudoRules::default(), Match::all_bots(1));
        replica
            .apply(&SyncMessage::DiceRolled {
                value: 2,
                player_index: 0,
            })
            .unwrap();

        let err = replica.apply(&SyncMessage::NextTurn { next_index: 2 }).unwrap_err();
        assert_eq!(err, EngineError::desync(PlayerId(1), PlayerId(2)));
        assert!(replica.apply(&SyncMessage::NextTurn { next_index: 1 }).is_ok());
    }

    #[test]
    fn test_rejects_unknown_seat() {
        let mut replica = Replica::new(LudoRules::default(), Match::all_bots(1));
        let err = replica.apply(&SyncMessage::NextTurn { next_index: 9 }).unwrap_err();
        assert!(matches!(err, EngineError::Desync { .. }));
    }
}
