//! Wire messages.
//!
//! Two directions:
//! - `Intent`: what a client asks an authoritative host to do
//!   (`{"action":"roll"}`, `{"action":"selectMove","pawnId":"red-0"}`)
//! - `SyncMessage`: what the relay forwards to every other client
//!   (`dice_rolled`, `move_pawn`, `next_turn`)
//!
//! Seat and location fields stay raw integers on the wire; `decode`
//! range-checks them.

use serde::{Deserialize, Serialize};

use crate::core::{Action, Location, PawnId, PlayerId, ProtocolError, SEAT_COUNT};
use crate::events::GameEvent;

/// A client's request to an authoritative host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Intent {
    Roll,
    #[serde(rename_all = "camelCase")]
    SelectMove { pawn_id: PawnId },
}

impl Intent {
    pub fn decode(json: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn encode(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl From<Intent> for Action {
    fn from(intent: Intent) -> Self {
        match intent {
            Intent::Roll => Action::Roll,
            Intent::SelectMove { pawn_id } => Action::SelectMove(pawn_id),
        }
    }
}

/// A state transition as relayed between clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SyncMessage {
    #[serde(rename_all = "camelCase")]
    DiceRolled { value: u8, player_index: u8 },
    #[serde(rename_all = "camelCase")]
    MovePawn {
        pawn_id: PawnId,
        final_location: i8,
        player_index: u8,
    },
    #[serde(rename_all = "camelCase")]
    NextTurn { next_index: u8 },
}

impl SyncMessage {
    /// Parse and range-check a relayed message.
    pub fn decode(json: &str) -> Result<Self, ProtocolError> {
        let message: SyncMessage = serde_json::from_str(json)?;
        message.seat()?;
        if let SyncMessage::MovePawn { final_location, .. } = message {
            Location::new(final_location).ok_or(ProtocolError::InvalidLocation(final_location))?;
        }
        Ok(message)
    }

    pub fn encode(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    /// The seat named by the message (the actor, or the next seat for `next_turn`).
    pub fn seat(&self) -> Result<PlayerId, ProtocolError> {
        let index = match *self {
            SyncMessage::DiceRolled { player_index, .. } | SyncMessage::MovePawn { player_index, .. } => player_index,
            SyncMessage::NextTurn { next_index } => next_index,
        };
        if (index as usize) < SEAT_COUNT {
            Ok(PlayerId(index))
        } else {
            Err(ProtocolError::UnknownSeat(index))
        }
    }

    /// The relay message for an engine event, if replicas need one.
    ///
    /// Captures, rankings and match over are not relayed: replicas derive
    /// them when they apply the move.
    #[must_use]
    pub fn from_event(event: &GameEvent) -> Option<Self> {
        match *event {
            GameEvent::DiceRolled { player, value, .. } => Some(SyncMessage::DiceRolled {
                value,
                player_index: player.0,
            }),
            GameEvent::PawnMoved { player, pawn, to, .. } => Some(SyncMessage::MovePawn {
                pawn_id: pawn,
                final_location: to.raw(),
                player_index: player.0,
            }),
            GameEvent::TurnAdvanced { to, .. } => Some(SyncMessage::NextTurn { next_index: to.0 }),
            _ => None,
        }
    }

    /// Relay messages for a batch of events, in order.
    #[must_use]
    pub fn from_events(events: &[GameEvent]) -> Vec<Self> {
        events.iter().filter_map(Self::from_event).collect()
    }
}
