//! Game event types.
//!
//! Every accepted turn-engine operation reports what happened as a list of
//! events. Renderers replay them (hop paths included); hosts turn them into
//! relay messages for replicas.

use serde::{Deserialize, Serialize};

use crate::board::HopPath;
use crate::core::{LegalMoves, Location, PawnId, PlayerId};

/// Something that happened in a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// The active player rolled.
    DiceRolled {
        player: PlayerId,
        value: u8,
        legal: LegalMoves,
    },

    /// The roll left no pawn able to move; the turn will be handed on.
    NoLegalMove { player: PlayerId, value: u8 },

    /// A pawn moved along `path` (excluding its starting cell).
    PawnMoved {
        player: PlayerId,
        pawn: PawnId,
        from: Location,
        to: Location,
        path: HopPath,
    },

    /// An opposing pawn was sent back to base.
    PawnCaptured {
        pawn: PawnId,
        by: PawnId,
        /// Global ring index of the capture.
        cell: u8,
        from: Location,
    },

    /// A player brought all four pawns home, or was ranked last.
    PlayerRanked { player: PlayerId, rank: u8 },

    /// The turn was handed on (or kept, for a bonus roll).
    TurnAdvanced {
        from: PlayerId,
        to: PlayerId,
        bonus: bool,
    },

    /// Three players are ranked; `standings` is ordered first to last.
    MatchOver { standings: Vec<PlayerId> },
}

impl GameEvent {
    /// The seat this event concerns most directly.
    #[must_use]
    pub fn player(&self) -> Option<PlayerId> {
        match self {
            GameEvent::DiceRolled { player, .. }
            | GameEvent::NoLegalMove { player, .. }
            | GameEvent::PawnMoved { player, .. }
            | GameEvent::PlayerRanked { player, .. } => Some(*player),
            GameEvent::TurnAdvanced { from, .. } => Some(*from),
            GameEvent::PawnCaptured { .. } | GameEvent::MatchOver { .. } => None,
        }
    }

    #[must_use]
    pub fn is_capture(&self) -> bool {
        matches!(self, GameEvent::PawnCaptured { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Color;

    #[test]
    fn test_event_player() {
        let event = GameEvent::TurnAdvanced {
            from: PlayerId(1),
            to: PlayerId(2),
            bonus: false,
        };
        assert_eq!(event.player(), Some(PlayerId(1)));

        let over = GameEvent::MatchOver { standings: vec![] };
        assert_eq!(over.player(), None);
    }

    #[test]
    fn test_event_json_is_tagged() {
        let event = GameEvent::PawnCaptured {
            pawn: PawnId::new(Color::Blue, 1).unwrap(),
            by: PawnId::new(Color::Red, 0).unwrap(),
            cell: 3,
            from: Location::new(16).unwrap(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "pawn_captured");
        assert_eq!(json["pawn"], "blue-1");
        assert!(event.is_capture());
    }
}
