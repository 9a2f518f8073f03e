//! Match state.
//!
//! ## Match
//!
//! The single shared resource of a game session:
//! - Four players, each with four pawns
//! - Whose turn it is, the last die value, the turn-engine phase
//! - Ranking and termination
//! - Action history (`im::Vector`, O(1) clone) and the dice RNG
//!
//! A `Match` is a plain value: it is `Clone`, serializable, and only changes
//! through the turn engine in `crate::rules`.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::action::ActionRecord;
use super::color::Color;
use super::error::{EngineError, PhaseKind, SnapshotError};
use super::pawn::{Location, Pawn, PawnId};
use super::player::{PlayerId, PlayerMap, SEAT_COUNT};
use super::rng::GameRng;

/// Set of pawns that may move with the current roll.
pub type LegalMoves = SmallVec<[PawnId; 4]>;

/// Seat details supplied when a match is created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatConfig {
    pub id: String,
    pub name: String,
    pub avatar_ref: String,
    pub is_bot: bool,
}

impl SeatConfig {
    pub fn human(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar_ref: String::new(),
            is_bot: false,
        }
    }

    pub fn bot(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            is_bot: true,
            ..Self::human(id, name)
        }
    }

    #[must_use]
    pub fn with_avatar(mut self, avatar_ref: impl Into<String>) -> Self {
        self.avatar_ref = avatar_ref.into();
        self
    }
}

/// A seated player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub avatar_ref: String,
    pub is_bot: bool,
    pub color: Color,
    /// Slot-indexed; `pawns[i].id.slot == i` always.
    pub pawns: [Pawn; 4],
    /// Finishing position, 1..=4. Set once, never cleared.
    pub rank: Option<u8>,
}

impl Player {
    fn seated(seat: SeatConfig, color: Color) -> Self {
        Self {
            id: seat.id,
            name: seat.name,
            avatar_ref: seat.avatar_ref,
            is_bot: seat.is_bot,
            color,
            pawns: std::array::from_fn(|slot| Pawn::new(PawnId { color, slot: slot as u8 })),
            rank: None,
        }
    }

    /// Still racing (no rank yet).
    #[must_use]
    pub fn is_racing(&self) -> bool {
        self.rank.is_none()
    }

    /// All four pawns are home.
    #[must_use]
    pub fn all_home(&self) -> bool {
        self.pawns.iter().all(|p| p.location.is_home())
    }

    #[must_use]
    pub fn pawn(&self, slot: u8) -> Option<&Pawn> {
        self.pawns.get(slot as usize)
    }
}

/// Why a turn ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnEnd {
    /// The roll produced no legal move.
    NoLegalMove,
    /// A pawn moved; `hops` is the length of its path.
    Moved { hops: usize },
}

/// Turn-engine phase.
///
/// Rolling and resolving are instantaneous here; their pacing lives in the
/// session table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    AwaitingRoll,
    AwaitingMove { legal: LegalMoves },
    TurnEnded { reason: TurnEnd },
    MatchOver,
}

impl TurnPhase {
    #[must_use]
    pub fn kind(&self) -> PhaseKind {
        match self {
            TurnPhase::AwaitingRoll => PhaseKind::AwaitingRoll,
            TurnPhase::AwaitingMove { .. } => PhaseKind::AwaitingMove,
            TurnPhase::TurnEnded { .. } => PhaseKind::TurnEnded,
            TurnPhase::MatchOver => PhaseKind::MatchOver,
        }
    }

    /// Legal pawns when awaiting a move, empty otherwise.
    #[must_use]
    pub fn legal_moves(&self) -> &[PawnId] {
        match self {
            TurnPhase::AwaitingMove { legal } => legal,
            _ => &[],
        }
    }
}

/// A four-player match.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Match {
    /// Seats in turn order: red, green, yellow, blue.
    pub(crate) players: PlayerMap<Player>,

    /// Whose turn it is.
    pub(crate) turn_index: PlayerId,

    /// Die value of the current turn, cleared on advance.
    pub(crate) dice_value: Option<u8>,

    /// Current turn-engine phase.
    pub(crate) phase: TurnPhase,

    /// Set once three players are ranked.
    pub(crate) is_over: bool,

    /// Turn number (starts at 1, bumped on every advance).
    pub(crate) turn_number: u32,

    /// Action sequence within the turn.
    pub(crate) action_sequence: u32,

    /// Bumped by every accepted transition.
    pub(crate) version: u64,

    /// Accepted actions, oldest first.
    pub(crate) history: Vector<ActionRecord>,

    pub(crate) rng: GameRng,

    /// Stream for bot choices, kept apart from the dice so replays match.
    pub(crate) bot_rng: GameRng,
}

impl Match {
    /// Create a match with all pawns in base and seat 0 to roll.
    #[must_use]
    pub fn new(seats: [SeatConfig; SEAT_COUNT], seed: u64) -> Self {
        let players = PlayerMap::new(|p| Player::seated(seats[p.index()].clone(), p.color()));

        Self {
            players,
            turn_index: PlayerId(0),
            dice_value: None,
            phase: TurnPhase::AwaitingRoll,
            is_over: false,
            turn_number: 1,
            action_sequence: 0,
            version: 0,
            history: Vector::new(),
            rng: GameRng::new(seed).for_context("dice"),
            bot_rng: GameRng::new(seed).for_context("bot"),
        }
    }

    /// One human in seat 0, bots in the other three seats.
    #[must_use]
    pub fn vs_computer(human: SeatConfig, seed: u64) -> Self {
        Self::new(
            [
                human,
                SeatConfig::bot("p2", "Bot Green"),
                SeatConfig::bot("p3", "Bot Yellow"),
                SeatConfig::bot("p4", "Bot Blue"),
            ],
            seed,
        )
    }

    /// Four bots; used for simulation.
    #[must_use]
    pub fn all_bots(seed: u64) -> Self {
        Self::new(
            std::array::from_fn(|i| {
                let color = Color::ALL[i];
                SeatConfig::bot(format!("p{}", i + 1), format!("Bot {color}"))
            }),
            seed,
        )
    }

    pub fn players(&self) -> &PlayerMap<Player> {
        &self.players
    }

    /// Whose turn it is.
    pub fn turn_index(&self) -> PlayerId {
        self.turn_index
    }

    /// Die value of the current turn, if rolled.
    pub fn dice_value(&self) -> Option<u8> {
        self.dice_value
    }

    pub fn phase(&self) -> &TurnPhase {
        &self.phase
    }

    pub fn is_over(&self) -> bool {
        self.is_over
    }

    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    pub fn action_sequence(&self) -> u32 {
        self.action_sequence
    }

    /// Bumped by every accepted transition; timers and clients compare it.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Accepted actions, oldest first.
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.history
    }

    /// The active player.
    #[must_use]
    pub fn current_player(&self) -> &Player {
        &self.players[self.turn_index]
    }

    /// Seat owning a color.
    #[must_use]
    pub fn seat_of(&self, color: Color) -> PlayerId {
        PlayerId(color.seat() as u8)
    }

    /// Look up a pawn by id.
    #[must_use]
    pub fn pawn(&self, id: PawnId) -> Option<&Pawn> {
        self.players[self.seat_of(id.color)].pawn(id.slot)
    }

    /// Arrange a starting position before the first action.
    ///
    /// Once any action has been accepted, pawns only move through
    /// `crate::rules`.
    pub fn place_pawn(&mut self, id: PawnId, location: Location) -> Result<(), EngineError> {
        if self.version > 0 {
            return Err(EngineError::MatchStarted);
        }
        self.set_location(id, location);
        Ok(())
    }

    pub(crate) fn set_location(&mut self, id: PawnId, location: Location) {
        let seat = self.seat_of(id.color);
        self.players[seat].pawns[id.slot as usize].location = location;
    }

    /// Number of ranked players.
    #[must_use]
    pub fn ranked_count(&self) -> usize {
        self.players.values().filter(|p| p.rank.is_some()).count()
    }

    /// Seats ordered by rank; unranked seats last, in seat order.
    #[must_use]
    pub fn standings(&self) -> Vec<(PlayerId, Option<u8>)> {
        let mut order: Vec<_> = self.players.iter().map(|(id, p)| (id, p.rank)).collect();
        order.sort_by_key(|&(id, rank)| (rank.unwrap_or(u8::MAX), id));
        order
    }

    /// Legal pawns for the current roll.
    #[must_use]
    pub fn legal_moves(&self) -> &[PawnId] {
        self.phase.legal_moves()
    }

    /// Encode to bytes, including both RNG positions.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    /// Restore a match written by [`Match::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(bincode::deserialize(bytes)?)
    }

    pub(crate) fn record(&mut self, record: ActionRecord) {
        self.history.push_back(record);
        self.action_sequence += 1;
        self.version += 1;
    }
}
