//! # ludo-engine
//!
//! A four-player Ludo rules engine with a deterministic turn state machine.
//!
//! ## Design Principles
//!
//! 1. **Match as a value**: All game state lives in `Match`. Transitions
//!    either apply completely or are rejected with no change at all.
//!
//! 2. **Deterministic**: Dice come from a seeded, serializable RNG stream;
//!    bots draw from their own stream. Same seed, same match.
//!
//! 3. **Presentation-free**: The engine returns hop paths and events;
//!    animation pacing lives in the session table, drawing in the renderer.
//!
//! ## Architecture
//!
//! - **Location encoding**: A pawn's location is relative to its color:
//!   `-1` base, `0..=50` ring, `51..=56` home stretch, `99` home. The board
//!   module maps it to global ring cells and grid coordinates.
//!
//! - **Persistent history**: Action history uses `im-rs`, so cloning a match
//!   for a pure `step` is cheap.
//!
//! ## Modules
//!
//! - `core`: Colors, seats, pawns, match state, actions, RNG, configuration
//! - `board`: Ring topology, safe cells, legal targets, grid coordinates
//! - `rules`: `RulesEngine` trait and the Ludo turn engine
//! - `events`: Typed events produced by transitions
//! - `bot`: Move policies for computer seats
//! - `protocol`: Client intents, relay messages, replicas
//! - `session`: Rooms and the match scheduler

pub mod board;
pub mod bot;
pub mod core;
pub mod events;
pub mod protocol;
pub mod rules;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionRecord, Color, ConfigError, EngineError, FinishRule, GameRng, GameRngState, Location, Match,
    MatchConfig, Pawn, PawnId, PhaseKind, Player, PlayerId, PlayerMap, ProtocolError, RulesConfig, SeatConfig,
    SnapshotError, TimingConfig, TurnEnd, TurnPhase, SEAT_COUNT,
};

pub use crate::board::{coordinate_of, hop_path, is_legal_move, relative_to_global, Coordinate, HopPath};

pub use crate::rules::{GameResult, LudoRules, RulesEngine};

pub use crate::events::GameEvent;

pub use crate::bot::{BaseFirst, FirstLegal, MovePolicy, UniformRandom};

pub use crate::protocol::{Intent, Replica, SyncMessage};

pub use crate::session::{Lobby, LobbyError, Participant, Room, SharedTable, Table, Timer, TimerKind};
