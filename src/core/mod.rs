//! Core types: colors, seats, pawns, match state, actions, RNG, configuration, errors.

pub mod action;
pub mod color;
pub mod config;
pub mod error;
pub mod pawn;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{Action, ActionRecord};
pub use color::Color;
pub use config::{FinishRule, MatchConfig, RulesConfig, TimingConfig};
pub use error::{ConfigError, EngineError, PhaseKind, ProtocolError, SnapshotError};
pub use pawn::{Location, Pawn, PawnId};
pub use player::{PlayerId, PlayerMap, SEAT_COUNT};
pub use rng::{GameRng, GameRngState, DIE_FACES};
pub use state::{LegalMoves, Match, Player, SeatConfig, TurnEnd, TurnPhase};
