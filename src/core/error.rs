//! Error types.
//!
//! Every rejected operation leaves the match untouched; callers may treat
//! any `EngineError` as a no-op.

use thiserror::Error;

use super::pawn::PawnId;
use super::player::PlayerId;

/// Turn-engine phase names, used in error reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseKind {
    AwaitingRoll,
    AwaitingMove,
    TurnEnded,
    MatchOver,
}

impl std::fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PhaseKind::AwaitingRoll => "awaiting roll",
            PhaseKind::AwaitingMove => "awaiting move",
            PhaseKind::TurnEnded => "turn ended",
            PhaseKind::MatchOver => "match over",
        };
        f.write_str(name)
    }
}

/// A rejected turn-engine operation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("match is over")]
    MatchOver,
    #[error("not {claimed}'s turn; {active} is active")]
    NotYourTurn { claimed: PlayerId, active: PlayerId },
    #[error("{0} has already finished")]
    AlreadyFinished(PlayerId),
    #[error("cannot {action} while {phase}")]
    WrongPhase { action: &'static str, phase: PhaseKind },
    #[error("die value {0} is not in 1..=6")]
    InvalidDieValue(u8),
    #[error("pawn {0} does not belong to the active player")]
    ForeignPawn(PawnId),
    #[error("pawn {0} has no legal move")]
    IllegalMove(PawnId),
    #[error("pawns can only be placed before the first action")]
    MatchStarted,
    #[error("{0} is a bot seat")]
    BotSeat(PlayerId),
    #[error("desync: expected {expected}, got {received}")]
    Desync { expected: String, received: String },
}

impl EngineError {
    pub(crate) fn desync(expected: impl ToString, received: impl ToString) -> Self {
        EngineError::Desync {
            expected: expected.to_string(),
            received: received.to_string(),
        }
    }
}

/// Invalid configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("turn timeout must be positive")]
    ZeroTurnTimeout,
    #[error("bot think time {think_ms}ms must be below the turn timeout {timeout_ms}ms")]
    BotSlowerThanTimeout { think_ms: u64, timeout_ms: u64 },
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure to encode or decode a wire message.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown seat index {0}")]
    UnknownSeat(u8),
    #[error("invalid location {0}")]
    InvalidLocation(i8),
}

/// Failure to snapshot or restore a match.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot codec error: {0}")]
    Codec(#[from] bincode::Error),
}
