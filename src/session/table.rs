//! Headless match scheduler.
//!
//! A `Table` owns one `Match` and drives everything that is not a human
//! intent: bot turns, the hand-off after a move or a dead roll, and the turn
//! timeout for idle humans. Time is supplied by the caller in milliseconds,
//! so the same table runs under a wall clock or a virtual one.
//!
//! At most one timer is pending. Every timer remembers the match `version`
//! it was armed for; a timer whose version no longer matches is discarded,
//! so a human action racing a timeout can only ever apply once.
//!
//! Bot choices draw from the match's own bot stream, so a table resumed
//! from a snapshot plays on exactly as the original would have.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::bot::{decide, BaseFirst, FirstLegal, MovePolicy};
use crate::core::{
    Action, ConfigError, EngineError, Match, MatchConfig, PlayerId, SeatConfig, TimingConfig, TurnEnd,
    TurnPhase, SEAT_COUNT,
};
use crate::events::GameEvent;
use crate::protocol::Intent;
use crate::rules::{LudoRules, RulesEngine};

/// What a timer does when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerKind {
    /// A bot seat rolls or moves.
    BotAct,
    /// An idle human is played for.
    TurnTimeout,
    /// The turn is handed on after a move or a dead roll.
    AutoAdvance,
}

/// A scheduled table action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    pub due_at: u64,
    pub kind: TimerKind,
    /// Match version the timer was armed for.
    pub version: u64,
}

/// One match plus its scheduler.
pub struct Table {
    rules: LudoRules,
    state: Match,
    timing: TimingConfig,
    policy: Box<dyn MovePolicy>,
    pending: Option<Timer>,
}

impl Table {
    /// Seat four players and arm the first timer at `now`.
    pub fn new(seats: [SeatConfig; SEAT_COUNT], config: &MatchConfig, now: u64) -> Result<Self, ConfigError> {
        Self::with_match(Match::new(seats, config.seed), config, now)
    }

    /// Drive an existing match, e.g. one restored from a snapshot.
    pub fn with_match(state: Match, config: &MatchConfig, now: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut table = Self {
            rules: LudoRules::new(config.rules),
            state,
            timing: config.timing,
            policy: Box::new(BaseFirst),
            pending: None,
        };
        table.reschedule(now);
        Ok(table)
    }

    /// Replace the bot policy.
    #[must_use]
    pub fn with_policy(mut self, policy: Box<dyn MovePolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn state(&self) -> &Match {
        &self.state
    }

    pub fn rules(&self) -> &LudoRules {
        &self.rules
    }

    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    /// The timer that will fire next, if any.
    pub fn pending(&self) -> Option<Timer> {
        self.pending
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over
    }

    /// Apply a human seat's intent.
    ///
    /// Bot seats are driven by the table and cannot be played from outside.
    /// Turn hand-off is also the table's job, so intents only roll or move.
    pub fn submit(&mut self, player: PlayerId, intent: Intent, now: u64) -> Result<Vec<GameEvent>, EngineError> {
        if PlayerId::new(player.0).is_none() {
            warn!(%player, ?intent, "intent for unknown seat");
            return Err(EngineError::NotYourTurn {
                claimed: player,
                active: self.state.turn_index,
            });
        }
        if self.state.players[player].is_bot {
            warn!(%player, ?intent, "intent for bot seat");
            return Err(EngineError::BotSeat(player));
        }

        let action = Action::from(intent);
        let events = self
            .rules
            .apply_action(&mut self.state, player, &action)
            .inspect_err(|err| warn!(%player, %action, %err, "intent rejected"))?;
        self.reschedule(now);
        Ok(events)
    }

    /// Fire every timer due at or before `now`, in order.
    ///
    /// Stops at the first failing timer; the table stays armed.
    pub fn poll(&mut self, now: u64) -> Result<Vec<GameEvent>, EngineError> {
        let mut events = Vec::new();
        while let Some(timer) = self.pending.filter(|t| t.due_at <= now) {
            events.extend(self.fire(timer)?);
        }
        Ok(events)
    }

    /// Fire a specific timer, typically one handed out earlier by
    /// [`Table::pending`] to an external scheduler.
    ///
    /// A timer that is no longer the pending one, or whose version is stale,
    /// does nothing. If the timer's action is rejected, the match is left as
    /// it was, a fresh timer is armed, and the error is returned.
    pub fn fire(&mut self, timer: Timer) -> Result<Vec<GameEvent>, EngineError> {
        if self.pending != Some(timer) {
            debug!(?timer, "discarding superseded timer");
            return Ok(Vec::new());
        }
        self.pending = None;
        if timer.version != self.state.version {
            debug!(?timer, version = self.state.version, "discarding stale timer");
            return Ok(Vec::new());
        }

        let result = match timer.kind {
            TimerKind::BotAct => self.bot_act(),
            TimerKind::TurnTimeout => self.time_out(),
            TimerKind::AutoAdvance => self.rules.advance(&mut self.state),
        };
        self.reschedule(timer.due_at);
        result.inspect_err(|err| warn!(?timer, %err, "timer action rejected; re-armed"))
    }

    /// Run until the match ends or `deadline` passes.
    ///
    /// Jumps the clock from timer to timer, so a bot match with default
    /// timings simulates hours of play instantly. Returns the clock reached.
    pub fn run_until(
        &mut self,
        deadline: u64,
        mut on_events: impl FnMut(&[GameEvent]),
    ) -> Result<u64, EngineError> {
        let mut now = 0;
        while let Some(timer) = self.pending.filter(|t| t.due_at <= deadline) {
            now = timer.due_at;
            let events = self.fire(timer)?;
            if !events.is_empty() {
                on_events(&events);
            }
        }
        Ok(now)
    }

    /// The bot stream only advances when the chosen action is accepted.
    fn bot_act(&mut self) -> Result<Vec<GameEvent>, EngineError> {
        let player = self.state.turn_index;
        let mut rng = self.state.bot_rng.clone();
        let Some(action) = decide(self.policy.as_ref(), &self.state, player, &mut rng) else {
            return Ok(Vec::new());
        };
        let events = self.rules.apply_action(&mut self.state, player, &action)?;
        self.state.bot_rng = rng;
        Ok(events)
    }

    fn time_out(&mut self) -> Result<Vec<GameEvent>, EngineError> {
        let player = self.state.turn_index;
        info!(%player, "turn timed out");

        // First-legal never draws from the stream.
        let mut rng = self.state.bot_rng.clone();
        let mut events = Vec::new();
        while let Some(action) = decide(&FirstLegal, &self.state, player, &mut rng) {
            events.extend(self.rules.apply_action(&mut self.state, player, &action)?);
        }
        Ok(events)
    }

    fn reschedule(&mut self, now: u64) {
        let version = self.state.version;
        let bot_turn = self.state.current_player().is_bot;
        let arm = |delay: u64, kind: TimerKind| Timer {
            due_at: now.saturating_add(delay),
            kind,
            version,
        };

        self.pending = match &self.state.phase {
            TurnPhase::MatchOver => None,
            TurnPhase::TurnEnded { reason } => {
                let delay = match *reason {
                    TurnEnd::NoLegalMove => self.timing.dead_roll_ms(),
                    TurnEnd::Moved { hops } => self.timing.move_resolution_ms(hops),
                };
                Some(arm(delay, TimerKind::AutoAdvance))
            }
            TurnPhase::AwaitingRoll if bot_turn => Some(arm(self.timing.bot_think_ms, TimerKind::BotAct)),
            TurnPhase::AwaitingMove { .. } if bot_turn => Some(arm(self.timing.bot_move_ms(), TimerKind::BotAct)),
            TurnPhase::AwaitingRoll | TurnPhase::AwaitingMove { .. } => {
                Some(arm(self.timing.turn_timeout_ms, TimerKind::TurnTimeout))
            }
        };
    }
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("rules", &self.rules)
            .field("turn_index", &self.state.turn_index)
            .field("phase", &self.state.phase)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

/// A table shared between connection handlers and a timer task.
///
/// All access goes through one lock, which serializes intents and timers
/// for the match.
#[derive(Clone, Debug)]
pub struct SharedTable(Arc<Mutex<Table>>);

impl SharedTable {
    pub fn new(table: Table) -> Self {
        Self(Arc::new(Mutex::new(table)))
    }

    pub fn submit(&self, player: PlayerId, intent: Intent, now: u64) -> Result<Vec<GameEvent>, EngineError> {
        self.0.lock().submit(player, intent, now)
    }

    pub fn poll(&self, now: u64) -> Result<Vec<GameEvent>, EngineError> {
        self.0.lock().poll(now)
    }

    pub fn fire(&self, timer: Timer) -> Result<Vec<GameEvent>, EngineError> {
        self.0.lock().fire(timer)
    }

    pub fn pending(&self) -> Option<Timer> {
        self.0.lock().pending()
    }

    /// Read the table under the lock.
    pub fn with<R>(&self, f: impl FnOnce(&Table) -> R) -> R {
        f(&self.0.lock())
    }
}
