//! Match configuration.
//!
//! - `RulesConfig`: rule variants the engine honors (finish rule)
//! - `TimingConfig`: pacing used by the session table (bot think time,
//!   turn timeout, animation-derived delays)
//! - `MatchConfig`: seed plus both of the above
//!
//! All types round-trip through JSON so hosts can load them from files.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// How a pawn reaches home at the end of its home stretch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishRule {
    /// Any move whose sum reaches or passes the finish line lands home.
    #[default]
    OvershootToHome,
    /// A move must land exactly on the finish line; overshooting rolls are illegal.
    Exact,
}

/// Rule variants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    pub finish_rule: FinishRule,
}

impl RulesConfig {
    #[must_use]
    pub fn with_finish_rule(mut self, rule: FinishRule) -> Self {
        self.finish_rule = rule;
        self
    }
}

/// Pacing for the session table, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Time for the die to settle after a roll.
    pub roll_settle_ms: u64,
    /// Pause before auto-advancing after a roll with no legal move.
    pub no_move_advance_ms: u64,
    /// Per-cell hop when replaying a move.
    pub hop_ms: u64,
    /// Pause after the last hop before the turn is handed on.
    pub resolve_ms: u64,
    /// Bot think time before rolling, and before moving once the die settles.
    pub bot_think_ms: u64,
    /// A human who does not act within this window is auto-played.
    pub turn_timeout_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            roll_settle_ms: 600,
            no_move_advance_ms: 1_000,
            hop_ms: 300,
            resolve_ms: 500,
            bot_think_ms: 1_000,
            turn_timeout_ms: 15_000,
        }
    }
}

impl TimingConfig {
    /// All delays zero except the turn timeout. Handy for headless simulation.
    #[must_use]
    pub fn instant() -> Self {
        Self {
            roll_settle_ms: 0,
            no_move_advance_ms: 0,
            hop_ms: 0,
            resolve_ms: 0,
            bot_think_ms: 0,
            turn_timeout_ms: 15_000,
        }
    }

    #[must_use]
    pub fn with_turn_timeout(mut self, ms: u64) -> Self {
        self.turn_timeout_ms = ms;
        self
    }

    #[must_use]
    pub fn with_bot_think(mut self, ms: u64) -> Self {
        self.bot_think_ms = ms;
        self
    }

    /// Delay between a move and the automatic turn hand-off.
    #[must_use]
    pub fn move_resolution_ms(&self, hops: usize) -> u64 {
        self.hop_ms.saturating_mul(hops as u64).saturating_add(self.resolve_ms)
    }

    /// Delay between a dead roll and the automatic turn hand-off.
    #[must_use]
    pub fn dead_roll_ms(&self) -> u64 {
        self.roll_settle_ms.saturating_add(self.no_move_advance_ms)
    }

    /// Delay between a bot's roll and its move.
    #[must_use]
    pub fn bot_move_ms(&self) -> u64 {
        self.roll_settle_ms.saturating_add(self.bot_think_ms)
    }
}

/// Full match configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Seed for dice and bot streams.
    pub seed: u64,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub timing: TimingConfig,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            rules: RulesConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

impl MatchConfig {
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_rules(mut self, rules: RulesConfig) -> Self {
        self.rules = rules;
        self
    }

    #[must_use]
    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    /// Check values a table cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timing.turn_timeout_ms == 0 {
            return Err(ConfigError::ZeroTurnTimeout);
        }
        if self.timing.bot_think_ms >= self.timing.turn_timeout_ms {
            return Err(ConfigError::BotSlowerThanTimeout {
                think_ms: self.timing.bot_think_ms,
                timeout_ms: self.timing.turn_timeout_ms,
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: MatchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
