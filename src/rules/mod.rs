//! Turn engine.
//!
//! `LudoRules` owns every rule: rolling, legal moves, move resolution
//! (captures, ranking, termination) and turn advancement. Drivers use it
//! through the `RulesEngine` trait.

pub mod engine;
pub mod ludo;

pub use engine::{GameResult, RulesEngine};
pub use ludo::{LudoRules, BONUS_ROLL};
