//! Events emitted by the turn engine.

pub mod event;

pub use event::GameEvent;
