//! Transport boundary: client intents, relay messages, and replicas that
//! validate relayed transitions against their own match copy.

pub mod messages;
pub mod replica;

pub use messages::{Intent, SyncMessage};
pub use replica::Replica;
