//! Hosting: rooms that gather players, and tables that run their matches.

pub mod lobby;
pub mod table;

pub use lobby::{Departure, Lobby, LobbyError, Participant, Room};
pub use table::{SharedTable, Table, Timer, TimerKind};
