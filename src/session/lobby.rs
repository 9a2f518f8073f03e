//! Rooms that gather four participants before a match starts.
//!
//! Participants are keyed by user id, connections by session id. A user who
//! reconnects keeps their seat; only the session id changes.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::core::{ConfigError, MatchConfig, SeatConfig, SEAT_COUNT};

use super::table::Table;

/// Failed room operation.
#[derive(Debug, Error)]
pub enum LobbyError {
    #[error("room {0} not found")]
    RoomNotFound(String),
    #[error("room {0} already exists")]
    RoomExists(String),
    #[error("room {0} is full")]
    RoomFull(String),
    #[error("room {code} has {count} players; exactly 4 are required")]
    NeedFourPlayers { code: String, count: usize },
    #[error("room {0} has already started")]
    AlreadyStarted(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Someone in a room.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    pub name: String,
    pub avatar_ref: String,
    pub is_host: bool,
    pub is_ready: bool,
    pub session_id: String,
}

impl Participant {
    pub fn new(id: impl Into<String>, name: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar_ref: String::new(),
            is_host: false,
            is_ready: true,
            session_id: session_id.into(),
        }
    }

    #[must_use]
    pub fn with_avatar(mut self, avatar_ref: impl Into<String>) -> Self {
        self.avatar_ref = avatar_ref.into();
        self
    }

    fn seat(&self) -> SeatConfig {
        SeatConfig::human(self.id.clone(), self.name.clone()).with_avatar(self.avatar_ref.clone())
    }
}

/// A room, broadcast to its members whenever it changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub code: String,
    pub host_id: String,
    /// Join order; seat `i` plays color `i`.
    pub participants: Vec<Participant>,
    pub started: bool,
}

impl Room {
    pub fn host(&self) -> Option<&Participant> {
        self.participants.iter().find(|p| p.is_host)
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() >= SEAT_COUNT
    }
}

/// What happened when a session left.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Departure {
    pub code: String,
    pub participant: Participant,
    /// The room had no one left and was removed.
    pub room_closed: bool,
    /// Id of the participant promoted to host, if the host left.
    pub new_host: Option<String>,
}

/// All open rooms.
#[derive(Debug, Default)]
pub struct Lobby {
    rooms: FxHashMap<String, Room>,
}

impl Lobby {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn room(&self, code: &str) -> Option<&Room> {
        self.rooms.get(code)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Open a room with `creator` as host.
    pub fn create_room(&mut self, code: impl Into<String>, mut creator: Participant) -> Result<&Room, LobbyError> {
        let code = code.into();
        if self.rooms.contains_key(&code) {
            return Err(LobbyError::RoomExists(code));
        }

        creator.is_host = true;
        creator.is_ready = true;
        info!(room = %code, host = %creator.name, "room created");
        let room = Room {
            code: code.clone(),
            host_id: creator.id.clone(),
            participants: vec![creator],
            started: false,
        };
        Ok(&*self.rooms.entry(code).or_insert(room))
    }

    /// Add a participant, or refresh the session of one already seated.
    pub fn join_room(&mut self, code: &str, mut joiner: Participant) -> Result<&Room, LobbyError> {
        let room = self
            .rooms
            .get_mut(code)
            .ok_or_else(|| LobbyError::RoomNotFound(code.to_string()))?;

        if let Some(existing) = room.participants.iter_mut().find(|p| p.id == joiner.id) {
            existing.session_id = joiner.session_id;
            info!(room = %code, user = %existing.name, "participant reconnected");
            return Ok(&*room);
        }
        if room.started {
            return Err(LobbyError::AlreadyStarted(code.to_string()));
        }
        if room.is_full() {
            return Err(LobbyError::RoomFull(code.to_string()));
        }

        joiner.is_host = false;
        joiner.is_ready = true;
        info!(room = %code, user = %joiner.name, "participant joined");
        room.participants.push(joiner);
        Ok(&*room)
    }

    /// Start a match seated in join order.
    pub fn start(&mut self, code: &str, config: &MatchConfig, now: u64) -> Result<Table, LobbyError> {
        let room = self
            .rooms
            .get_mut(code)
            .ok_or_else(|| LobbyError::RoomNotFound(code.to_string()))?;
        if room.started {
            return Err(LobbyError::AlreadyStarted(code.to_string()));
        }
        let seats: [SeatConfig; SEAT_COUNT] = match room.participants.as_slice() {
            [a, b, c, d] => [a.seat(), b.seat(), c.seat(), d.seat()],
            others => {
                return Err(LobbyError::NeedFourPlayers {
                    code: code.to_string(),
                    count: others.len(),
                })
            }
        };

        let table = Table::new(seats, config, now)?;
        room.started = true;
        info!(room = %code, "match started");
        Ok(table)
    }

    /// Remove whoever holds `session_id`.
    ///
    /// Empty rooms are closed. If the first participant leaves, the next one
    /// in join order becomes host.
    pub fn leave(&mut self, session_id: &str) -> Option<Departure> {
        let (code, index) = self.rooms.iter().find_map(|(code, room)| {
            room.participants
                .iter()
                .position(|p| p.session_id == session_id)
                .map(|i| (code.clone(), i))
        })?;

        let room = self.rooms.get_mut(&code)?;
        let participant = room.participants.remove(index);
        info!(room = %code, user = %participant.name, "participant left");

        if room.participants.is_empty() {
            self.rooms.remove(&code);
            info!(room = %code, "room closed");
            return Some(Departure {
                code,
                participant,
                room_closed: true,
                new_host: None,
            });
        }

        let mut new_host = None;
        if index == 0 {
            let next = &mut room.participants[0];
            next.is_host = true;
            room.host_id = next.id.clone();
            new_host = Some(next.id.clone());
        }
        Some(Departure {
            code,
            participant,
            room_closed: false,
            new_host,
        })
    }
}
