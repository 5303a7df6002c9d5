//! Replicated room state: countdown, participants, committed paths.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::Serialize;

use super::model::{Path, Player};

/// The aggregate every connection in a room observes.
#[derive(Debug, Clone, Serialize)]
pub struct RoomState {
    /// Seconds of drawing time left. Never increases once the room runs.
    pub countdown: u32,
    /// Connected participants keyed by session id.
    pub players: HashMap<String, Player>,
    /// Committed strokes in commit order. Append-only.
    pub paths: Vec<Path>,
}

impl RoomState {
    #[must_use]
    pub fn new(countdown: u32) -> Self {
        Self { countdown, players: HashMap::new(), paths: Vec::new() }
    }

    /// Insert a participant. A repeated session id replaces the earlier record.
    pub fn create_player(&mut self, session_id: impl Into<String>, name: impl Into<String>) -> &mut Player {
        let player = Player::new(name);
        match self.players.entry(session_id.into()) {
            Entry::Occupied(mut slot) => {
                slot.insert(player);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(player),
        }
    }

    /// Drop a participant along with any stroke it was still drawing.
    pub fn remove_player(&mut self, session_id: &str) -> Option<Player> {
        self.players.remove(session_id)
    }

    /// Whether drawing commands are currently accepted.
    #[must_use]
    pub fn accepts_drawing(&self) -> bool {
        self.countdown > 0
    }
}
