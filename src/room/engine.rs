//! Room aggregate — state, chat, lifecycle, and the connected outboxes.
//!
//! DESIGN
//! ======
//! `Room` is plain synchronous data. The actor in `actor.rs` owns one and
//! calls into it for every join, leave, message, and tick, so every method
//! here runs on the room's single serialization point. Replication is a
//! best-effort `try_send` of `ServerMessage`s into each connection's outbox.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::chat::ChatLog;
use super::command::ClientMessage;
use super::lifecycle::{Lifecycle, Phase, TickOutcome};
use super::protocol::{PlayerView, ServerMessage, Snapshot};
use super::router::{self, Routed};
use super::state::RoomState;
use crate::services::names;
use crate::services::persistence::NewDrawing;

/// Per-connection queue of outbound messages.
pub type Outbox = mpsc::Sender<ServerMessage>;

/// Lightweight description of a live room for listings.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RoomSummary {
    pub id: String,
    pub mode: String,
    pub expiration: u32,
    pub countdown: u32,
    pub phase: Phase,
    pub players: usize,
    pub paths: usize,
}

pub struct Room {
    id: String,
    mode: String,
    expiration: u32,
    state: RoomState,
    chat: ChatLog,
    lifecycle: Lifecycle,
    /// Session ids in first-admission order, kept after they leave.
    roster: Vec<String>,
    admitted: HashSet<String>,
    outboxes: HashMap<String, Outbox>,
}

impl Room {
    #[must_use]
    pub fn new(id: impl Into<String>, mode: impl Into<String>, expiration: u32, chat_history: usize) -> Self {
        Self {
            id: id.into(),
            mode: mode.into(),
            expiration,
            state: RoomState::new(expiration),
            chat: ChatLog::new(chat_history),
            lifecycle: Lifecycle::new(),
            roster: Vec::new(),
            admitted: HashSet::new(),
            outboxes: HashMap::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn state(&self) -> &RoomState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.lifecycle.phase(&self.state)
    }

    // =========================================================================
    // ADMISSION
    // =========================================================================

    /// Admit a connection. The newcomer gets a snapshot and the chat backlog;
    /// everyone else gets a `join` delta.
    pub fn admit(&mut self, session_id: impl Into<String>, name: Option<&str>, outbox: Outbox) -> PlayerView {
        let session_id = session_id.into();
        let name = names::resolve_name(name);

        self.state.create_player(session_id.clone(), name.clone());
        if self.admitted.insert(session_id.clone()) {
            self.roster.push(session_id.clone());
        }

        let view = PlayerView { session_id: session_id.clone(), name, path: None };
        self.broadcast(&ServerMessage::Joined(view.clone()), Some(&session_id));

        send(&outbox, &self.id, ServerMessage::State(Box::new(self.snapshot_for(&session_id))));
        for line in self.chat.iter() {
            send(&outbox, &self.id, ServerMessage::Chat(line.clone()));
        }
        self.outboxes.insert(session_id.clone(), outbox);

        info!(room_id = %self.id, %session_id, name = %view.name, players = self.state.players.len(), "player joined");
        view
    }

    /// Remove a participant. Any stroke it was drawing is abandoned.
    pub fn leave(&mut self, session_id: &str) -> bool {
        self.outboxes.remove(session_id);
        let Some(player) = self.state.remove_player(session_id) else {
            return false;
        };
        if player.path.is_some() {
            debug!(room_id = %self.id, %session_id, "in-progress stroke abandoned");
        }
        self.broadcast(&ServerMessage::Left(session_id.to_owned()), None);
        info!(room_id = %self.id, %session_id, players = self.state.players.len(), "player left");
        true
    }

    // =========================================================================
    // MESSAGES
    // =========================================================================

    /// Route one client message and replicate whatever it changed.
    pub fn handle(&mut self, session_id: &str, message: ClientMessage) -> Routed {
        let routed = router::route(&mut self.state, &mut self.chat, session_id, message);
        match &routed {
            Routed::Chat(line) => {
                debug!(room_id = %self.id, %session_id, history = self.chat.len(), "chat relayed");
                self.broadcast(&ServerMessage::Chat(line.clone()), None);
            }
            Routed::Committed(path) => {
                debug!(room_id = %self.id, %session_id, points = path.points.len(), "stroke committed");
                self.broadcast(&ServerMessage::PathCommitted(path.clone()), None);
            }
            Routed::Started(path) => {
                let message = ServerMessage::StrokeStarted { session_id: session_id.to_owned(), path: path.clone() };
                self.broadcast(&message, None);
            }
            Routed::Appended(points) => {
                let message = ServerMessage::PointsAppended { session_id: session_id.to_owned(), points: points.clone() };
                self.broadcast(&message, None);
            }
            Routed::Ignored(reason) => debug!(room_id = %self.id, %session_id, reason, "message ignored"),
        }
        routed
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Advance the countdown by one tick and broadcast what changed.
    pub fn tick(&mut self) -> TickOutcome {
        let before = self.phase();
        let outcome = self.lifecycle.tick(&mut self.state);
        if outcome.counted {
            self.broadcast(&ServerMessage::Countdown(self.state.countdown), None);
        }
        let after = self.phase();
        if after != before {
            // Closing drawing and arming grace share a tick; clients still see Locked.
            if before == Phase::Active && after == Phase::Grace {
                self.broadcast(&ServerMessage::Phase(Phase::Locked), None);
            }
            info!(room_id = %self.id, ?before, ?after, "room phase changed");
            self.broadcast(&ServerMessage::Phase(after), None);
        }
        outcome
    }

    /// Enter Terminated and package the artwork. Returns `None` if the room
    /// was already terminated, so the handoff can only ever run once.
    pub fn terminate(&mut self) -> Option<NewDrawing> {
        if !self.lifecycle.terminate() {
            return None;
        }
        self.broadcast(&ServerMessage::Phase(Phase::Terminated), None);
        // Dropping the outboxes ends every connection's receive loop.
        self.outboxes.clear();
        self.state.players.clear();

        info!(room_id = %self.id, paths = self.state.paths.len(), users = self.roster.len(), "room terminated");
        Some(NewDrawing::new(self.state.paths.clone(), self.roster.clone(), self.mode.clone()))
    }

    // =========================================================================
    // VIEWS
    // =========================================================================

    #[must_use]
    pub fn snapshot_for(&self, session_id: &str) -> Snapshot {
        let mut players: Vec<PlayerView> = self
            .state
            .players
            .iter()
            .map(|(id, player)| PlayerView {
                session_id: id.clone(),
                name: player.name.clone(),
                path: player.path.clone(),
            })
            .collect();
        players.sort_by(|a, b| a.session_id.cmp(&b.session_id));

        Snapshot {
            session_id: session_id.to_owned(),
            countdown: self.state.countdown,
            phase: self.phase(),
            players,
            paths: self.state.paths.clone(),
        }
    }

    #[must_use]
    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            id: self.id.clone(),
            mode: self.mode.clone(),
            expiration: self.expiration,
            countdown: self.state.countdown,
            phase: self.phase(),
            players: self.state.players.len(),
            paths: self.state.paths.len(),
        }
    }

    fn broadcast(&self, message: &ServerMessage, exclude: Option<&str>) {
        for (session_id, outbox) in &self.outboxes {
            if exclude == Some(session_id.as_str()) {
                continue;
            }
            send(outbox, &self.id, message.clone());
        }
    }
}

/// Best-effort: a full or closed outbox drops the message.
fn send(outbox: &Outbox, room_id: &str, message: ServerMessage) {
    if let Err(e) = outbox.try_send(message) {
        let kind = match &e {
            mpsc::error::TrySendError::Full(m) | mpsc::error::TrySendError::Closed(m) => m.kind(),
        };
        warn!(%room_id, kind, full = matches!(e, mpsc::error::TrySendError::Full(_)), "outbound message dropped");
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
