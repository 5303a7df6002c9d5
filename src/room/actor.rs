//! Room actor — one task per room, one serialization point per room.
//!
//! LIFECYCLE
//! =========
//! 1. Spawn → the first tick is scheduled one period out
//! 2. Commands (join / leave / message / inspect) and ticks interleave in a
//!    single `select!` loop, so no two mutations ever race
//! 3. The tick that closes drawing arms the grace timer, exactly once
//! 4. Grace fires → stop accepting commands → leave the registry →
//!    terminate → await the persistence handoff → task exits
//!
//! Handles are cheap clones of the command sender. Once the actor stops
//! receiving, every handle call fails with `RoomError::Closed`.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};
use uuid::Uuid;

use super::command::ClientMessage;
use super::engine::{Outbox, Room, RoomSummary};
use super::protocol::PlayerView;
use crate::services::persistence::{self, DrawingStore};
use crate::state::RoomRegistry;

const COMMAND_QUEUE_CAPACITY: usize = 1024;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    #[error("room not found: {0}")]
    NotFound(String),
    #[error("room closed: {0}")]
    Closed(String),
}

pub enum RoomCommand {
    Join { session_id: String, name: Option<String>, outbox: Outbox, reply: oneshot::Sender<PlayerView> },
    Leave { session_id: String },
    Message { session_id: String, message: ClientMessage },
    Inspect { reply: oneshot::Sender<RoomSummary> },
}

/// Everything a room task needs besides its own state.
#[derive(Clone)]
pub struct RoomRuntime {
    pub tick: Duration,
    pub grace: Duration,
    pub registry: RoomRegistry,
    pub store: Arc<dyn DrawingStore>,
}

/// Cloneable address of a running room.
#[derive(Clone)]
pub struct RoomHandle {
    id: String,
    instance: Uuid,
    tx: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the actor has stopped taking commands.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Admit a connection.
    ///
    /// # Errors
    ///
    /// Returns `RoomError::Closed` if the room has terminated.
    pub async fn join(&self, session_id: String, name: Option<String>, outbox: Outbox) -> Result<PlayerView, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.command(RoomCommand::Join { session_id, name, outbox, reply })
            .await?;
        rx.await.map_err(|_| self.closed())
    }

    /// Remove a connection. A terminated room has already dropped everyone.
    pub async fn leave(&self, session_id: String) {
        let _ = self.command(RoomCommand::Leave { session_id }).await;
    }

    /// Forward a decoded client message.
    ///
    /// # Errors
    ///
    /// Returns `RoomError::Closed` if the room has terminated.
    pub async fn send(&self, session_id: String, message: ClientMessage) -> Result<(), RoomError> {
        self.command(RoomCommand::Message { session_id, message })
            .await
    }

    /// Fetch a summary of the room.
    ///
    /// # Errors
    ///
    /// Returns `RoomError::Closed` if the room has terminated.
    pub async fn summary(&self) -> Result<RoomSummary, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.command(RoomCommand::Inspect { reply }).await?;
        rx.await.map_err(|_| self.closed())
    }

    async fn command(&self, command: RoomCommand) -> Result<(), RoomError> {
        self.tx.send(command).await.map_err(|_| self.closed())
    }

    fn closed(&self) -> RoomError {
        RoomError::Closed(self.id.clone())
    }
}

// =============================================================================
// SPAWN
// =============================================================================

/// Start the actor for `room`. The returned join handle resolves after the
/// persistence handoff has finished.
pub fn spawn_room(room: Room, runtime: RoomRuntime) -> (RoomHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(COMMAND_QUEUE_CAPACITY);
    let handle = RoomHandle { id: room.id().to_owned(), instance: Uuid::new_v4(), tx };
    let task = tokio::spawn(run_room(room, rx, runtime, handle.instance));
    (handle, task)
}

async fn run_room(mut room: Room, mut rx: mpsc::Receiver<RoomCommand>, runtime: RoomRuntime, instance: Uuid) {
    let room_id = room.id().to_owned();
    info!(%room_id, countdown = room.state().countdown, "room started");

    let mut ticker = tokio::time::interval_at(Instant::now() + runtime.tick, runtime.tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // Parked far in the future until the countdown closes drawing.
    let grace = tokio::time::sleep(runtime.tick * 86_400);
    tokio::pin!(grace);
    let mut grace_armed = false;
    let mut accepting = true;

    loop {
        tokio::select! {
            command = rx.recv(), if accepting => {
                match command {
                    Some(command) => apply(&mut room, command),
                    // Every handle is gone; keep ticking until teardown.
                    None => accepting = false,
                }
            }
            _ = ticker.tick() => {
                if room.tick().arm_grace && !grace_armed {
                    grace_armed = true;
                    grace.as_mut().reset(Instant::now() + runtime.grace);
                    info!(%room_id, grace_ms = runtime.grace.as_millis(), "drawing closed; grace period armed");
                }
            }
            () = &mut grace, if grace_armed => break,
        }
    }

    // PHASE: STOP INTAKE
    // Queued joins are dropped with their reply senders and fail as Closed.
    drop(rx);
    unregister(&runtime.registry, &room_id, instance).await;

    // PHASE: HANDOFF
    if let Some(drawing) = room.terminate() {
        persistence::persist_drawing(runtime.store.clone(), &room_id, drawing).await;
    }
    info!(%room_id, "room disposed");
}

fn apply(room: &mut Room, command: RoomCommand) {
    match command {
        RoomCommand::Join { session_id, name, outbox, reply } => {
            let view = room.admit(session_id, name.as_deref(), outbox);
            let _ = reply.send(view);
        }
        RoomCommand::Leave { session_id } => {
            room.leave(&session_id);
        }
        RoomCommand::Message { session_id, message } => {
            room.handle(&session_id, message);
        }
        RoomCommand::Inspect { reply } => {
            let _ = reply.send(room.summary());
        }
    }
}

/// Remove this instance from the registry. A newer room reusing the id is
/// left alone.
async fn unregister(registry: &RoomRegistry, room_id: &str, instance: Uuid) {
    let mut rooms = registry.write().await;
    if rooms.get(room_id).is_some_and(|h| h.instance == instance) {
        rooms.remove(room_id);
        debug!(%room_id, live = rooms.len(), "room unregistered");
    }
}

#[cfg(test)]
#[path = "actor_test.rs"]
mod tests;
