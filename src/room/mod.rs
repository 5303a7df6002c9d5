//! Drawing rooms.
//!
//! ARCHITECTURE
//! ============
//! Leaf-first: `model` (strokes, players) → `state` (replicated aggregate)
//! and `chat` (bounded backlog) → `command` (inbound decoding) and `router`
//! (gated mutations) → `lifecycle` (countdown + disposal flags) → `engine`
//! (the room aggregate plus replication) → `actor` (one task per room that
//! serializes everything and runs the persistence handoff).

pub mod actor;
pub mod chat;
pub mod command;
pub mod engine;
pub mod lifecycle;
pub mod model;
pub mod protocol;
pub mod router;
pub mod state;

pub use actor::{RoomError, RoomHandle, RoomRuntime, spawn_room};
pub use command::ClientMessage;
pub use engine::{Outbox, Room, RoomSummary};
pub use protocol::ServerMessage;
