//! Message router — applies one decoded client message to room state.
//!
//! Drawing commands re-check the countdown gate every time they are routed,
//! so a stroke started in time but ended after the countdown hits zero is
//! never committed. Commands that reference a missing stroke or an unknown
//! session are no-ops.

use super::chat::ChatLog;
use super::command::ClientMessage;
use super::model::{Path, Point};
use super::state::RoomState;

/// Result of routing one message; the caller turns it into broadcasts.
#[derive(Debug, Clone, PartialEq)]
pub enum Routed {
    /// A formatted chat line that was appended to the log.
    Chat(String),
    /// A stroke moved into the committed list.
    Committed(Path),
    /// The sender began a new in-progress stroke.
    Started(Path),
    /// Points appended to the sender's in-progress stroke.
    Appended(Vec<Point>),
    /// Nothing changed.
    Ignored(&'static str),
}

pub fn route(state: &mut RoomState, chat: &mut ChatLog, session_id: &str, message: ClientMessage) -> Routed {
    if message.is_drawing() && !state.accepts_drawing() {
        return Routed::Ignored("drawing closed");
    }

    let Some(player) = state.players.get_mut(session_id) else {
        return Routed::Ignored("unknown session");
    };

    match message {
        ClientMessage::Chat(text) => {
            let line = ChatLog::format(&player.name, &text);
            chat.push(line.clone());
            Routed::Chat(line)
        }
        ClientMessage::StartStroke { points, color, brush } => {
            let path = Path::new(points, color, brush);
            player.path = Some(path.clone());
            Routed::Started(path)
        }
        ClientMessage::AppendPoints(points) => match player.path.as_mut() {
            Some(path) => {
                path.extend(points.iter().copied());
                Routed::Appended(points)
            }
            None => Routed::Ignored("no stroke in progress"),
        },
        ClientMessage::EndStroke => match player.path.take() {
            Some(path) => {
                state.paths.push(path.clone());
                Routed::Committed(path)
            }
            None => Routed::Ignored("no stroke in progress"),
        },
    }
}

#[cfg(test)]
#[path = "router_test.rs"]
mod tests;
