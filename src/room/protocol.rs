//! Outbound server messages.
//!
//! Mirrors the inbound format: every message is a JSON array whose first
//! element names the event. State is replicated as a full snapshot on
//! admission followed by small deltas for each mutation.

use serde::Serialize;
use serde_json::{Value, json};

use super::lifecycle::Phase;
use super::model::{Path, Point};

/// Point-in-time view handed to a newly admitted connection.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub session_id: String,
    pub countdown: u32,
    pub phase: Phase,
    pub players: Vec<PlayerView>,
    pub paths: Vec<Path>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlayerView {
    pub session_id: String,
    pub name: String,
    /// The stroke this player is drawing right now, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Path>,
}

#[derive(Debug, Clone)]
pub enum ServerMessage {
    Chat(String),
    State(Box<Snapshot>),
    Countdown(u32),
    Phase(Phase),
    Joined(PlayerView),
    Left(String),
    PathCommitted(Path),
    StrokeStarted { session_id: String, path: Path },
    PointsAppended { session_id: String, points: Vec<Point> },
    Error(String),
}

impl ServerMessage {
    /// Event tag used as the first array element.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Chat(_) => "chat",
            Self::State(_) => "state",
            Self::Countdown(_) => "countdown",
            Self::Phase(_) => "phase",
            Self::Joined(_) => "join",
            Self::Left(_) => "leave",
            Self::PathCommitted(_) => "path",
            Self::StrokeStarted { .. } => "stroke",
            Self::PointsAppended { .. } => "points",
            Self::Error(_) => "error",
        }
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        let kind = self.kind();
        match self {
            Self::Chat(text) | Self::Error(text) => json!([kind, text]),
            Self::State(snapshot) => json!([kind, snapshot]),
            Self::Countdown(n) => json!([kind, n]),
            Self::Phase(phase) => json!([kind, phase]),
            Self::Joined(player) => json!([kind, player.session_id, player.name]),
            Self::Left(session_id) => json!([kind, session_id]),
            Self::PathCommitted(path) => json!([kind, path]),
            Self::StrokeStarted { session_id, path } => json!([kind, session_id, path]),
            Self::PointsAppended { session_id, points } => json!([kind, session_id, points]),
        }
    }

    /// Serialize for a websocket text frame.
    #[must_use]
    pub fn encode(&self) -> String {
        self.to_json().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::model::Brush;

    #[test]
    fn chat_encodes_as_pair() {
        let msg = ServerMessage::Chat("Calm Lynx: hi".into());
        assert_eq!(msg.encode(), r#"["chat","Calm Lynx: hi"]"#);
    }

    #[test]
    fn join_and_leave_carry_session_id() {
        let joined = ServerMessage::Joined(PlayerView { session_id: "abc".into(), name: "Lynx".into(), path: None });
        assert_eq!(joined.to_json(), json!(["join", "abc", "Lynx"]));
        assert_eq!(ServerMessage::Left("abc".into()).to_json(), json!(["leave", "abc"]));
    }

    #[test]
    fn phase_uses_lowercase_names() {
        assert_eq!(ServerMessage::Phase(Phase::Grace).to_json(), json!(["phase", "grace"]));
    }

    #[test]
    fn snapshot_includes_paths_and_players() {
        let snapshot = Snapshot {
            session_id: "me".into(),
            countdown: 3,
            phase: Phase::Active,
            players: vec![
                PlayerView { session_id: "me".into(), name: "Lynx".into(), path: None },
                PlayerView {
                    session_id: "you".into(),
                    name: "Wren".into(),
                    path: Some(Path::new(vec![Point(4.0, 2.0)], None, None)),
                },
            ],
            paths: vec![Path::new(vec![Point(0.0, 0.0)], Some("red".into()), Some(Brush::Pen))],
        };
        let value = ServerMessage::State(Box::new(snapshot)).to_json();
        assert_eq!(value[0], "state");
        assert_eq!(value[1]["countdown"], 3);
        assert_eq!(value[1]["phase"], "active");
        assert_eq!(value[1]["players"][0]["name"], "Lynx");
        assert!(value[1]["players"][0].get("path").is_none());
        assert_eq!(value[1]["players"][1]["path"]["points"], json!([[4.0, 2.0]]));
        assert_eq!(value[1]["paths"][0]["brush"], "pen");
    }

    #[test]
    fn in_progress_deltas_name_the_drawer() {
        let started = ServerMessage::StrokeStarted {
            session_id: "abc".into(),
            path: Path::new(vec![Point(0.0, 0.0)], Some("red".into()), None),
        };
        let value = started.to_json();
        assert_eq!(value[0], "stroke");
        assert_eq!(value[1], "abc");
        assert_eq!(value[2]["color"], "red");

        let appended = ServerMessage::PointsAppended { session_id: "abc".into(), points: vec![Point(1.0, 2.0)] };
        assert_eq!(appended.to_json(), json!(["points", "abc", [[1.0, 2.0]]]));
    }
}
