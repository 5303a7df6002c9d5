//! Inbound client messages.
//!
//! WIRE FORMAT
//! ===========
//! Every client message is a JSON array `[command, ...args]`:
//!
//! - `["chat", text]`
//! - `["start-stroke", points, color?, brush?]` (alias `"s"`)
//! - `["append-point", points]` (alias `"p"`)
//! - `["end-stroke"]` (alias `"e"`)
//!
//! `points` is either a flat number list `[x0, y0, x1, y1, ...]` or a list of
//! pairs `[[x0, y0], [x1, y1], ...]`.
//!
//! Decoding is strict about shape but the caller is permissive about
//! failures: a `DecodeError` is logged and the message dropped.

use serde_json::Value;

use super::model::{Brush, Point};

#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    Chat(String),
    StartStroke { points: Vec<Point>, color: Option<String>, brush: Option<Brush> },
    AppendPoints(Vec<Point>),
    EndStroke,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid json: {0}")]
    InvalidJson(String),
    #[error("message must be a non-empty array")]
    NotAnArray,
    #[error("command must be a string")]
    MissingCommand,
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("invalid payload for {command}: {reason}")]
    InvalidPayload { command: &'static str, reason: &'static str },
}

impl ClientMessage {
    /// Decode a raw text frame.
    ///
    /// # Errors
    ///
    /// Returns a `DecodeError` if the text is not a recognized message.
    pub fn decode(text: &str) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_str(text).map_err(|e| DecodeError::InvalidJson(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Decode an already parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns a `DecodeError` if the value is not a recognized message.
    pub fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let Some(items) = value.as_array().filter(|items| !items.is_empty()) else {
            return Err(DecodeError::NotAnArray);
        };
        let Some(command) = items[0].as_str() else {
            return Err(DecodeError::MissingCommand);
        };
        let args = &items[1..];

        match command {
            "chat" => match args.first() {
                Some(Value::String(text)) => Ok(Self::Chat(text.clone())),
                _ => Err(DecodeError::InvalidPayload { command: "chat", reason: "text must be a string" }),
            },
            "start-stroke" | "s" => {
                let points = match args.first() {
                    None | Some(Value::Null) => Vec::new(),
                    Some(raw) => parse_points(raw).ok_or(DecodeError::InvalidPayload {
                        command: "start-stroke",
                        reason: "points must be numbers or [x, y] pairs",
                    })?,
                };
                let color = args.get(1).and_then(Value::as_str).map(str::to_owned);
                let brush = args.get(2).and_then(Value::as_str).map(Brush::parse);
                Ok(Self::StartStroke { points, color, brush })
            }
            "append-point" | "p" => args
                .first()
                .and_then(parse_points)
                .map(Self::AppendPoints)
                .ok_or(DecodeError::InvalidPayload {
                    command: "append-point",
                    reason: "points must be numbers or [x, y] pairs",
                }),
            "end-stroke" | "e" => Ok(Self::EndStroke),
            other => Err(DecodeError::UnknownCommand(other.to_owned())),
        }
    }

    /// Stroke commands are subject to the countdown gate; chat is not.
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        !matches!(self, Self::Chat(_))
    }
}

/// Parse either point encoding. A trailing unpaired number is dropped.
fn parse_points(raw: &Value) -> Option<Vec<Point>> {
    let items = raw.as_array()?;

    if items.iter().all(Value::is_number) {
        let coords: Vec<f64> = items.iter().filter_map(Value::as_f64).collect();
        return Some(
            coords
                .chunks_exact(2)
                .map(|pair| Point(pair[0], pair[1]))
                .collect(),
        );
    }

    items
        .iter()
        .map(|item| match item.as_array().map(Vec::as_slice) {
            Some([x, y]) => Some(Point(x.as_f64()?, y.as_f64()?)),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
#[path = "command_test.rs"]
mod tests;
