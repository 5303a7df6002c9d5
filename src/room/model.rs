//! Stroke model — one freehand path and one participant record.
//!
//! A `Path` is mutable only while a `Player` holds it as the in-progress
//! stroke. Committing moves it into the room's path list, after which nothing
//! hands out a mutable reference to it again.

use serde::{Deserialize, Serialize};

/// Color applied when a stroke starts without one.
pub const DEFAULT_COLOR: &str = "#000000";

/// A single `(x, y)` sample. Serializes as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point(pub f64, pub f64);

/// Fixed set of brush styles a stroke can be drawn with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Brush {
    #[default]
    Sketch,
    Marker,
    Pen,
}

impl Brush {
    /// Parse a brush tag. Unknown tags resolve to the default brush.
    #[must_use]
    pub fn parse(tag: &str) -> Self {
        match tag {
            "marker" => Self::Marker,
            "pen" => Self::Pen,
            _ => Self::Sketch,
        }
    }
}

/// One freehand stroke: ordered points plus style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub points: Vec<Point>,
    pub color: String,
    pub brush: Brush,
}

impl Path {
    #[must_use]
    pub fn new(points: Vec<Point>, color: Option<String>, brush: Option<Brush>) -> Self {
        Self {
            points,
            color: color.unwrap_or_else(|| DEFAULT_COLOR.into()),
            brush: brush.unwrap_or_default(),
        }
    }

    /// Append samples in drawing order.
    pub fn extend(&mut self, points: impl IntoIterator<Item = Point>) {
        self.points.extend(points);
    }
}

/// Session-scoped participant state.
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    pub name: String,
    /// Stroke currently being drawn, owned by this player until committed.
    pub path: Option<Path>,
}

impl Player {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), path: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brush_parse_known_tags() {
        assert_eq!(Brush::parse("marker"), Brush::Marker);
        assert_eq!(Brush::parse("pen"), Brush::Pen);
        assert_eq!(Brush::parse("sketch"), Brush::Sketch);
    }

    #[test]
    fn brush_parse_unknown_falls_back_to_default() {
        assert_eq!(Brush::parse("crayon"), Brush::default());
        assert_eq!(Brush::parse(""), Brush::Sketch);
    }

    #[test]
    fn path_new_applies_defaults() {
        let path = Path::new(vec![Point(1.0, 2.0)], None, None);
        assert_eq!(path.color, DEFAULT_COLOR);
        assert_eq!(path.brush, Brush::Sketch);
        assert_eq!(path.points, vec![Point(1.0, 2.0)]);
    }

    #[test]
    fn path_extend_keeps_drawing_order() {
        let mut path = Path::new(vec![Point(0.0, 0.0)], Some("red".into()), Some(Brush::Pen));
        path.extend([Point(1.0, 1.0), Point(2.0, 0.5)]);
        assert_eq!(path.points, vec![Point(0.0, 0.0), Point(1.0, 1.0), Point(2.0, 0.5)]);
    }

    #[test]
    fn path_serializes_points_as_pairs() {
        let path = Path::new(vec![Point(3.0, 4.0)], Some("red".into()), Some(Brush::Marker));
        let json = serde_json::to_value(&path).unwrap();
        assert_eq!(json, serde_json::json!({"points": [[3.0, 4.0]], "color": "red", "brush": "marker"}));
    }

    #[test]
    fn player_serialization_skips_in_progress_path() {
        let mut player = Player::new("Quiet Otter");
        player.path = Some(Path::new(vec![], None, None));
        let json = serde_json::to_value(&player).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Quiet Otter"}));
    }
}
