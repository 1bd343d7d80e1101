use serde::{Deserialize, Serialize};

/// Elapsed milliseconds since trial start.
pub type ElapsedMs = u64;

/// One point-level drawing event within a stroke.
///
/// Geometry strokes are exactly one `Start`, zero or more `Move` and a
/// terminal `End`. Undo/redo marker strokes consist of a single `Mark`
/// carrying only the time the action occurred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum PointEvent {
    /// Begins a stroke at canvas coordinates with a stroke color.
    Start {
        x: f32,
        y: f32,
        /// Stroke color as a `#rrggbb` hex string
        color: String,
        t: ElapsedMs,
    },
    /// Extends the current stroke.
    Move { x: f32, y: f32, t: ElapsedMs },
    /// Terminates the current stroke.
    End { t: ElapsedMs },
    /// Sole point of an undo/redo marker stroke (no geometry).
    Mark { t: ElapsedMs },
}

impl PointEvent {
    /// Elapsed time of this event.
    pub fn t(&self) -> ElapsedMs {
        match self {
            PointEvent::Start { t, .. }
            | PointEvent::Move { t, .. }
            | PointEvent::End { t }
            | PointEvent::Mark { t } => *t,
        }
    }
}

/// Kind tag of a stroke.
///
/// `Normal` marks a user-drawn gesture. `Undo`/`Redo` mark synthetic
/// marker strokes, and an earlier `Normal` stroke's tag is flipped to
/// `Undo` (erased) or back to `Normal` when a marker lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrokeKind {
    Normal,
    Undo,
    Redo,
}

/// One continuous pointer-down-to-pointer-up gesture, or a marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub kind: StrokeKind,
    pub points: Vec<PointEvent>,
}

impl Stroke {
    /// Create an undo/redo marker stroke at the given time.
    pub fn marker(kind: StrokeKind, t: ElapsedMs) -> Self {
        Self {
            kind,
            points: vec![PointEvent::Mark { t }],
        }
    }

    /// Whether this stroke is a marker (single `Mark` point, no geometry).
    pub fn is_marker(&self) -> bool {
        matches!(self.points.first(), Some(PointEvent::Mark { .. }))
    }

    /// Whether this stroke carries drawable geometry.
    pub fn has_geometry(&self) -> bool {
        matches!(self.points.first(), Some(PointEvent::Start { .. }))
    }

    /// Elapsed time of the first point, if any.
    pub fn first_t(&self) -> Option<ElapsedMs> {
        self.points.first().map(PointEvent::t)
    }

    /// Elapsed time of the last point, if any.
    pub fn last_t(&self) -> Option<ElapsedMs> {
        self.points.last().map(PointEvent::t)
    }

    /// Stroke color from the `Start` point; `None` for markers.
    pub fn color(&self) -> Option<&str> {
        match self.points.first() {
            Some(PointEvent::Start { color, .. }) => Some(color),
            _ => None,
        }
    }
}
