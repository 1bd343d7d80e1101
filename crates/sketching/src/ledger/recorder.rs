//! Builder for the single in-progress stroke.

use crate::types::{ElapsedMs, PointEvent, Stroke, StrokeKind};

/// Error type for stroke recording operations.
#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    #[error("Stroke not started - call start() first")]
    NotStarted,
    #[error("Stroke already started - call finish() first")]
    AlreadyStarted,
}

/// Builds one stroke at a time from pointer input.
///
/// At most one stroke is open at any moment; `start` on an open recorder
/// and `extend`/`finish` on a closed one are errors the caller decides
/// how to surface (pointer moves outside an active draw are ignored at
/// the ledger level).
#[derive(Debug, Default)]
pub struct StrokeRecorder {
    /// Points of the stroke being drawn (None if not recording)
    open: Option<Vec<PointEvent>>,
}

impl StrokeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a stroke is currently open.
    pub fn is_recording(&self) -> bool {
        self.open.is_some()
    }

    /// Open a new stroke with its `Start` point.
    pub fn start(
        &mut self,
        x: f32,
        y: f32,
        color: &str,
        t: ElapsedMs,
    ) -> Result<(), RecorderError> {
        if self.open.is_some() {
            return Err(RecorderError::AlreadyStarted);
        }
        self.open = Some(vec![PointEvent::Start {
            x,
            y,
            color: color.to_string(),
            t,
        }]);
        Ok(())
    }

    /// Append a `Move` point to the open stroke.
    pub fn extend(&mut self, x: f32, y: f32, t: ElapsedMs) -> Result<(), RecorderError> {
        let points = self.open.as_mut().ok_or(RecorderError::NotStarted)?;
        points.push(PointEvent::Move { x, y, t });
        Ok(())
    }

    /// Close the stroke with its `End` point and return it.
    pub fn finish(&mut self, t: ElapsedMs) -> Result<Stroke, RecorderError> {
        let mut points = self.open.take().ok_or(RecorderError::NotStarted)?;
        points.push(PointEvent::End { t });
        Ok(Stroke {
            kind: StrokeKind::Normal,
            points,
        })
    }

    /// Drop any open stroke without completing it.
    pub fn abort(&mut self) {
        self.open = None;
    }

    /// Number of points in the open stroke (0 if not recording).
    pub fn open_point_count(&self) -> usize {
        self.open.as_ref().map_or(0, Vec::len)
    }
}
