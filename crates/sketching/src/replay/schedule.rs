//! Lazy, time-ordered schedule of replay render instructions.

use crate::constants::MIN_TIMER_GAP_MS;
use crate::ledger::KindTrace;
use crate::types::{ElapsedMs, PointEvent, Stroke, StrokeKind};

/// How long to hold before rendering a frame's op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delay {
    /// Gap below the collapsing threshold: render with no timer.
    Immediate,
    /// Wait this many milliseconds first.
    Wait(ElapsedMs),
}

impl Delay {
    pub fn millis(&self) -> ElapsedMs {
        match self {
            Delay::Immediate => 0,
            Delay::Wait(ms) => *ms,
        }
    }
}

/// One render instruction for the replay canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOp {
    /// Start a pen path at the stroke's first point.
    Begin { x: f32, y: f32, color: String },
    /// Extend the pen path with a segment.
    Line { x: f32, y: f32 },
    /// Clear to background and repaint the listed history indices in
    /// order. Emitted when an undo/redo marker is reached.
    Redraw { visible: Vec<usize> },
}

/// A scheduled render instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayFrame {
    pub delay: Delay,
    pub op: RenderOp,
}

/// Iterator reconstructing the drawing frame-by-frame from the full
/// history, with inter-frame delays matching the recorded timestamps.
///
/// The schedule carries its own replay state: a cursor pair over
/// strokes/points, the elapsed time of the last fired timer, and a
/// shadow copy of every stroke's kind. Stored kinds already reflect the
/// undo/redo flips that happened live, so geometry strokes are reset to
/// Normal here and the flips are re-applied in order as their markers
/// are reached; the ledger itself is never mutated, which keeps replay
/// restartable.
///
/// Delays below [`MIN_TIMER_GAP_MS`] collapse into an immediate render
/// and do not advance the fired-time anchor, so closely spaced points
/// coalesce into a single paint without accumulating timing error.
#[derive(Debug)]
pub struct ReplaySchedule<'a> {
    history: &'a [Stroke],
    trace: KindTrace,
    stroke_index: usize,
    point_index: usize,
    last_fired: ElapsedMs,
    min_gap: ElapsedMs,
}

impl<'a> ReplaySchedule<'a> {
    pub fn new(history: &'a [Stroke]) -> Self {
        Self::with_min_gap(history, MIN_TIMER_GAP_MS)
    }

    /// Schedule with a custom collapsing threshold. A threshold of zero
    /// fires a timer for every event.
    pub fn with_min_gap(history: &'a [Stroke], min_gap: ElapsedMs) -> Self {
        Self {
            history,
            trace: KindTrace::new(history),
            stroke_index: 0,
            point_index: 0,
            last_fired: 0,
            min_gap,
        }
    }

    /// Elapsed time of the last fired timer; the sum of all waited
    /// delays so far.
    pub fn last_fired(&self) -> ElapsedMs {
        self.last_fired
    }

    fn pace(&mut self, t: ElapsedMs) -> Delay {
        let gap = t.saturating_sub(self.last_fired);
        if gap >= self.min_gap {
            self.last_fired += gap;
            Delay::Wait(gap)
        } else {
            Delay::Immediate
        }
    }

    /// History indices up to the shadow cursor whose kind is currently
    /// Normal; what a catch-up redraw repaints.
    fn visible(&self) -> Vec<usize> {
        let Some(upto) = self.trace.last_normal() else {
            return Vec::new();
        };
        (0..=upto)
            .filter(|&i| self.trace.kind(i) == StrokeKind::Normal && self.history[i].has_geometry())
            .collect()
    }
}

impl Iterator for ReplaySchedule<'_> {
    type Item = ReplayFrame;

    fn next(&mut self) -> Option<ReplayFrame> {
        loop {
            let stroke = self.history.get(self.stroke_index)?;

            if self.point_index == 0 && stroke.is_marker() {
                let t = stroke.first_t().unwrap_or(self.last_fired);
                self.trace.apply_marker(stroke.kind);
                let delay = self.pace(t);
                let visible = self.visible();
                self.stroke_index += 1;
                return Some(ReplayFrame {
                    delay,
                    op: RenderOp::Redraw { visible },
                });
            }

            if self.point_index == 0 {
                self.trace.note_geometry(self.stroke_index);
            }

            match stroke.points.get(self.point_index) {
                Some(PointEvent::Start { x, y, color, t }) => {
                    let delay = self.pace(*t);
                    self.point_index += 1;
                    return Some(ReplayFrame {
                        delay,
                        op: RenderOp::Begin {
                            x: *x,
                            y: *y,
                            color: color.clone(),
                        },
                    });
                }
                Some(PointEvent::Move { x, y, t }) => {
                    let delay = self.pace(*t);
                    self.point_index += 1;
                    return Some(ReplayFrame {
                        delay,
                        op: RenderOp::Line { x: *x, y: *y },
                    });
                }
                // The end point renders nothing; advance to the next
                // stroke and keep pacing from its first event.
                Some(PointEvent::End { .. }) | Some(PointEvent::Mark { .. }) | None => {
                    self.stroke_index += 1;
                    self.point_index = 0;
                }
            }
        }
    }
}
