//! Stroke ledgers: active projection, redo buffer, full history.

use tracing::{debug, warn};

use crate::types::{ElapsedMs, Stroke, StrokeKind};

use super::recorder::{RecorderError, StrokeRecorder};

/// A stroke popped off the active ledger by undo, together with the
/// full-history index whose kind was flipped, so redo can flip exactly
/// the stroke it restores.
#[derive(Debug, Clone)]
pub struct RedoEntry {
    pub stroke: Stroke,
    pub history_index: usize,
}

/// Owns the three stroke collections and the last-normal cursor.
///
/// - active ledger: currently visible strokes, what undo/redo operate on
/// - redo buffer: strokes available to redo, cleared when drawing resumes
/// - full history: append-only record of every stroke and marker ever
///   produced, the sole input to replay and the persisted trial data
///
/// Undo and redo are recorded twice: the active ledger mutates, and a
/// timestamped marker lands in the full history with the affected
/// stroke's kind flipped, so replay can reproduce the exact sequence of
/// visual changes including erasures.
#[derive(Debug, Default)]
pub struct StrokeLedger {
    recorder: StrokeRecorder,
    active: Vec<Stroke>,
    redo_buffer: Vec<RedoEntry>,
    full_history: Vec<Stroke>,
    /// Most recent full-history index whose kind is currently Normal.
    last_normal_index: Option<usize>,
}

impl StrokeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a stroke is currently being drawn.
    pub fn is_drawing(&self) -> bool {
        self.recorder.is_recording()
    }

    /// Currently visible strokes.
    pub fn active(&self) -> &[Stroke] {
        &self.active
    }

    /// Complete timestamped record of every stroke and marker.
    pub fn full_history(&self) -> &[Stroke] {
        &self.full_history
    }

    /// Cursor at the most recent currently-Normal history stroke.
    pub fn last_normal_index(&self) -> Option<usize> {
        self.last_normal_index
    }

    /// Undo is available while visible strokes remain.
    pub fn can_undo(&self) -> bool {
        !self.active.is_empty()
    }

    /// Redo is available until drawing resumes.
    pub fn can_redo(&self) -> bool {
        !self.redo_buffer.is_empty()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_buffer.len()
    }

    /// Open a new stroke. Clears the redo buffer: once drawing resumes,
    /// undone strokes can no longer be restored.
    pub fn begin_stroke(
        &mut self,
        x: f32,
        y: f32,
        color: &str,
        t: ElapsedMs,
    ) -> Result<(), RecorderError> {
        self.recorder.start(x, y, color, t)?;
        self.redo_buffer.clear();
        Ok(())
    }

    /// Extend the open stroke. Pointer moves outside an active draw are
    /// ignored.
    pub fn extend_stroke(&mut self, x: f32, y: f32, t: ElapsedMs) {
        if let Err(RecorderError::NotStarted) = self.recorder.extend(x, y, t) {
            debug!("extend_stroke: no stroke open, ignoring");
        }
    }

    /// Close the open stroke and commit it to the active ledger and the
    /// full history.
    pub fn end_stroke(&mut self, t: ElapsedMs) -> Result<(), RecorderError> {
        let stroke = self.recorder.finish(t)?;
        self.active.push(stroke.clone());
        self.full_history.push(stroke);
        self.last_normal_index = Some(self.full_history.len() - 1);
        Ok(())
    }

    /// Undo the most recent visible stroke.
    ///
    /// Returns false (and leaves all state untouched) when nothing is
    /// undoable; the corresponding control is disabled in that state.
    pub fn undo(&mut self, t: ElapsedMs) -> bool {
        let Some(stroke) = self.active.pop() else {
            debug!("undo: active ledger empty, ignoring");
            return false;
        };

        let Some(index) = self.last_normal_index else {
            // Unreachable while the cursor invariant holds; restore the
            // popped stroke rather than desync the ledgers.
            warn!("undo: no last-normal cursor despite visible strokes");
            self.active.push(stroke);
            return false;
        };

        self.full_history[index].kind = StrokeKind::Undo;
        self.last_normal_index = self.previous_normal(index);
        self.redo_buffer.push(RedoEntry {
            stroke,
            history_index: index,
        });
        self.full_history.push(Stroke::marker(StrokeKind::Undo, t));
        debug!(history_index = index, "undid stroke");
        true
    }

    /// Restore the most recently undone stroke.
    pub fn redo(&mut self, t: ElapsedMs) -> bool {
        let Some(entry) = self.redo_buffer.pop() else {
            debug!("redo: redo buffer empty, ignoring");
            return false;
        };

        self.full_history[entry.history_index].kind = StrokeKind::Normal;
        self.last_normal_index = Some(entry.history_index);
        self.active.push(entry.stroke);
        self.full_history.push(Stroke::marker(StrokeKind::Redo, t));
        debug!(history_index = entry.history_index, "redid stroke");
        true
    }

    /// Empty every collection, including the full history.
    pub fn clear(&mut self) {
        self.recorder.abort();
        self.active.clear();
        self.redo_buffer.clear();
        self.full_history.clear();
        self.last_normal_index = None;
    }

    /// Take ownership of the full history at trial end.
    pub fn into_full_history(self) -> Vec<Stroke> {
        self.full_history
    }

    /// Nearest history index before `from` whose kind is Normal.
    fn previous_normal(&self, from: usize) -> Option<usize> {
        self.full_history[..from]
            .iter()
            .rposition(|s| s.kind == StrokeKind::Normal)
    }
}

/// Shadow replay of the kind flips a full history encodes.
///
/// Stored kinds already reflect the flips that happened live, so replay
/// (and reconstruction) resets every geometry stroke to Normal and
/// re-applies the flips in marker order, without touching the ledger.
/// Undo flips the stroke at the cursor and remembers its index on a
/// stack; Redo pops that stack and flips the same stroke back. A new
/// geometry stroke clears the stack, mirroring the live redo buffer, so
/// each marker lands on exactly the stroke the participant's action
/// affected for any draw/undo/redo interleaving.
#[derive(Debug)]
pub(crate) struct KindTrace {
    kinds: Vec<StrokeKind>,
    last_normal: Option<usize>,
    redo_stack: Vec<usize>,
}

impl KindTrace {
    pub(crate) fn new(history: &[Stroke]) -> Self {
        Self {
            kinds: history
                .iter()
                .map(|s| if s.is_marker() { s.kind } else { StrokeKind::Normal })
                .collect(),
            last_normal: None,
            redo_stack: Vec::new(),
        }
    }

    /// Cursor at the most recent currently-Normal stroke.
    pub(crate) fn last_normal(&self) -> Option<usize> {
        self.last_normal
    }

    pub(crate) fn kind(&self, index: usize) -> StrokeKind {
        self.kinds[index]
    }

    /// A geometry stroke was reached: it becomes the cursor and, like a
    /// fresh pointer-down live, invalidates any redoable strokes.
    pub(crate) fn note_geometry(&mut self, index: usize) {
        self.last_normal = Some(index);
        self.redo_stack.clear();
    }

    /// Re-apply one marker's flip.
    pub(crate) fn apply_marker(&mut self, marker: StrokeKind) {
        match marker {
            StrokeKind::Undo => match self.last_normal {
                Some(index) => {
                    self.kinds[index] = StrokeKind::Undo;
                    self.redo_stack.push(index);
                    self.last_normal = self.kinds[..index]
                        .iter()
                        .rposition(|k| *k == StrokeKind::Normal);
                }
                None => warn!("undo marker with no preceding normal stroke"),
            },
            StrokeKind::Redo => match self.redo_stack.pop() {
                Some(index) => {
                    self.kinds[index] = StrokeKind::Normal;
                    self.last_normal = Some(index);
                }
                None => warn!("redo marker with no matching undo"),
            },
            StrokeKind::Normal => {}
        }
    }
}

/// Reconstruct the active ledger from a full history alone.
///
/// Walks the history re-applying every kind flip in order; the geometry
/// strokes left Normal are exactly the visible ones. This is the
/// round-trip law the ledger maintains incrementally.
pub fn reconstruct_active(history: &[Stroke]) -> Vec<Stroke> {
    let mut trace = KindTrace::new(history);

    for (i, stroke) in history.iter().enumerate() {
        if stroke.is_marker() {
            trace.apply_marker(stroke.kind);
        } else {
            trace.note_geometry(i);
        }
    }

    history
        .iter()
        .enumerate()
        .filter(|(i, s)| !s.is_marker() && trace.kind(*i) == StrokeKind::Normal)
        .map(|(_, s)| {
            let mut stroke = s.clone();
            stroke.kind = StrokeKind::Normal;
            stroke
        })
        .collect()
}
