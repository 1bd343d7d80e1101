//! Stroke ledger: recording, undo/redo, and the persisted full history.
//!
//! This module provides:
//! - [`StrokeRecorder`] - Builds the single in-progress stroke
//! - [`StrokeLedger`] - Active ledger, redo buffer and full history with
//!   history-preserving undo/redo
//! - [`reconstruct_active`] - Rebuilds the active ledger from a full
//!   history alone (the round-trip law replay relies on)
//!
//! Undo and redo append timestamped marker strokes to the full history
//! instead of merely mutating the active ledger, so a later replay can
//! reproduce the exact sequence of visual changes the participant saw,
//! including erasures, not just the final picture.

mod recorder;
mod store;

pub use recorder::{RecorderError, StrokeRecorder};
pub use store::{reconstruct_active, RedoEntry, StrokeLedger};

pub(crate) use store::KindTrace;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StrokeKind;

    fn draw(ledger: &mut StrokeLedger, x: f32, t0: u64) {
        ledger.begin_stroke(x, 0.0, "#000000", t0).unwrap();
        ledger.extend_stroke(x + 1.0, 1.0, t0 + 20);
        ledger.end_stroke(t0 + 40).unwrap();
    }

    #[test]
    fn test_draw_undo_redo_draw_history() {
        // Draw A, undo, redo, draw B: the full history keeps all four
        // entries in temporal order and both strokes end up visible.
        let mut ledger = StrokeLedger::new();
        draw(&mut ledger, 0.0, 0); // A
        ledger.undo(150);
        ledger.redo(160);
        draw(&mut ledger, 50.0, 200); // B

        let history = ledger.full_history();
        assert_eq!(history.len(), 4);
        assert_eq!(history[0].kind, StrokeKind::Normal);
        assert!(history[1].is_marker());
        assert_eq!(history[1].kind, StrokeKind::Undo);
        assert!(history[2].is_marker());
        assert_eq!(history[2].kind, StrokeKind::Redo);
        assert_eq!(history[3].kind, StrokeKind::Normal);

        assert_eq!(ledger.active().len(), 2);
        assert_eq!(ledger.last_normal_index(), Some(3));
    }

    #[test]
    fn test_undo_then_redo_restores_state() {
        let mut ledger = StrokeLedger::new();
        draw(&mut ledger, 0.0, 0);
        draw(&mut ledger, 50.0, 100);

        let active_before = ledger.active().to_vec();
        let history_len_before = ledger.full_history().len();

        assert!(ledger.undo(250));
        assert!(ledger.redo(260));

        assert_eq!(ledger.active(), active_before.as_slice());
        assert!(!ledger.can_redo());
        // History only ever grows: two markers were appended.
        assert_eq!(ledger.full_history().len(), history_len_before + 2);
    }

    #[test]
    fn test_two_strokes_one_undo_enablement() {
        let mut ledger = StrokeLedger::new();
        draw(&mut ledger, 0.0, 0);
        draw(&mut ledger, 50.0, 100);

        assert!(ledger.undo(250));
        assert_eq!(ledger.active().len(), 1);
        assert_eq!(ledger.redo_depth(), 1);
        assert!(ledger.can_redo());
        // One visible stroke remains, so undo stays enabled.
        assert!(ledger.can_undo());
    }

    #[test]
    fn test_undo_empty_is_noop() {
        let mut ledger = StrokeLedger::new();
        assert!(!ledger.undo(10));
        assert!(!ledger.redo(10));
        assert!(ledger.full_history().is_empty());
    }

    #[test]
    fn test_begin_stroke_clears_redo_buffer() {
        let mut ledger = StrokeLedger::new();
        draw(&mut ledger, 0.0, 0);
        ledger.undo(100);
        assert!(ledger.can_redo());

        draw(&mut ledger, 50.0, 200);
        assert!(!ledger.can_redo());
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut ledger = StrokeLedger::new();
        draw(&mut ledger, 0.0, 0);
        draw(&mut ledger, 50.0, 100);
        ledger.undo(250);

        ledger.clear();
        assert!(ledger.active().is_empty());
        assert!(ledger.full_history().is_empty());
        assert!(!ledger.can_undo());
        assert!(!ledger.can_redo());
        assert_eq!(ledger.last_normal_index(), None);
    }

    #[test]
    fn test_undo_draw_undo_flips_right_strokes() {
        // Undo B, draw C, undo C: the second undo must erase C, not B.
        let mut ledger = StrokeLedger::new();
        draw(&mut ledger, 0.0, 0); // A, index 0
        draw(&mut ledger, 50.0, 100); // B, index 1
        ledger.undo(250); // marker index 2
        draw(&mut ledger, 80.0, 300); // C, index 3
        ledger.undo(400); // marker index 4

        let history_len = ledger.full_history().len();
        assert_eq!(ledger.full_history()[0].kind, StrokeKind::Normal); // A visible
        assert_eq!(ledger.full_history()[1].kind, StrokeKind::Undo); // B erased
        assert_eq!(ledger.full_history()[3].kind, StrokeKind::Undo); // C erased
        assert_eq!(ledger.last_normal_index(), Some(0));

        // And redo restores C, the stroke most recently undone.
        assert!(ledger.redo(450));
        assert_eq!(history_len + 1, ledger.full_history().len());
        assert_eq!(ledger.full_history()[3].kind, StrokeKind::Normal);
        assert_eq!(ledger.full_history()[1].kind, StrokeKind::Undo);
        assert_eq!(ledger.last_normal_index(), Some(3));
        assert_eq!(ledger.active().len(), 2);
    }

    #[test]
    fn test_undo_past_markers_scans_to_previous_normal() {
        let mut ledger = StrokeLedger::new();
        draw(&mut ledger, 0.0, 0); // index 0
        ledger.undo(100); // marker 1
        ledger.redo(110); // marker 2
        draw(&mut ledger, 50.0, 200); // index 3
        ledger.undo(300); // marker 4, erases index 3

        // Cursor skips markers 2 and 1 back to stroke 0.
        assert_eq!(ledger.last_normal_index(), Some(0));
        ledger.undo(350);
        assert_eq!(ledger.last_normal_index(), None);
        assert!(ledger.active().is_empty());
    }

    #[test]
    fn test_reconstruct_matches_active_ledger() {
        // Round-trip law over a sequence that mixes every operation.
        let mut ledger = StrokeLedger::new();
        draw(&mut ledger, 0.0, 0);
        draw(&mut ledger, 10.0, 100);
        draw(&mut ledger, 20.0, 200);
        ledger.undo(300);
        ledger.undo(310);
        ledger.redo(320);
        draw(&mut ledger, 30.0, 400);
        ledger.undo(500);

        let rebuilt = reconstruct_active(ledger.full_history());
        assert_eq!(rebuilt, ledger.active());
    }

    #[test]
    fn test_reconstruct_full_undo_redo_stack() {
        let mut ledger = StrokeLedger::new();
        draw(&mut ledger, 0.0, 0);
        draw(&mut ledger, 10.0, 100);
        ledger.undo(200);
        ledger.undo(210);
        ledger.redo(220);
        ledger.redo(230);

        assert_eq!(ledger.active().len(), 2);
        let rebuilt = reconstruct_active(ledger.full_history());
        assert_eq!(rebuilt, ledger.active());
    }
}
