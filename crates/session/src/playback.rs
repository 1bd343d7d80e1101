//! Replay and caption playback drivers.
//!
//! These run during `AwaitingTranscription`: the sketch is redrawn with
//! its original timing while the caption stream (if transcription
//! succeeded) plays alongside. Both honor a shared cancellation flag so
//! the host can cut playback short when the participant moves on.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use sketchcap_transcribe::{CaptionWord, caption_cues};
use sketching::{Delay, ReplaySchedule, SketchRenderer, Stroke};

/// Replay the full history onto `renderer` with original pacing.
///
/// Returns false if the cancel flag was raised before the schedule ran
/// out. The renderer is left showing whatever had been drawn by then.
pub async fn run_replay(
    history: &[Stroke],
    renderer: &mut SketchRenderer,
    cancel: &AtomicBool,
) -> bool {
    for frame in ReplaySchedule::new(history) {
        if cancel.load(Ordering::SeqCst) {
            return false;
        }
        if let Delay::Wait(ms) = frame.delay {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
        if cancel.load(Ordering::SeqCst) {
            return false;
        }
        renderer.apply(&frame.op, history);
    }
    true
}

/// Stream transcribed words with their spoken pacing.
///
/// Each word is appended verbatim to the running caption line (words
/// arrive with their own leading spaces) and the full line is handed to
/// `on_caption`, then held for as long as the word was spoken.
pub async fn run_captions<F>(words: &[CaptionWord], cancel: &AtomicBool, mut on_caption: F)
where
    F: FnMut(&str),
{
    let mut line = String::new();
    for cue in caption_cues(words) {
        if cancel.load(Ordering::SeqCst) {
            return;
        }
        line.push_str(&cue.text);
        on_caption(line.trim_start());
        tokio::time::sleep(Duration::from_secs_f64(cue.hold_secs)).await;
    }
}
