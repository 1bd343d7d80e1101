//! The capture session: one trial from first pointer event to output.

use sketchcap_config::SketchpadConfig;
use sketchcap_transcribe::{CaptionWord, TranscriptionError, Transcriber};
use sketching::{SketchRenderer, StrokeLedger};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::audio::{AudioClip, AudioRecorder};
use crate::output::TrialOutput;
use crate::state::{CaptionState, ConfidenceLevel, SessionError, SessionState};

/// A single sketch-capture trial.
///
/// The session owns the stroke ledger, the live canvas, and the audio
/// recorder, and enforces the forward-only lifecycle. It is driven by a
/// host event loop; see [`crate::events::drive_recording`] for the
/// recording phase and [`crate::playback`] for the replay phase.
pub struct CaptureSession<R: AudioRecorder> {
    config: SketchpadConfig,
    state: SessionState,
    ledger: StrokeLedger,
    renderer: SketchRenderer,
    recorder: R,
    current_color: String,
    /// Last known pointer position over the canvas, if any.
    cursor: Option<(f32, f32)>,
    draw_key_held: bool,
    started_at: Option<Instant>,
    deadline: Option<Instant>,
    response_key: Option<char>,
    clip: Option<AudioClip>,
    caption: CaptionState,
    confidence: Option<ConfidenceLevel>,
}

impl<R: AudioRecorder> CaptureSession<R> {
    /// Validate the configuration and set up an idle session.
    pub fn new(config: SketchpadConfig, recorder: R) -> Result<Self, SessionError> {
        config.validate()?;
        let (width, height) = config.canvas_size();
        let background = config.background_rgba()?;
        let renderer = SketchRenderer::new(width, height, config.stroke_width, background);
        let current_color = config.stroke_color.clone();
        Ok(Self {
            config,
            state: SessionState::Idle,
            ledger: StrokeLedger::new(),
            renderer,
            recorder,
            current_color,
            cursor: None,
            draw_key_held: false,
            started_at: None,
            deadline: None,
            response_key: None,
            clip: None,
            caption: CaptionState::Pending,
            confidence: None,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &SketchpadConfig {
        &self.config
    }

    pub fn ledger(&self) -> &StrokeLedger {
        &self.ledger
    }

    /// The live canvas, as drawn so far.
    pub fn renderer(&self) -> &SketchRenderer {
        &self.renderer
    }

    pub fn caption(&self) -> &CaptionState {
        &self.caption
    }

    pub fn clip(&self) -> Option<&AudioClip> {
        self.clip.as_ref()
    }

    /// When the trial-duration timeout fires, if one is configured.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Milliseconds since recording began. Zero before `begin`.
    pub fn elapsed_ms(&self) -> u64 {
        match self.started_at {
            Some(start) => start.elapsed().as_millis() as u64,
            None => 0,
        }
    }

    /// Install a background image on the live canvas from its encoded
    /// bytes (the host resolves `config.background_image` to bytes).
    /// Painted beneath the strokes and restored on every clear and
    /// catch-up redraw.
    pub fn set_background_image(&mut self, bytes: &[u8]) -> Result<(), SessionError> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        self.renderer.set_background_image(&image);
        Ok(())
    }

    /// Start the trial clock and the audio recorder.
    ///
    /// A recorder that fails to start does not abort the trial; the
    /// session continues without audio and the caption outcome is marked
    /// failed up front.
    pub fn begin(&mut self) -> Result<(), SessionError> {
        self.expect_state(SessionState::Idle, "begin recording")?;
        if let Err(err) = self.recorder.start() {
            warn!("Audio recorder failed to start, continuing without audio: {err}");
            self.caption = CaptionState::Failed;
        }
        let now = Instant::now();
        self.started_at = Some(now);
        self.deadline = self
            .config
            .trial_duration
            .map(|ms| now + std::time::Duration::from_millis(ms));
        self.state = SessionState::Recording;
        Ok(())
    }

    // ---- drawing-phase input ------------------------------------------

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        if self.state != SessionState::Recording {
            return;
        }
        self.cursor = Some((x, y));
        // The draw key is an additional way to press the pen down, not a
        // replacement: pointer presses always draw.
        self.open_stroke(x, y);
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if self.state != SessionState::Recording {
            return;
        }
        self.cursor = Some((x, y));
        if self.ledger.is_drawing() {
            let t = self.elapsed_ms();
            self.ledger.extend_stroke(x, y, t);
            self.renderer.line_to(x, y);
        }
    }

    pub fn pointer_up(&mut self) {
        if self.state != SessionState::Recording {
            return;
        }
        self.close_stroke();
    }

    /// The pointer left the canvas: any open stroke ends there.
    pub fn pointer_leave(&mut self) {
        if self.state != SessionState::Recording {
            return;
        }
        self.cursor = None;
        self.close_stroke();
    }

    /// Handle a key press during recording. End-trial keys are handled by
    /// the driver (they need the async finish); this covers the draw key.
    pub fn key_down(&mut self, key: char) {
        if self.state != SessionState::Recording {
            return;
        }
        if self.config.key_to_draw == Some(key) && !self.draw_key_held {
            self.draw_key_held = true;
            if let Some((x, y)) = self.cursor {
                self.open_stroke(x, y);
            }
        }
    }

    pub fn key_up(&mut self, key: char) {
        if self.state != SessionState::Recording {
            return;
        }
        if self.config.key_to_draw == Some(key) && self.draw_key_held {
            self.draw_key_held = false;
            self.close_stroke();
        }
    }

    /// Whether `key` is one of the configured end-trial keys.
    pub fn is_choice_key(&self, key: char) -> bool {
        self.config.choices.contains(&key)
    }

    pub fn select_color(&mut self, color: String) {
        self.current_color = color;
    }

    pub fn can_undo(&self) -> bool {
        self.state == SessionState::Recording && self.ledger.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.state == SessionState::Recording && self.ledger.can_redo()
    }

    pub fn can_clear(&self) -> bool {
        self.state == SessionState::Recording
            && (!self.ledger.active().is_empty() || self.ledger.is_drawing())
    }

    /// Undo the most recent visible stroke and repaint the live canvas.
    pub fn undo(&mut self) -> bool {
        if self.state != SessionState::Recording {
            return false;
        }
        let t = self.elapsed_ms();
        let undone = self.ledger.undo(t);
        if undone {
            self.repaint_live_canvas();
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        if self.state != SessionState::Recording {
            return false;
        }
        let t = self.elapsed_ms();
        let redone = self.ledger.redo(t);
        if redone {
            self.repaint_live_canvas();
        }
        redone
    }

    /// Wipe the visible canvas and all stroke state.
    pub fn clear_drawing(&mut self) {
        if self.state != SessionState::Recording {
            return;
        }
        self.ledger.clear();
        self.renderer.clear();
    }

    fn open_stroke(&mut self, x: f32, y: f32) {
        let t = self.elapsed_ms();
        let color = self.current_color.clone();
        match self.ledger.begin_stroke(x, y, &color, t) {
            Ok(()) => self.renderer.begin_path(x, y, &color),
            Err(err) => debug!("pointer down with a stroke already open: {err}"),
        }
    }

    fn close_stroke(&mut self) {
        if self.ledger.is_drawing() {
            let t = self.elapsed_ms();
            if let Err(err) = self.ledger.end_stroke(t) {
                debug!("pointer up without an open stroke: {err}");
            }
        }
    }

    fn repaint_live_canvas(&mut self) {
        self.renderer.clear();
        let strokes = self.ledger.active().to_vec();
        for stroke in &strokes {
            self.renderer.paint_stroke(stroke);
        }
    }

    // ---- phase transitions --------------------------------------------

    /// End the drawing phase: close any open stroke, stop the recorder,
    /// and move to `AwaitingTranscription`.
    ///
    /// `response` records the end-trial key, when one triggered the
    /// finish. Recorder failure at this point degrades to a trial without
    /// audio, exactly like a failure at `begin`.
    pub async fn finish(&mut self, response: Option<char>) -> Result<(), SessionError> {
        self.expect_state(SessionState::Recording, "finish recording")?;
        self.close_stroke();
        self.response_key = response;
        if self.caption == CaptionState::Pending {
            match self.recorder.stop().await {
                Ok(clip) => self.clip = Some(clip),
                Err(err) => {
                    warn!("Audio recorder failed to stop, trial has no audio: {err}");
                    self.caption = CaptionState::Failed;
                }
            }
        }
        self.state = SessionState::AwaitingTranscription;
        Ok(())
    }

    /// Send the recorded clip for transcription and record the outcome.
    ///
    /// Intended to run concurrently with replay playback; the session is
    /// usable for playback the moment `finish` returns. A missing clip or
    /// a failed request both settle the caption outcome as `Failed`, which
    /// still lets the trial proceed.
    pub async fn run_transcription<T: Transcriber>(&mut self, transcriber: &T) {
        if self.caption.is_resolved() {
            return;
        }
        let Some(clip) = self.clip.as_ref() else {
            self.caption = CaptionState::Failed;
            return;
        };
        match transcriber
            .transcribe(&clip.bytes, "recorded_audio.wav", &clip.mime)
            .await
        {
            Ok(words) => self.caption = CaptionState::Ready(words),
            Err(err) => {
                warn!("Transcription failed, continuing without captions: {err}");
                self.caption = CaptionState::Failed;
            }
        }
    }

    /// Record a transcription outcome produced outside the session.
    pub fn set_caption_result(&mut self, result: Result<Vec<CaptionWord>, TranscriptionError>) {
        match result {
            Ok(words) => self.caption = CaptionState::Ready(words),
            Err(err) => {
                warn!("Transcription failed, continuing without captions: {err}");
                self.caption = CaptionState::Failed;
            }
        }
    }

    /// Whether the participant may move past the playback screen. Gated
    /// on the caption outcome being settled, success or failure alike.
    pub fn can_acknowledge_playback(&self) -> bool {
        self.state == SessionState::AwaitingTranscription && self.caption.is_resolved()
    }

    /// Leave the playback screen and ask for a confidence rating.
    pub fn acknowledge_playback(&mut self) -> Result<(), SessionError> {
        self.expect_state(SessionState::AwaitingTranscription, "acknowledge playback")?;
        if !self.caption.is_resolved() {
            return Err(SessionError::InvalidState {
                action: "acknowledge playback before transcription settles",
                state: self.state,
            });
        }
        self.state = SessionState::RatingConfidence;
        Ok(())
    }

    pub fn select_confidence(&mut self, level: ConfidenceLevel) -> Result<(), SessionError> {
        self.expect_state(SessionState::RatingConfidence, "rate confidence")?;
        self.confidence = Some(level);
        Ok(())
    }

    /// Produce the trial output and consume the session.
    pub fn complete(mut self) -> Result<TrialOutput, SessionError> {
        self.expect_state(SessionState::RatingConfidence, "complete the trial")?;
        let Some(confidence) = self.confidence else {
            return Err(SessionError::InvalidState {
                action: "complete the trial before rating",
                state: self.state,
            });
        };
        self.state = SessionState::Finished;
        let rt = self.elapsed_ms();
        let png = if self.config.save_final_image {
            Some(self.renderer.surface().to_png_data_url()?)
        } else {
            None
        };
        let strokes = self
            .config
            .save_strokes
            .then(|| self.ledger.into_full_history());
        let (audio_url, audio_response) = match self.clip {
            Some(ref clip) => (Some(clip.to_data_url()), Some(clip.to_base64())),
            None => (None, None),
        };
        Ok(TrialOutput {
            rt,
            response: self.response_key,
            png,
            strokes,
            audio_url,
            audio_response,
            confidence_level: confidence,
        })
    }

    fn expect_state(
        &self,
        expected: SessionState,
        action: &'static str,
    ) -> Result<(), SessionError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                action,
                state: self.state,
            })
        }
    }
}
