//! Capture-session orchestration for sketchcap.
//!
//! A trial moves through a fixed lifecycle: idle, recording (drawing and
//! audio capture), awaiting transcription (replay playback), confidence
//! rating, finished. [`CaptureSession`] holds the state machine; the
//! async drivers in [`events`], [`playback`], and [`countdown`] run its
//! time-dependent phases on tokio.

pub mod audio;
pub mod countdown;
pub mod events;
pub mod output;
pub mod playback;
pub mod session;
pub mod state;

pub use audio::{AudioClip, AudioError, AudioRecorder};
pub use events::{SessionEvent, drive_recording};
pub use output::TrialOutput;
pub use session::CaptureSession;
pub use state::{CaptionState, ConfidenceLevel, SessionError, SessionState};

#[cfg(test)]
mod tests {
    use super::*;
    use sketchcap_config::SketchpadConfig;
    use sketchcap_transcribe::{CaptionWord, TranscriptionError, Transcriber};
    use sketching::StrokeKind;

    struct FakeRecorder {
        started: bool,
        fail_start: bool,
        fail_stop: bool,
    }

    impl FakeRecorder {
        fn new() -> Self {
            Self {
                started: false,
                fail_start: false,
                fail_stop: false,
            }
        }
    }

    impl AudioRecorder for FakeRecorder {
        fn start(&mut self) -> Result<(), AudioError> {
            if self.fail_start {
                return Err(AudioError::Unavailable("no microphone".to_string()));
            }
            if self.started {
                return Err(AudioError::AlreadyCapturing);
            }
            self.started = true;
            Ok(())
        }

        async fn stop(&mut self) -> Result<AudioClip, AudioError> {
            if !self.started {
                return Err(AudioError::NotCapturing);
            }
            self.started = false;
            if self.fail_stop {
                return Err(AudioError::Unavailable("encoder died".to_string()));
            }
            Ok(AudioClip {
                bytes: vec![1, 2, 3, 4],
                mime: "audio/wav".to_string(),
            })
        }
    }

    struct FixedTranscriber(Result<Vec<CaptionWord>, ()>);

    impl Transcriber for FixedTranscriber {
        async fn transcribe(
            &self,
            _audio: &[u8],
            _file_name: &str,
            _mime: &str,
        ) -> Result<Vec<CaptionWord>, TranscriptionError> {
            match &self.0 {
                Ok(words) => Ok(words.clone()),
                Err(()) => Err(TranscriptionError::Status(500)),
            }
        }
    }

    fn draw_one_stroke<R: AudioRecorder>(session: &mut CaptureSession<R>) {
        session.pointer_down(10.0, 10.0);
        session.pointer_move(20.0, 20.0);
        session.pointer_up();
    }

    #[tokio::test]
    async fn test_full_lifecycle_produces_output() {
        let config = SketchpadConfig::default();
        let mut session = CaptureSession::new(config, FakeRecorder::new()).unwrap();
        assert_eq!(session.state(), SessionState::Idle);

        session.begin().unwrap();
        assert_eq!(session.state(), SessionState::Recording);
        draw_one_stroke(&mut session);
        assert_eq!(session.ledger().active().len(), 1);

        session.finish(Some('f')).await.unwrap();
        assert_eq!(session.state(), SessionState::AwaitingTranscription);
        assert!(session.clip().is_some());
        assert!(!session.can_acknowledge_playback());

        let transcriber = FixedTranscriber(Ok(vec![CaptionWord {
            text: "hello".to_string(),
            timestamp: [0.0, 0.4],
        }]));
        session.run_transcription(&transcriber).await;
        assert!(matches!(session.caption(), CaptionState::Ready(words) if words.len() == 1));
        assert!(session.can_acknowledge_playback());

        session.acknowledge_playback().unwrap();
        session
            .select_confidence(ConfidenceLevel::VeryConfident)
            .unwrap();
        let output = session.complete().unwrap();
        assert_eq!(output.response, Some('f'));
        assert!(output.png.is_some());
        let strokes = output.strokes.unwrap();
        assert_eq!(strokes.len(), 1);
        assert_eq!(strokes[0].kind, StrokeKind::Normal);
        assert!(output.audio_url.unwrap().starts_with("data:audio/wav;base64,"));
        assert!(output.audio_response.is_some());
    }

    #[tokio::test]
    async fn test_failed_transcription_still_reaches_rating() {
        let mut session =
            CaptureSession::new(SketchpadConfig::default(), FakeRecorder::new()).unwrap();
        session.begin().unwrap();
        draw_one_stroke(&mut session);
        session.finish(None).await.unwrap();

        session
            .run_transcription(&FixedTranscriber(Err(())))
            .await;
        assert_eq!(*session.caption(), CaptionState::Failed);
        assert!(session.can_acknowledge_playback());
        session.acknowledge_playback().unwrap();
        session
            .select_confidence(ConfidenceLevel::LessConfident)
            .unwrap();
        let output = session.complete().unwrap();
        assert!(output.audio_url.is_some());
    }

    #[tokio::test]
    async fn test_recorder_failure_degrades_to_silent_trial() {
        let recorder = FakeRecorder {
            fail_start: true,
            ..FakeRecorder::new()
        };
        let mut session = CaptureSession::new(SketchpadConfig::default(), recorder).unwrap();
        session.begin().unwrap();
        draw_one_stroke(&mut session);
        session.finish(None).await.unwrap();
        // The caption outcome settled as failed the moment capture broke,
        // so playback can be acknowledged without any transcription call.
        assert_eq!(*session.caption(), CaptionState::Failed);
        assert!(session.can_acknowledge_playback());
        session.acknowledge_playback().unwrap();
        session
            .select_confidence(ConfidenceLevel::LeastConfident)
            .unwrap();
        let output = session.complete().unwrap();
        assert!(output.audio_url.is_none());
        assert!(output.audio_response.is_none());
    }

    #[tokio::test]
    async fn test_stop_failure_loses_audio_but_not_trial() {
        let recorder = FakeRecorder {
            fail_stop: true,
            ..FakeRecorder::new()
        };
        let mut session = CaptureSession::new(SketchpadConfig::default(), recorder).unwrap();
        session.begin().unwrap();
        session.finish(None).await.unwrap();
        assert!(session.clip().is_none());
        assert_eq!(*session.caption(), CaptionState::Failed);
        assert!(session.can_acknowledge_playback());
    }

    #[tokio::test]
    async fn test_acknowledge_blocked_until_caption_settles() {
        let mut session =
            CaptureSession::new(SketchpadConfig::default(), FakeRecorder::new()).unwrap();
        session.begin().unwrap();
        session.finish(None).await.unwrap();
        assert!(session.acknowledge_playback().is_err());
        session.set_caption_result(Ok(Vec::new()));
        session.acknowledge_playback().unwrap();
    }

    #[tokio::test]
    async fn test_undo_redo_controls_track_ledger() {
        let mut session =
            CaptureSession::new(SketchpadConfig::default(), FakeRecorder::new()).unwrap();
        session.begin().unwrap();
        assert!(!session.can_undo());
        assert!(!session.can_clear());
        draw_one_stroke(&mut session);
        assert!(session.can_undo());
        assert!(session.can_clear());
        assert!(!session.can_redo());
        assert!(session.undo());
        assert!(session.ledger().active().is_empty());
        assert!(session.can_redo());
        assert!(session.redo());
        assert_eq!(session.ledger().active().len(), 1);
        // Two markers plus the stroke itself in the full history.
        assert_eq!(session.ledger().full_history().len(), 3);
    }

    #[tokio::test]
    async fn test_draw_key_acts_like_pointer_press() {
        let config = SketchpadConfig {
            key_to_draw: Some('d'),
            ..SketchpadConfig::default()
        };
        let mut session = CaptureSession::new(config, FakeRecorder::new()).unwrap();
        session.begin().unwrap();

        // The pointer still draws on its own; the draw key is additive.
        session.pointer_down(10.0, 10.0);
        session.pointer_move(20.0, 20.0);
        session.pointer_up();
        assert_eq!(session.ledger().active().len(), 1);

        // Holding the key draws from the tracked cursor position.
        session.pointer_move(10.0, 10.0);
        session.key_down('d');
        session.pointer_move(20.0, 20.0);
        session.key_up('d');
        assert_eq!(session.ledger().active().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_trial_duration_forces_finish() {
        let config = SketchpadConfig {
            trial_duration: Some(2_000),
            ..SketchpadConfig::default()
        };
        let mut session = CaptureSession::new(config, FakeRecorder::new()).unwrap();
        session.begin().unwrap();
        let (tx, mut rx) = tokio::sync::mpsc::channel(8);
        tx.send(SessionEvent::PointerDown { x: 5.0, y: 5.0 })
            .await
            .unwrap();
        // No further input; the deadline must end the phase on its own,
        // committing the still-open stroke.
        drive_recording(&mut session, &mut rx).await.unwrap();
        assert_eq!(session.state(), SessionState::AwaitingTranscription);
        assert_eq!(session.ledger().active().len(), 1);
        assert!(session.elapsed_ms() >= 2_000);
    }

    #[tokio::test]
    async fn test_choice_key_ends_trial_with_response() {
        let config = SketchpadConfig {
            choices: vec!['j', 'k'],
            ..SketchpadConfig::default()
        };
        let mut session = CaptureSession::new(config, FakeRecorder::new()).unwrap();
        session.begin().unwrap();
        let (tx, mut rx) = tokio::sync::mpsc::channel(8);
        tx.send(SessionEvent::KeyDown('k')).await.unwrap();
        drive_recording(&mut session, &mut rx).await.unwrap();
        assert_eq!(session.state(), SessionState::AwaitingTranscription);
        session.set_caption_result(Ok(Vec::new()));
        session.acknowledge_playback().unwrap();
        session
            .select_confidence(ConfidenceLevel::Confident)
            .unwrap();
        let output = session.complete().unwrap();
        assert_eq!(output.response, Some('k'));
    }

    #[tokio::test]
    async fn test_background_image_installs_from_encoded_bytes() {
        let mut image = image::RgbaImage::new(4, 4);
        for pixel in image.pixels_mut() {
            *pixel = image::Rgba([0, 0, 255, 255]);
        }
        let mut bytes = std::io::Cursor::new(Vec::new());
        image.write_to(&mut bytes, image::ImageFormat::Png).unwrap();

        let mut session =
            CaptureSession::new(SketchpadConfig::default(), FakeRecorder::new()).unwrap();
        session.set_background_image(&bytes.into_inner()).unwrap();
        assert_eq!(
            session.renderer().surface().get_pixel(0, 0),
            Some([0.0, 0.0, 1.0, 1.0])
        );
    }

    #[tokio::test]
    async fn test_undecodable_background_image_is_an_error() {
        let mut session =
            CaptureSession::new(SketchpadConfig::default(), FakeRecorder::new()).unwrap();
        assert!(matches!(
            session.set_background_image(b"not an image"),
            Err(SessionError::BackgroundImage(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_transitions_are_rejected() {
        let mut session =
            CaptureSession::new(SketchpadConfig::default(), FakeRecorder::new()).unwrap();
        assert!(matches!(
            session.finish(None).await,
            Err(SessionError::InvalidState { .. })
        ));
        session.begin().unwrap();
        assert!(session.begin().is_err());
        assert!(session.acknowledge_playback().is_err());
    }
}
