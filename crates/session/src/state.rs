//! Session lifecycle types.

use serde::{Deserialize, Serialize};
use sketchcap_config::ConfigError;
use sketchcap_transcribe::CaptionWord;
use thiserror::Error;

use crate::audio::AudioError;

/// Where a capture session is in its lifecycle. Transitions only move
/// forward; there is no way back from a later phase to an earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Constructed and validated, recording has not started.
    Idle,
    /// The participant is drawing and audio is being captured.
    Recording,
    /// Recording has stopped; replay may run while the caption outcome
    /// is still unresolved.
    AwaitingTranscription,
    /// Playback acknowledged; waiting for a confidence rating.
    RatingConfidence,
    /// Trial output has been produced.
    Finished,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::Recording => "recording",
            SessionState::AwaitingTranscription => "awaiting-transcription",
            SessionState::RatingConfidence => "rating-confidence",
            SessionState::Finished => "finished",
        };
        f.write_str(name)
    }
}

/// Self-rated confidence collected at the end of a trial. Serialized
/// with the human-readable labels shown to the participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    #[serde(rename = "Very Confident")]
    VeryConfident,
    #[serde(rename = "Confident")]
    Confident,
    #[serde(rename = "Less Confident")]
    LessConfident,
    #[serde(rename = "Least Confident")]
    LeastConfident,
}

/// Outcome of the transcription request for the session's audio clip.
///
/// `Failed` is a terminal outcome, not an error: the session still
/// proceeds to playback and rating, only without captions.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptionState {
    Pending,
    Ready(Vec<CaptionWord>),
    Failed,
}

impl CaptionState {
    /// Whether the outcome is settled, in either direction.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, CaptionState::Pending)
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Cannot {action} while {state}")]
    InvalidState {
        action: &'static str,
        state: SessionState,
    },
    #[error("Audio capture failed: {0}")]
    Audio(#[from] AudioError),
    #[error("Final image encoding failed: {0}")]
    Image(#[from] sketching::SurfaceError),
    #[error("Background image decoding failed: {0}")]
    BackgroundImage(#[from] image::ImageError),
}
