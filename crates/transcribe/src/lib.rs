//! External transcription adapter for sketchcap
//!
//! Sends a recorded-audio clip to the captioning endpoint and returns a
//! time-aligned caption: word entries in chronological order, each with
//! a `[start, end]` timestamp in seconds. Transcription is best-effort;
//! a failure is surfaced once and never retried.

mod remote;

pub use remote::HttpTranscriber;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Transcription endpoint returned status {0}")]
    Status(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// One transcribed word with its `[start, end]` timestamp in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionWord {
    pub text: String,
    pub timestamp: [f64; 2],
}

/// Wire shape of the endpoint's JSON body.
#[derive(Debug, Deserialize)]
pub(crate) struct TranscriptionResponse {
    pub transcription: Vec<CaptionWord>,
}

/// Trait for transcription backends
#[allow(async_fn_in_trait)]
pub trait Transcriber {
    /// Transcribe a recorded audio clip into time-aligned caption words
    async fn transcribe(
        &self,
        audio: &[u8],
        file_name: &str,
        mime: &str,
    ) -> Result<Vec<CaptionWord>, TranscriptionError>;
}

/// One step of caption playback: show `text`, hold for `hold_secs`.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionCue {
    pub text: String,
    pub hold_secs: f64,
}

/// Timing plan for word-by-word caption playback.
///
/// Each word is held for `end - start` seconds before the next one is
/// appended; an exhausted sequence simply ends the playback.
pub fn caption_cues(words: &[CaptionWord]) -> Vec<CaptionCue> {
    words
        .iter()
        .map(|word| CaptionCue {
            text: word.text.clone(),
            hold_secs: (word.timestamp[1] - word.timestamp[0]).max(0.0),
        })
        .collect()
}
