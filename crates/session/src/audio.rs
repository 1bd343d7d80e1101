//! Audio capture abstraction.
//!
//! The session never talks to a microphone directly. A host supplies an
//! [`AudioRecorder`] and the session drives it: started when recording
//! begins, stopped (asynchronously) when the drawing phase ends. Stopping
//! is the one point the session must await, because the encoded clip only
//! exists once the recorder has flushed it.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("Recorder unavailable: {0}")]
    Unavailable(String),
    #[error("Recorder was not capturing")]
    NotCapturing,
    #[error("Recorder was already capturing")]
    AlreadyCapturing,
}

/// A finished audio recording with its encoded bytes.
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    /// MIME type of `bytes`, e.g. `audio/wav` or `audio/webm`.
    pub mime: String,
}

impl AudioClip {
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// Encode the clip as a `data:` URL suitable for an audio element.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.to_base64())
    }
}

/// Host-provided microphone capture.
///
/// `start` is synchronous because recorders buffer internally; `stop` is
/// async because producing the final clip may involve encoder flushing.
#[allow(async_fn_in_trait)]
pub trait AudioRecorder {
    fn start(&mut self) -> Result<(), AudioError>;
    async fn stop(&mut self) -> Result<AudioClip, AudioError>;
}
