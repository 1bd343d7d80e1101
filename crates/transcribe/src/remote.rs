//! Remote transcription endpoint client

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use tracing::{debug, error};

use crate::{CaptionWord, Transcriber, TranscriptionError, TranscriptionResponse};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Transcription client that posts the audio clip to an HTTP endpoint.
///
/// The endpoint accepts a single audio file as the multipart field
/// `file` and answers `{ "transcription": [...] }`, or a non-2xx status
/// on failure.
pub struct HttpTranscriber {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpTranscriber {
    pub fn new(endpoint: String) -> Result<Self, TranscriptionError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TranscriptionError::Request(e.to_string()))?;
        Ok(Self { endpoint, client })
    }
}

impl Transcriber for HttpTranscriber {
    async fn transcribe(
        &self,
        audio: &[u8],
        file_name: &str,
        mime: &str,
    ) -> Result<Vec<CaptionWord>, TranscriptionError> {
        debug!(
            endpoint = %self.endpoint,
            bytes = audio.len(),
            "sending transcription request"
        );

        let part = Part::bytes(audio.to_vec())
            .file_name(file_name.to_string())
            .mime_str(mime)
            .map_err(|e| TranscriptionError::Request(e.to_string()))?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                error!("transcription request failed: {e}");
                TranscriptionError::Request(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(status = status.as_u16(), "transcription endpoint failed");
            return Err(TranscriptionError::Status(status.as_u16()));
        }

        let body: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::InvalidResponse(e.to_string()))?;

        debug!(words = body.transcription.len(), "transcription complete");
        Ok(body.transcription)
    }
}
