//! Trial output record.

use serde::{Deserialize, Serialize};
use sketching::Stroke;

use crate::state::ConfidenceLevel;

/// Everything a completed trial reports back to the host experiment.
///
/// `png` and `strokes` are omitted from the serialized record when the
/// corresponding save options are disabled, rather than written as null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialOutput {
    /// Milliseconds from the start of recording to trial completion.
    pub rt: u64,
    /// The end-trial key the participant pressed, if any.
    pub response: Option<char>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub png: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strokes: Option<Vec<Stroke>>,
    /// Recorded audio as a `data:` URL, if capture succeeded.
    pub audio_url: Option<String>,
    /// Raw base64 of the recorded audio, if capture succeeded.
    pub audio_response: Option<String>,
    pub confidence_level: ConfidenceLevel,
}
