//! Transcript segments: the shared shape between transcription, VTT
//! emission, chunking, and the recovery path that re-parses an existing
//! caption object.

use serde::{Deserialize, Serialize};

/// An ordered, timed piece of transcribed speech.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
    pub lang: Option<String>,
}
