//! Error types for media processing.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur during media processing.
///
/// Most variants correspond to the transient/structural split the Job
/// Worker orchestrator uses to decide retry vs terminal failure: a timed
/// out or killed subprocess is transient, a missing binary or malformed
/// input is structural.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("FFprobe not found in PATH")]
    FfprobeNotFound,

    #[error("FFmpeg command failed: {message}")]
    FfmpegFailed {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("FFprobe command failed: {message}")]
    FfprobeFailed {
        message: String,
        stderr: Option<String>,
    },

    #[error("transcription binary not found in PATH")]
    TranscriberNotFound,

    #[error("transcription command failed: {message}")]
    TranscriptionFailed { message: String },

    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("operation cancelled")]
    Cancelled,

    #[error("operation timed out after {0} seconds")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("invalid video file: {0}")]
    InvalidVideo(String),
}

impl MediaError {
    pub fn ffmpeg_failed(
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::FfmpegFailed {
            message: message.into(),
            stderr,
            exit_code,
        }
    }

    pub fn transcription_failed(message: impl Into<String>) -> Self {
        Self::TranscriptionFailed {
            message: message.into(),
        }
    }

    /// Whether this failure is transient (network/timeout/subprocess exit)
    /// per the taxonomy in the error handling design, as opposed to
    /// structural (bad input, missing binary).
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            MediaError::Timeout(_)
                | MediaError::Cancelled
                | MediaError::FfmpegFailed { .. }
                | MediaError::TranscriptionFailed { .. }
                | MediaError::Io(_)
        )
    }
}
