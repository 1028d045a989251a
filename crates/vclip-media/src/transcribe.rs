//! Speech-to-text: mono 16kHz PCM WAV in, ordered timed segments out.
//!
//! Transcription is invoked the same way as ffmpeg/ffprobe: a configured
//! subprocess binary expected to emit a JSON array of segments on stdout.
//! This keeps the collaborator swappable (whisper.cpp, a hosted ASR CLI,
//! a test double) without coupling the pipeline to a specific engine.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

use crate::error::{MediaError, MediaResult};
use crate::transcript::TranscriptSegment;

#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe a mono 16kHz WAV file into ordered segments. Empty or
    /// silent audio yields an empty list, never an error.
    async fn transcribe(&self, wav_path: &Path) -> MediaResult<Vec<TranscriptSegment>>;
}

/// Shells out to a configured transcription binary, parsing its stdout as
/// a JSON array of `{start, end, text, lang}` objects.
pub struct SubprocessTranscriber {
    pub binary: String,
    pub timeout_secs: u64,
    pub language_hint: Option<String>,
}

impl SubprocessTranscriber {
    pub fn new(binary: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            binary: binary.into(),
            timeout_secs,
            language_hint: None,
        }
    }

    pub fn with_language_hint(mut self, lang: impl Into<String>) -> Self {
        self.language_hint = Some(lang.into());
        self
    }
}

#[derive(Debug, Deserialize)]
struct RawSegment {
    start: f64,
    end: f64,
    text: String,
    lang: Option<String>,
}

#[async_trait]
impl Transcriber for SubprocessTranscriber {
    async fn transcribe(&self, wav_path: &Path) -> MediaResult<Vec<TranscriptSegment>> {
        which::which(&self.binary).map_err(|_| MediaError::TranscriberNotFound)?;

        let mut cmd = Command::new(&self.binary);
        cmd.arg("--input")
            .arg(wav_path)
            .arg("--output-format")
            .arg("json");
        if let Some(lang) = &self.language_hint {
            cmd.arg("--language").arg(lang);
        }

        let child = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let output = match tokio::time::timeout(
            std::time::Duration::from_secs(self.timeout_secs),
            child.wait_with_output(),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => return Err(MediaError::Timeout(self.timeout_secs)),
        };

        if !output.status.success() {
            return Err(MediaError::transcription_failed(format!(
                "{} exited with {:?}: {}",
                self.binary,
                output.status.code(),
                String::from_utf8_lossy(&output.stderr)
            )));
        }

        if output.stdout.trim_ascii().is_empty() {
            return Ok(Vec::new());
        }

        let raw: Vec<RawSegment> = serde_json::from_slice(&output.stdout)?;
        Ok(raw
            .into_iter()
            .map(|r| TranscriptSegment {
                start: r.start,
                end: r.end,
                text: r.text,
                lang: r.lang,
            })
            .collect())
    }
}

/// A transcriber that always returns no segments, for pipelines that run
/// with transcription disabled.
pub struct NullTranscriber;

#[async_trait]
impl Transcriber for NullTranscriber {
    async fn transcribe(&self, _wav_path: &Path) -> MediaResult<Vec<TranscriptSegment>> {
        Ok(Vec::new())
    }
}
