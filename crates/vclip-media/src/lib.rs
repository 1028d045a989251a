//! Media Processor: probe, GOP derivation, HLS transcoding to two fixed
//! ladders, poster extraction, audio extraction, speech-to-text, VTT
//! emission and indexing chunking. Each step is individually idempotent;
//! the orchestrator in `vclip-worker` decides when to invoke each one.

pub mod audio;
pub mod chunk;
pub mod command;
pub mod error;
pub mod poster;
pub mod probe;
pub mod progress;
pub mod transcode;
pub mod transcribe;
pub mod transcript;
pub mod vtt;

pub use audio::extract_audio_for_transcription;
pub use chunk::{chunk_segments, TranscriptChunk, CHUNK_MAX_CHARS, CHUNK_MIN_CHARS};
pub use command::{FfmpegCommand, FfmpegRunner};
pub use error::{MediaError, MediaResult};
pub use poster::extract_poster;
pub use probe::{derive_gop, probe_video, VideoInfo};
pub use progress::{FfmpegProgress, ProgressCallback};
pub use transcode::{transcode_rung, Rung};
pub use transcribe::{NullTranscriber, SubprocessTranscriber, Transcriber};
pub use transcript::TranscriptSegment;
pub use vtt::{emit_vtt, parse_vtt};
