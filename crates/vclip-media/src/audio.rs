//! Audio extraction for transcription: mono, 16 kHz PCM WAV.

use std::path::Path;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;

pub async fn extract_audio_for_transcription(
    input: impl AsRef<Path>,
    output_wav: impl AsRef<Path>,
    timeout_secs: u64,
) -> MediaResult<()> {
    let cmd = FfmpegCommand::new(input, output_wav)
        .output_arg("-vn")
        .output_arg("-ac")
        .output_arg("1")
        .output_arg("-ar")
        .output_arg("16000")
        .audio_codec("pcm_s16le");

    FfmpegRunner::new().with_timeout(timeout_secs).run(&cmd).await
}
