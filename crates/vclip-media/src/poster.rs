//! Poster frame extraction: a single JPEG at 10% of duration.

use std::path::Path;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;

/// Extract a single frame as a JPEG (`q:v=2`) at `timestamp_secs`.
pub async fn extract_poster(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    timestamp_secs: f64,
    timeout_secs: u64,
) -> MediaResult<()> {
    let cmd = FfmpegCommand::new(input, output)
        .seek(timestamp_secs)
        .single_frame()
        .output_arg("-q:v")
        .output_arg("2");

    FfmpegRunner::new().with_timeout(timeout_secs).run(&cmd).await
}
