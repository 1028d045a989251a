//! HLS ladder transcoding. Each rung is an independently idempotent DAG
//! node: the caller checks for the rung's playlist object before invoking
//! this module at all.

use std::path::Path;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;

/// One HLS rendition rung.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rung {
    P720,
    P480,
}

impl Rung {
    pub fn label(&self) -> &'static str {
        match self {
            Rung::P720 => "720p",
            Rung::P480 => "480p",
        }
    }

    fn scale_height(&self) -> u32 {
        match self {
            Rung::P720 => 720,
            Rung::P480 => 480,
        }
    }

    fn crf(&self) -> u8 {
        match self {
            Rung::P720 => 20,
            Rung::P480 => 22,
        }
    }

    fn audio_bitrate(&self) -> &'static str {
        match self {
            Rung::P720 => "128k",
            Rung::P480 => "96k",
        }
    }
}

/// Encode `input` into a VOD HLS rendition at `rung` into `output_dir`,
/// writing `index.m3u8` and `seg_###.ts` segment files. `gop` is the
/// keyframe interval in frames (see [`crate::probe::derive_gop`]); segments
/// are GOP-aligned via `-force_key_frames` on a fixed 4s cadence.
pub async fn transcode_rung(
    input: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    rung: Rung,
    gop: u32,
    timeout_secs: u64,
) -> MediaResult<()> {
    let output_dir = output_dir.as_ref();
    tokio::fs::create_dir_all(output_dir).await?;
    let playlist = output_dir.join("index.m3u8");
    let segment_pattern = output_dir.join("seg_%03d.ts");

    let filter = format!("scale=-2:{}", rung.scale_height());
    let cmd = FfmpegCommand::new(input, &playlist)
        .video_filter(filter)
        .video_codec("libx264")
        .preset("veryfast")
        .crf(rung.crf())
        .audio_codec("aac")
        .audio_bitrate(rung.audio_bitrate())
        .output_arg("-profile:v")
        .output_arg("main")
        .output_arg("-g")
        .output_arg(gop.to_string())
        .output_arg("-keyint_min")
        .output_arg(gop.to_string())
        .output_arg("-sc_threshold")
        .output_arg("0")
        .output_arg("-hls_time")
        .output_arg("4")
        .output_arg("-hls_playlist_type")
        .output_arg("vod")
        .output_arg("-hls_segment_filename")
        .output_arg(segment_pattern.to_string_lossy().to_string())
        .output_arg("-f")
        .output_arg("hls");

    FfmpegRunner::new().with_timeout(timeout_secs).run(&cmd).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rung_parameters_match_spec_ladders() {
        assert_eq!(Rung::P720.scale_height(), 720);
        assert_eq!(Rung::P720.crf(), 20);
        assert_eq!(Rung::P720.audio_bitrate(), "128k");

        assert_eq!(Rung::P480.scale_height(), 480);
        assert_eq!(Rung::P480.crf(), 22);
        assert_eq!(Rung::P480.audio_bitrate(), "96k");
    }
}
