//! FFprobe video information and the deterministic derivations built on it.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::error::{MediaError, MediaResult};

/// Video file information derived from an ffprobe call. `raw` preserves the
/// full decoded JSON verbatim so downstream steps can inspect fields this
/// struct does not itemize, per the "preserve the original blob" design note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoInfo {
    pub duration: f64,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub codec: String,
    pub size: u64,
    pub bitrate: u64,
    pub raw: serde_json::Value,
}

impl VideoInfo {
    /// GOP length in frames: `round(fps * 2.0)` clamped to `[24, 240]`.
    pub fn gop(&self) -> u32 {
        derive_gop(self.fps)
    }

    /// Timestamp in seconds for the poster frame: 10% of duration, or 0 if
    /// duration is unknown/non-positive.
    pub fn poster_timestamp(&self) -> f64 {
        if self.duration > 0.0 {
            self.duration * 0.10
        } else {
            0.0
        }
    }
}

/// `GOP = round(fps * 2.0)`, clamped to `[24, 240]`.
pub fn derive_gop(fps: f64) -> u32 {
    let raw = (fps * 2.0).round();
    raw.clamp(24.0, 240.0) as u32
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
    size: Option<String>,
    bit_rate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
}

/// Probe a video file for information. Times out the subprocess after
/// `timeout_secs`; a stuck ffprobe is a transient failure.
pub async fn probe_video(path: impl AsRef<Path>, timeout_secs: u64) -> MediaResult<VideoInfo> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }

    let binary = crate::command::ffprobe_bin();
    which::which(&binary).map_err(|_| MediaError::FfprobeNotFound)?;

    let child = Command::new(&binary)
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let output = match tokio::time::timeout(
        std::time::Duration::from_secs(timeout_secs),
        child.wait_with_output(),
    )
    .await
    {
        Ok(result) => result?,
        Err(_) => return Err(MediaError::Timeout(timeout_secs)),
    };

    if !output.status.success() {
        return Err(MediaError::FfprobeFailed {
            message: "ffprobe exited with non-zero status".to_string(),
            stderr: Some(String::from_utf8_lossy(&output.stderr).to_string()),
        });
    }

    let raw: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let probe: FfprobeOutput = serde_json::from_value(raw.clone())?;

    let video_stream = probe
        .streams
        .iter()
        .find(|s| s.codec_type == "video")
        .ok_or_else(|| MediaError::InvalidVideo("no video stream found".to_string()))?;

    let duration = probe
        .format
        .duration
        .as_ref()
        .and_then(|d| d.parse::<f64>().ok())
        .unwrap_or(0.0);

    let size = probe
        .format
        .size
        .as_ref()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0);

    let bitrate = probe
        .format
        .bit_rate
        .as_ref()
        .and_then(|b| b.parse::<u64>().ok())
        .unwrap_or(0);

    let fps = video_stream
        .avg_frame_rate
        .as_ref()
        .or(video_stream.r_frame_rate.as_ref())
        .and_then(|r| parse_frame_rate(r))
        .unwrap_or(30.0);

    Ok(VideoInfo {
        duration,
        width: video_stream.width.unwrap_or(0),
        height: video_stream.height.unwrap_or(0),
        fps,
        codec: video_stream.codec_name.clone().unwrap_or_default(),
        size,
        bitrate,
        raw,
    })
}

/// Parse an `N/D` (or plain decimal) frame-rate string. `D` must be
/// strictly positive, so `"1/0"` yields `None` and the caller falls back.
fn parse_frame_rate(s: &str) -> Option<f64> {
    if let Some((num, den)) = s.split_once('/') {
        let num: f64 = num.parse().ok()?;
        let den: f64 = den.parse().ok()?;
        if den > 0.0 {
            return Some(num / den);
        }
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fractional_and_plain_frame_rates() {
        assert!((parse_frame_rate("30/1").unwrap() - 30.0).abs() < 0.01);
        assert!((parse_frame_rate("30000/1001").unwrap() - 29.97).abs() < 0.01);
        assert!((parse_frame_rate("29.97").unwrap() - 29.97).abs() < 0.01);
        assert_eq!(parse_frame_rate("1/0"), None);
    }

    #[test]
    fn gop_derivation_matches_spec_scenarios() {
        // avg_frame_rate="30000/1001" => fps ~29.970 => GOP=60
        let fps = parse_frame_rate("30000/1001").unwrap();
        assert_eq!(derive_gop(fps), 60);

        // avg_frame_rate="60/1" => fps=60 => GOP=120
        let fps = parse_frame_rate("60/1").unwrap();
        assert_eq!(derive_gop(fps), 120);

        // avg_frame_rate="1/0" (invalid) => fps falls back to 30.0 => GOP=60
        assert_eq!(derive_gop(30.0), 60);
    }

    #[test]
    fn gop_is_clamped_to_24_240() {
        assert_eq!(derive_gop(1.0), 24);
        assert_eq!(derive_gop(1000.0), 240);
    }
}
