//! Video and video-asset models.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ids::{UserId, VideoAssetId, VideoId};

/// Lifecycle status of a video. Progresses only along
/// `uploaded -> processing -> ready`, or any state `-> failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum VideoStatus {
    #[default]
    Uploaded,
    Processing,
    Ready,
    Failed,
}

impl VideoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoStatus::Uploaded => "uploaded",
            VideoStatus::Processing => "processing",
            VideoStatus::Ready => "ready",
            VideoStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for VideoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for VideoStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uploaded" => Ok(VideoStatus::Uploaded),
            "processing" => Ok(VideoStatus::Processing),
            "ready" => Ok(VideoStatus::Ready),
            "failed" => Ok(VideoStatus::Failed),
            other => Err(format!("unknown video status: {other}")),
        }
    }
}

/// A video owned by a user. Mutated only by the Job Worker after upload
/// finalize hands it over in `uploaded` state.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Video {
    pub id: VideoId,
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub original_filename: String,
    pub storage_key_raw: String,
    pub status: VideoStatus,
    pub duration_seconds: Option<f64>,
    pub content_type: Option<String>,
    pub language: Option<String>,
    /// Opaque ffprobe output, preserved verbatim for downstream inspection.
    pub probe: Option<serde_json::Value>,
    pub checksum: Option<String>,
    pub error: Option<String>,
    pub notified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Video {
    pub fn new_uploaded(
        user_id: UserId,
        title: impl Into<String>,
        original_filename: impl Into<String>,
        storage_key_raw: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: VideoId::new(),
            user_id,
            title: title.into(),
            description: String::new(),
            original_filename: original_filename.into(),
            storage_key_raw: storage_key_raw.into(),
            status: VideoStatus::Uploaded,
            duration_seconds: None,
            content_type: None,
            language: None,
            probe: None,
            checksum: None,
            error: None,
            notified_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Title to show a user, falling back through the chain described in
    /// the Notifier Worker's fallback semantics.
    pub fn display_title(&self) -> String {
        if !self.title.trim().is_empty() {
            return self.title.clone();
        }
        if !self.original_filename.trim().is_empty() {
            return self.original_filename.clone();
        }
        "your video".to_string()
    }
}

/// Kind of derived artifact recorded against a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Hls,
    Thumbnail,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Hls => "hls",
            AssetKind::Thumbnail => "thumbnail",
        }
    }
}

/// Rung/variant label within a kind: `720p`/`480p` for `hls`, `poster` for
/// `thumbnail`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AssetLabel {
    #[serde(rename = "720p")]
    Rung720p,
    #[serde(rename = "480p")]
    Rung480p,
    Poster,
}

impl AssetLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetLabel::Rung720p => "720p",
            AssetLabel::Rung480p => "480p",
            AssetLabel::Poster => "poster",
        }
    }
}

/// A single derived artifact of a video; unique on (video, kind, label).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VideoAsset {
    pub id: VideoAssetId,
    pub video_id: VideoId,
    pub kind: AssetKind,
    pub label: AssetLabel,
    pub storage_key: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VideoAsset {
    pub fn new(
        video_id: VideoId,
        kind: AssetKind,
        label: AssetLabel,
        storage_key: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: VideoAssetId::new(),
            video_id,
            kind,
            label,
            storage_key: storage_key.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_title_falls_back_through_chain() {
        let mut v = Video::new_uploaded(UserId::new(), "", "", "raw/key");
        v.original_filename = String::new();
        assert_eq!(v.display_title(), "your video");

        v.original_filename = "clip.mp4".to_string();
        assert_eq!(v.display_title(), "clip.mp4");

        v.title = "My Talk".to_string();
        assert_eq!(v.display_title(), "My Talk");
    }

    #[test]
    fn video_status_round_trips_through_str() {
        for s in ["uploaded", "processing", "ready", "failed"] {
            let status: VideoStatus = s.parse().unwrap();
            assert_eq!(status.to_string(), s);
        }
    }
}
