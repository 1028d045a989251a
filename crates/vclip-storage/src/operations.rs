//! Key layout and content-type mapping for the video ingest pipeline.
//!
//! Object store layout (bucket `media` by default):
//! ```text
//! raw/{user}/{video}.{ext}
//! hls/{video}/720p/index.m3u8, seg_###.ts
//! hls/{video}/480p/index.m3u8, seg_###.ts
//! thumbs/{video}/poster.jpg
//! captions/{video}/{lang}.vtt
//! ```

use crate::client::R2Client;
use crate::error::StorageResult;

/// HLS rung label (`720p`/`480p`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rung {
    P720,
    P480,
}

impl Rung {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rung::P720 => "720p",
            Rung::P480 => "480p",
        }
    }
}

/// Deterministic object keys. All intermediate keys are pure functions of
/// `video_id` and label so pipeline re-entry is safe at any step.
pub struct Keys;

impl Keys {
    pub fn raw(user_id: &str, video_id: &str, ext: &str) -> String {
        format!("raw/{user_id}/{video_id}.{ext}")
    }

    pub fn hls_playlist(video_id: &str, rung: Rung) -> String {
        format!("hls/{video_id}/{}/index.m3u8", rung.as_str())
    }

    pub fn hls_prefix(video_id: &str, rung: Rung) -> String {
        format!("hls/{video_id}/{}/", rung.as_str())
    }

    pub fn hls_segment(video_id: &str, rung: Rung, index: u32) -> String {
        format!("hls/{video_id}/{}/seg_{index:03}.ts", rung.as_str())
    }

    pub fn poster(video_id: &str) -> String {
        format!("thumbs/{video_id}/poster.jpg")
    }

    pub fn thumbs_prefix(video_id: &str) -> String {
        format!("thumbs/{video_id}/")
    }

    pub fn caption(video_id: &str, lang: &str) -> String {
        format!("captions/{video_id}/{lang}.vtt")
    }

    pub fn captions_prefix(video_id: &str) -> String {
        format!("captions/{video_id}/")
    }

    pub fn hls_root_prefix(video_id: &str) -> String {
        format!("hls/{video_id}/")
    }
}

/// Content type for an object key, by suffix. Falls back to
/// `application/octet-stream` for anything unrecognized.
pub fn content_type_for_key(key: &str) -> &'static str {
    if key.ends_with(".m3u8") {
        "application/vnd.apple.mpegurl"
    } else if key.ends_with(".ts") {
        "video/MP2T"
    } else if key.ends_with(".mp4") {
        "video/mp4"
    } else if key.ends_with(".jpg") || key.ends_with(".jpeg") {
        "image/jpeg"
    } else if key.ends_with(".png") {
        "image/png"
    } else if key.ends_with(".vtt") {
        "text/vtt"
    } else if key.ends_with(".wav") {
        "audio/wav"
    } else {
        "application/octet-stream"
    }
}

impl R2Client {
    /// Upload every file under `dir` to R2, deriving each object's key from
    /// its path relative to `dir` joined onto `key_prefix`, and its content
    /// type from `content_type_for_key`. Used to upload an HLS rung
    /// directory (playlist + segments) in one pass.
    pub async fn upload_directory(
        &self,
        dir: impl AsRef<std::path::Path>,
        key_prefix: &str,
    ) -> StorageResult<Vec<String>> {
        let dir = dir.as_ref();
        let mut uploaded = Vec::new();
        let mut stack = vec![dir.to_path_buf()];

        while let Some(current) = stack.pop() {
            let mut entries = tokio::fs::read_dir(&current).await?;
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                if path.is_dir() {
                    stack.push(path);
                    continue;
                }
                let rel = path
                    .strip_prefix(dir)
                    .expect("walked path must be under dir")
                    .to_string_lossy()
                    .replace(std::path::MAIN_SEPARATOR, "/");
                let key = format!("{}{}", key_prefix, rel);
                let content_type = content_type_for_key(&key);
                self.upload_file(&path, &key, content_type).await?;
                uploaded.push(key);
            }
        }

        Ok(uploaded)
    }

    /// Delete all objects under a prefix, paginating through
    /// `list_objects` and batching `delete_objects` calls. Used for video
    /// deletion cascade (`hls/{v}/`, `thumbs/{v}/`, `captions/{v}/`).
    pub async fn delete_prefix(&self, prefix: &str) -> StorageResult<u32> {
        let objects = self.list_objects(prefix).await?;
        if objects.is_empty() {
            return Ok(0);
        }
        let keys: Vec<_> = objects.into_iter().map(|o| o.key).collect();
        self.delete_objects(&keys).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_keys_match_layout() {
        assert_eq!(Keys::raw("u1", "v1", "mp4"), "raw/u1/v1.mp4");
        assert_eq!(
            Keys::hls_playlist("v1", Rung::P720),
            "hls/v1/720p/index.m3u8"
        );
        assert_eq!(Keys::poster("v1"), "thumbs/v1/poster.jpg");
        assert_eq!(Keys::caption("v1", "en"), "captions/v1/en.vtt");
    }

    #[test]
    fn content_type_mapping_matches_suffix() {
        assert_eq!(
            content_type_for_key("hls/v1/720p/index.m3u8"),
            "application/vnd.apple.mpegurl"
        );
        assert_eq!(content_type_for_key("hls/v1/720p/seg_000.ts"), "video/MP2T");
        assert_eq!(content_type_for_key("thumbs/v1/poster.jpg"), "image/jpeg");
        assert_eq!(
            content_type_for_key("raw/u1/v1.bin"),
            "application/octet-stream"
        );
    }
}
