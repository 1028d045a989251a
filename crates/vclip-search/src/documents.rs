//! Document shapes and write paths for the `videos` and
//! `transcript_chunks` indexes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::SearchClient;
use crate::error::SearchResult;
use crate::mappings::{TRANSCRIPT_CHUNKS_INDEX, VIDEOS_INDEX};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NestedCatalogDoc {
    pub id: String,
    pub name: String,
    pub canonical_name: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoDoc {
    pub id: String,
    pub title: String,
    pub description: String,
    pub content_type: Option<String>,
    pub language: Option<String>,
    pub user_id: String,
    pub status: String,
    pub duration_seconds: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub embedding: Vec<f32>,
    pub topics: Vec<NestedCatalogDoc>,
    pub entities: Vec<NestedCatalogDoc>,
    pub tags: Vec<NestedCatalogDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptChunkDoc {
    pub video_id: String,
    pub text: String,
    pub start_seconds: f64,
    pub end_seconds: f64,
    pub lang: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Document id for a transcript chunk: `{video}_{idx}_{ms}`, where `ms` is
/// the chunk's start time rounded to milliseconds. Keeps ids stable across
/// re-indexing the same chunk boundaries while staying unique per video.
pub fn transcript_chunk_doc_id(video_id: &str, idx: usize, start_seconds: f64) -> String {
    let ms = (start_seconds * 1000.0).round() as i64;
    format!("{video_id}_{idx}_{ms}")
}

impl SearchClient {
    pub async fn index_video(&self, doc: &VideoDoc) -> SearchResult<()> {
        let path = format!("/{VIDEOS_INDEX}/_doc/{}", doc.id);
        self.put(&path, &serde_json::to_value(doc)?).await?;
        Ok(())
    }

    pub async fn delete_video_doc(&self, video_id: &str) -> SearchResult<()> {
        let path = format!("/{VIDEOS_INDEX}/_doc/{video_id}");
        self.delete(&path).await?;
        Ok(())
    }

    /// Index a video's transcript chunks, replacing any previously-indexed
    /// chunks for that video (recovery path re-parses and re-indexes from
    /// scratch, so stale chunk ids from a shorter prior transcript must not
    /// linger).
    pub async fn index_transcript_chunks(
        &self,
        video_id: &str,
        chunks: &[TranscriptChunkDoc],
    ) -> SearchResult<()> {
        self.delete_transcript_chunks_for_video(video_id).await?;
        for (idx, chunk) in chunks.iter().enumerate() {
            let id = transcript_chunk_doc_id(video_id, idx, chunk.start_seconds);
            let path = format!("/{TRANSCRIPT_CHUNKS_INDEX}/_doc/{id}");
            self.put(&path, &serde_json::to_value(chunk)?).await?;
        }
        Ok(())
    }

    pub async fn delete_transcript_chunks_for_video(&self, video_id: &str) -> SearchResult<()> {
        let path = format!("/{TRANSCRIPT_CHUNKS_INDEX}/_delete_by_query");
        let body = serde_json::json!({
            "query": { "term": { "video_id": video_id } }
        });
        self.post(&path, &body).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_doc_id_embeds_video_index_and_millis() {
        assert_eq!(transcript_chunk_doc_id("v1", 2, 3.5), "v1_2_3500");
    }
}
