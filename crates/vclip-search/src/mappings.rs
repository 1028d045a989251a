//! Index mappings for `videos` and `transcript_chunks`, per the external
//! interfaces' search-index schema.

use serde_json::{json, Value};

use crate::client::SearchClient;
use crate::error::SearchResult;

pub const VIDEOS_INDEX: &str = "videos";
pub const TRANSCRIPT_CHUNKS_INDEX: &str = "transcript_chunks";

fn nested_catalog_mapping() -> Value {
    json!({
        "type": "nested",
        "properties": {
            "id": { "type": "keyword" },
            "name": {
                "type": "text",
                "fields": { "keyword": { "type": "keyword" } }
            },
            "canonical_name": { "type": "keyword" },
            "weight": { "type": "float" }
        }
    })
}

fn videos_mapping() -> Value {
    json!({
        "mappings": {
            "properties": {
                "title": { "type": "text" },
                "description": { "type": "text" },
                "content_type": { "type": "keyword" },
                "language": { "type": "keyword" },
                "user_id": { "type": "keyword" },
                "status": { "type": "keyword" },
                "duration_seconds": { "type": "float" },
                "created_at": { "type": "date" },
                "updated_at": { "type": "date" },
                "embedding": { "type": "float", "index": false },
                "topics": nested_catalog_mapping(),
                "entities": nested_catalog_mapping(),
                "tags": nested_catalog_mapping()
            }
        }
    })
}

fn transcript_chunks_mapping() -> Value {
    json!({
        "mappings": {
            "properties": {
                "video_id": { "type": "keyword" },
                "text": { "type": "text" },
                "start_seconds": { "type": "float" },
                "end_seconds": { "type": "float" },
                "lang": { "type": "keyword" },
                "created_at": { "type": "date" }
            }
        }
    })
}

impl SearchClient {
    /// Create both indexes if absent. Safe to call on every process start.
    pub async fn ensure_indexes(&self) -> SearchResult<()> {
        self.put(&format!("/{VIDEOS_INDEX}"), &videos_mapping()).await?;
        self.put(
            &format!("/{TRANSCRIPT_CHUNKS_INDEX}"),
            &transcript_chunks_mapping(),
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn videos_mapping_declares_non_indexed_embedding() {
        let m = videos_mapping();
        assert_eq!(m["mappings"]["properties"]["embedding"]["index"], false);
        assert_eq!(m["mappings"]["properties"]["topics"]["type"], "nested");
    }
}
