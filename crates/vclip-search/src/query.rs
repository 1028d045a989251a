//! BM25 query assembly for the Recall & Rerank Engine's OS-lane, and the
//! candidate-search round trip against the `videos` index.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::client::SearchClient;
use crate::documents::NestedCatalogDoc;
use crate::error::SearchResult;
use crate::mappings::VIDEOS_INDEX;

/// Concatenate display names in `tags ∪ entities ∪ topics` order
/// (addition order within each collection preserved), de-duplicated
/// case-insensitively, joined with single spaces.
pub fn build_query_text(tags: &[String], entities: &[String], topics: &[String]) -> String {
    let mut seen = std::collections::HashSet::new();
    let mut parts = Vec::new();
    for name in tags.iter().chain(entities.iter()).chain(topics.iter()) {
        let key = name.trim().to_lowercase();
        if key.is_empty() || !seen.insert(key) {
            continue;
        }
        parts.push(name.as_str());
    }
    parts.join(" ")
}

/// Build the OS-lane candidate-search request body, per the spec's
/// `bool` query with `must_not.ids`, `filter.status`, four `should`
/// clauses, and `minimum_should_match = 1`.
pub fn build_candidate_query(query_text: &str, history_ids: &[String], size: usize) -> Value {
    json!({
        "query": {
            "bool": {
                "must_not": { "ids": { "values": history_ids } },
                "filter": { "term": { "status": "ready" } },
                "should": [
                    {
                        "multi_match": {
                            "query": query_text,
                            "fields": ["title^3", "description^2"]
                        }
                    },
                    {
                        "nested": {
                            "path": "tags",
                            "query": {
                                "match": { "tags.name": { "query": query_text, "boost": 2 } }
                            }
                        }
                    },
                    {
                        "nested": {
                            "path": "entities",
                            "query": {
                                "match": { "entities.name": { "query": query_text, "boost": 2 } }
                            }
                        }
                    },
                    {
                        "nested": {
                            "path": "topics",
                            "query": {
                                "match": { "topics.name": { "query": query_text, "boost": 1 } }
                            }
                        }
                    }
                ],
                "minimum_should_match": 1
            }
        },
        "size": size
    })
}

#[derive(Debug, Clone)]
pub struct CandidateHit {
    pub video_id: String,
    pub bm25_score: f64,
    pub embedding: Vec<f32>,
    pub topics: Vec<NestedCatalogDoc>,
    pub entities: Vec<NestedCatalogDoc>,
    pub tags: Vec<NestedCatalogDoc>,
}

#[derive(Deserialize)]
struct SearchResponse {
    hits: SearchHits,
}

#[derive(Deserialize)]
struct SearchHits {
    hits: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_score")]
    score: Option<f64>,
    #[serde(rename = "_source")]
    source: HitSource,
}

#[derive(Deserialize, Default)]
struct HitSource {
    #[serde(default)]
    embedding: Vec<f32>,
    #[serde(default)]
    topics: Vec<NestedCatalogDoc>,
    #[serde(default)]
    entities: Vec<NestedCatalogDoc>,
    #[serde(default)]
    tags: Vec<NestedCatalogDoc>,
}

impl SearchClient {
    /// Default OS-lane recall pool size, per the spec's fixed `size = 500`;
    /// overridable via `OS_BM25_RECALL_K`.
    pub const CANDIDATE_SEARCH_SIZE: usize = 500;

    fn candidate_search_size() -> usize {
        std::env::var("OS_BM25_RECALL_K")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(Self::CANDIDATE_SEARCH_SIZE)
    }

    pub async fn candidate_search(
        &self,
        query_text: &str,
        history_ids: &[String],
    ) -> SearchResult<Vec<CandidateHit>> {
        let body = build_candidate_query(query_text, history_ids, Self::candidate_search_size());
        let path = format!("/{VIDEOS_INDEX}/_search");
        let raw = self.post(&path, &body).await?;
        let parsed: SearchResponse = serde_json::from_value(raw)?;
        Ok(parsed
            .hits
            .hits
            .into_iter()
            .map(|h| CandidateHit {
                video_id: h.id,
                bm25_score: h.score.unwrap_or(0.0),
                embedding: h.source.embedding,
                topics: h.source.topics,
                entities: h.source.entities,
                tags: h.source.tags,
            })
            .collect())
    }

    /// Hydrate a fixed set of video ids (graph-lane candidates) for their
    /// embeddings and nested fields. Ids not found in the index are
    /// silently dropped — they cannot be recommended without a document.
    pub async fn hydrate_videos(&self, video_ids: &[String]) -> SearchResult<Vec<CandidateHit>> {
        if video_ids.is_empty() {
            return Ok(Vec::new());
        }
        let body = json!({
            "query": { "ids": { "values": video_ids } },
            "size": video_ids.len()
        });
        let path = format!("/{VIDEOS_INDEX}/_search");
        let raw = self.post(&path, &body).await?;
        let parsed: SearchResponse = serde_json::from_value(raw)?;
        Ok(parsed
            .hits
            .hits
            .into_iter()
            .map(|h| CandidateHit {
                video_id: h.id,
                bm25_score: h.score.unwrap_or(0.0),
                embedding: h.source.embedding,
                topics: h.source.topics,
                entities: h.source.entities,
                tags: h.source.tags,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_text_matches_scenario() {
        let text = build_query_text(
            &["react".into(), "python".into()],
            &["OpenAI".into()],
            &["web development".into()],
        );
        assert_eq!(text, "react python OpenAI web development");
    }

    #[test]
    fn query_text_dedupes_case_insensitively() {
        let text = build_query_text(&["Rust".into(), "rust".into()], &[], &[]);
        assert_eq!(text, "Rust");
    }

    #[test]
    fn candidate_query_matches_scenario_shape() {
        let body = build_candidate_query(
            "react python OpenAI web development",
            &["h1".to_string(), "h2".to_string()],
            500,
        );
        assert_eq!(body["size"], 500);
        let b = &body["query"]["bool"];
        assert_eq!(b["must_not"]["ids"]["values"], json!(["h1", "h2"]));
        assert_eq!(b["filter"]["term"]["status"], "ready");
        assert_eq!(b["should"].as_array().unwrap().len(), 4);
        assert_eq!(b["minimum_should_match"], 1);
    }
}
