//! Full-text search: two parallel sub-queries against the `videos` and
//! `transcript_chunks` indexes.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::client::SearchClient;
use crate::error::SearchResult;
use crate::mappings::{TRANSCRIPT_CHUNKS_INDEX, VIDEOS_INDEX};

/// `minimum_should_match` for the transcript fuzzy fallback, scaled by
/// token count: 3 words -> 100%, 4 -> 75%, 5+ -> 60%.
pub fn transcript_minimum_should_match(token_count: usize) -> &'static str {
    match token_count {
        0..=3 => "100%",
        4 => "75%",
        _ => "60%",
    }
}

pub fn build_metadata_query(q: &str, size: usize) -> Value {
    json!({
        "query": {
            "bool": {
                "filter": { "term": { "status": "ready" } },
                "should": [
                    { "multi_match": { "query": q, "fields": ["title^3", "description^2"] } },
                    {
                        "nested": {
                            "path": "tags",
                            "query": { "match": { "tags.name": q } }
                        }
                    },
                    {
                        "nested": {
                            "path": "entities",
                            "query": { "match": { "entities.name": q } }
                        }
                    },
                    {
                        "nested": {
                            "path": "topics",
                            "query": { "match": { "topics.name": q } }
                        }
                    }
                ],
                "minimum_should_match": 1
            }
        },
        "highlight": {
            "fields": { "title": {}, "description": {} }
        },
        "size": size
    })
}

pub fn build_transcript_phrase_query(q: &str, size: usize) -> Value {
    json!({
        "query": { "match_phrase": { "text": q } },
        "size": size
    })
}

pub fn build_transcript_fuzzy_query(q: &str, size: usize) -> Value {
    let token_count = q.split_whitespace().count();
    json!({
        "query": {
            "match": {
                "text": {
                    "query": q,
                    "fuzziness": "AUTO",
                    "minimum_should_match": transcript_minimum_should_match(token_count)
                }
            }
        },
        "size": size
    })
}

#[derive(Debug, Clone)]
pub struct MetadataHit {
    pub video_id: String,
    pub title_highlight: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TranscriptHit {
    pub video_id: String,
    pub start_seconds: f64,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct FullTextSearchResult {
    pub metadata_hits: Vec<MetadataHit>,
    pub transcript_hits: Vec<TranscriptHit>,
}

#[derive(Deserialize)]
struct RawHits {
    hits: RawHitsInner,
}

#[derive(Deserialize)]
struct RawHitsInner {
    hits: Vec<RawHit>,
}

#[derive(Deserialize)]
struct RawHit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_source")]
    source: Value,
    #[serde(default)]
    highlight: Option<Value>,
}

const DEFAULT_SEARCH_SIZE: usize = 20;

impl SearchClient {
    /// Run the metadata sub-query and the transcript sub-query (exact
    /// phrase, falling back to fuzzy on zero hits), grouping transcript
    /// hits by `video_id` and keeping the earliest `start_seconds`.
    pub async fn full_text_search(&self, q: &str) -> SearchResult<FullTextSearchResult> {
        let metadata_body = build_metadata_query(q, DEFAULT_SEARCH_SIZE);
        let metadata_raw = self
            .post(&format!("/{VIDEOS_INDEX}/_search"), &metadata_body)
            .await?;
        let metadata_hits = parse_metadata_hits(metadata_raw);

        let phrase_body = build_transcript_phrase_query(q, DEFAULT_SEARCH_SIZE);
        let phrase_raw = self
            .post(&format!("/{TRANSCRIPT_CHUNKS_INDEX}/_search"), &phrase_body)
            .await?;
        let mut transcript_hits = parse_transcript_hits(phrase_raw);

        if transcript_hits.is_empty() {
            let fuzzy_body = build_transcript_fuzzy_query(q, DEFAULT_SEARCH_SIZE);
            let fuzzy_raw = self
                .post(&format!("/{TRANSCRIPT_CHUNKS_INDEX}/_search"), &fuzzy_body)
                .await?;
            transcript_hits = parse_transcript_hits(fuzzy_raw);
        }

        Ok(FullTextSearchResult {
            metadata_hits,
            transcript_hits: group_earliest_per_video(transcript_hits),
        })
    }
}

fn parse_metadata_hits(raw: Value) -> Vec<MetadataHit> {
    let parsed: RawHits = match serde_json::from_value(raw) {
        Ok(p) => p,
        Err(_) => return Vec::new(),
    };
    parsed
        .hits
        .hits
        .into_iter()
        .map(|h| MetadataHit {
            video_id: h.id,
            title_highlight: h
                .highlight
                .as_ref()
                .and_then(|v| v.get("title"))
                .and_then(|v| v.get(0))
                .and_then(|v| v.as_str())
                .map(str::to_string),
        })
        .collect()
}

fn parse_transcript_hits(raw: Value) -> Vec<TranscriptHit> {
    let parsed: RawHits = match serde_json::from_value(raw) {
        Ok(p) => p,
        Err(_) => return Vec::new(),
    };
    parsed
        .hits
        .hits
        .into_iter()
        .filter_map(|h| {
            let video_id = h.source.get("video_id")?.as_str()?.to_string();
            let start_seconds = h.source.get("start_seconds")?.as_f64()?;
            let text = h.source.get("text")?.as_str()?.to_string();
            Some(TranscriptHit { video_id, start_seconds, text })
        })
        .collect()
}

fn group_earliest_per_video(hits: Vec<TranscriptHit>) -> Vec<TranscriptHit> {
    let mut by_video: std::collections::HashMap<String, TranscriptHit> =
        std::collections::HashMap::new();
    for hit in hits {
        by_video
            .entry(hit.video_id.clone())
            .and_modify(|existing| {
                if hit.start_seconds < existing.start_seconds {
                    *existing = hit.clone();
                }
            })
            .or_insert(hit);
    }
    let mut out: Vec<_> = by_video.into_values().collect();
    out.sort_by(|a, b| a.start_seconds.partial_cmp(&b.start_seconds).unwrap());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimum_should_match_scales_with_token_count() {
        assert_eq!(transcript_minimum_should_match(3), "100%");
        assert_eq!(transcript_minimum_should_match(4), "75%");
        assert_eq!(transcript_minimum_should_match(5), "60%");
        assert_eq!(transcript_minimum_should_match(10), "60%");
    }

    #[test]
    fn groups_transcript_hits_keeping_earliest_start() {
        let hits = vec![
            TranscriptHit { video_id: "v1".into(), start_seconds: 10.0, text: "b".into() },
            TranscriptHit { video_id: "v1".into(), start_seconds: 2.0, text: "a".into() },
            TranscriptHit { video_id: "v2".into(), start_seconds: 5.0, text: "c".into() },
        ];
        let grouped = group_earliest_per_video(hits);
        assert_eq!(grouped.len(), 2);
        let v1 = grouped.iter().find(|h| h.video_id == "v1").unwrap();
        assert_eq!(v1.start_seconds, 2.0);
    }
}
