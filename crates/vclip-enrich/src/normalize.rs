//! Normalize a decoded [`RawEnrichment`] into deduped, clamped, persistence-ready items.

use vclip_models::catalog::{canonicalize, clamp_weight};

use crate::schema::RawEnrichment;

#[derive(Debug, Clone)]
pub struct NormalizedItem {
    pub name: String,
    pub canonical_name: String,
    pub weight: f64,
}

#[derive(Debug, Clone)]
pub struct NormalizedEntity {
    pub name: String,
    pub canonical_name: String,
    pub weight: f64,
    pub entity_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NormalizedEnrichment {
    pub content_type: Option<String>,
    pub language: Option<String>,
    pub short_summary: String,
    pub topics: Vec<NormalizedItem>,
    pub entities: Vec<NormalizedEntity>,
    pub tags: Vec<NormalizedItem>,
}

fn dedupe_items(items: Vec<NormalizedItem>) -> Vec<NormalizedItem> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|i| seen.insert(i.canonical_name.clone()))
        .collect()
}

pub fn normalize(raw: RawEnrichment) -> NormalizedEnrichment {
    let topics = dedupe_items(
        raw.topics
            .into_iter()
            .filter_map(|t| {
                let name = t.name.filter(|n| !n.trim().is_empty())?;
                let canonical_name = t
                    .canonical_name
                    .filter(|c| !c.trim().is_empty())
                    .unwrap_or_else(|| canonicalize(&name));
                Some(NormalizedItem {
                    name,
                    canonical_name: canonicalize(&canonical_name),
                    weight: clamp_weight(t.prominence.unwrap_or(0.0)),
                })
            })
            .collect(),
    );

    let mut seen_entities = std::collections::HashSet::new();
    let entities: Vec<NormalizedEntity> = raw
        .entities
        .into_iter()
        .filter_map(|e| {
            let name = e.name.filter(|n| !n.trim().is_empty())?;
            let canonical_name = e
                .canonical_name
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| canonicalize(&name));
            let canonical_name = canonicalize(&canonical_name);
            if !seen_entities.insert(canonical_name.clone()) {
                return None;
            }
            Some(NormalizedEntity {
                name,
                canonical_name,
                weight: clamp_weight(e.importance.unwrap_or(0.0)),
                entity_type: e.entity_type,
            })
        })
        .collect();

    let tags = dedupe_items(
        raw.tags
            .into_iter()
            .filter_map(|t| {
                let name = t.tag.filter(|n| !n.trim().is_empty())?;
                let canonical_name = canonicalize(&name);
                Some(NormalizedItem {
                    name,
                    canonical_name,
                    weight: clamp_weight(t.weight.unwrap_or(0.0)),
                })
            })
            .collect(),
    );

    NormalizedEnrichment {
        content_type: raw.metadata.as_ref().and_then(|m| m.content_type.clone()),
        language: raw.metadata.as_ref().and_then(|m| m.language.clone()),
        short_summary: raw.short_summary.unwrap_or_default(),
        topics,
        entities,
        tags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{RawEntity, RawMetadata, RawTag, RawTopic};

    #[test]
    fn dedupes_by_canonical_name_keeping_first() {
        let raw = RawEnrichment {
            metadata: Some(RawMetadata { content_type: None, language: None }),
            short_summary: Some("s".into()),
            topics: vec![
                RawTopic { name: Some("Rust".into()), canonical_name: None, prominence: Some(0.9) },
                RawTopic { name: Some("rust".into()), canonical_name: None, prominence: Some(0.1) },
            ],
            entities: vec![],
            tags: vec![],
            content_analysis: None,
        };
        let normalized = normalize(raw);
        assert_eq!(normalized.topics.len(), 1);
        assert_eq!(normalized.topics[0].weight, 0.9);
    }

    #[test]
    fn drops_items_missing_a_name() {
        let raw = RawEnrichment {
            metadata: None,
            short_summary: None,
            topics: vec![RawTopic { name: None, canonical_name: None, prominence: Some(0.5) }],
            entities: vec![RawEntity {
                name: None,
                canonical_name: None,
                importance: Some(0.5),
                entity_type: None,
            }],
            tags: vec![RawTag { tag: None, weight: Some(0.5) }],
            content_analysis: None,
        };
        let normalized = normalize(raw);
        assert!(normalized.topics.is_empty());
        assert!(normalized.entities.is_empty());
        assert!(normalized.tags.is_empty());
    }

    #[test]
    fn clamps_out_of_range_weights() {
        let raw = RawEnrichment {
            metadata: None,
            short_summary: None,
            topics: vec![RawTopic { name: Some("t".into()), canonical_name: None, prominence: Some(5.0) }],
            entities: vec![],
            tags: vec![],
            content_analysis: None,
        };
        let normalized = normalize(raw);
        assert_eq!(normalized.topics[0].weight, 1.0);
    }
}
