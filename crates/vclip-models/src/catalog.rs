//! Catalog entities (Topic/Entity/Tag) and their per-video join rows.
//!
//! Canonical names are the uniqueness key: lowercase, whitespace-trimmed.
//! Weights (prominence/importance/weight) are always clamped to `[0, 1]`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ids::{EntityId, TagId, TopicId, VideoId};

/// Normalize a raw name into its canonical form.
pub fn canonicalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Clamp a weight into `[0, 1]`, treating NaN as 0.
pub fn clamp_weight(w: f64) -> f64 {
    if w.is_nan() {
        0.0
    } else {
        w.clamp(0.0, 1.0)
    }
}

macro_rules! catalog_entity {
    ($name:ident, $id:ty) => {
        #[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
        pub struct $name {
            pub id: $id,
            pub name: String,
            pub canonical_name: String,
        }

        impl $name {
            pub fn new(name: impl Into<String>) -> Self {
                let name = name.into();
                let canonical_name = canonicalize(&name);
                Self {
                    id: <$id>::new(),
                    name,
                    canonical_name,
                }
            }
        }
    };
}

catalog_entity!(Topic, TopicId);
catalog_entity!(Entity, EntityId);
catalog_entity!(Tag, TagId);

/// Video's weighted relation to a Topic (`prominence`).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VideoTopic {
    pub video_id: VideoId,
    pub topic_id: TopicId,
    pub weight: f64,
}

/// Video's weighted relation to an Entity (`importance`). `entity_type` is
/// an optional classifier the LLM may or may not emit; the persistence
/// contract does not require it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VideoEntity {
    pub video_id: VideoId,
    pub entity_id: EntityId,
    pub weight: f64,
    pub entity_type: Option<String>,
}

/// Video's weighted relation to a Tag (`weight`).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VideoTag {
    pub video_id: VideoId,
    pub tag_id: TagId,
    pub weight: f64,
}

/// One-row-per-video short summary produced by the Content Enricher.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VideoSummary {
    pub video_id: VideoId,
    pub short_summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalize_lowercases_and_trims() {
        assert_eq!(canonicalize("  Rust Programming  "), "rust programming");
    }

    #[test]
    fn clamp_weight_bounds_to_unit_interval() {
        assert_eq!(clamp_weight(-0.5), 0.0);
        assert_eq!(clamp_weight(1.5), 1.0);
        assert_eq!(clamp_weight(0.42), 0.42);
        assert_eq!(clamp_weight(f64::NAN), 0.0);
    }
}
