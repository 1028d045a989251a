//! Durable mirror writes: MERGE nodes/edges for an enrichment result, and
//! the video-delete cascade's graph purge.

use serde_json::json;

use crate::client::{GraphClient, Statement};
use crate::error::GraphResult;

/// One catalog item's weighted relation to a video, as handed in by the
/// Content Enricher after relational persistence.
#[derive(Debug, Clone)]
pub struct MirrorItem {
    pub id: String,
    pub canonical_name: String,
    pub weight: f64,
}

/// Default insert thresholds, overridable via
/// `NEO4J_TOPIC_INSERT_TH` / `NEO4J_ENTITY_INSERT_TH` / `NEO4J_TAG_INSERT_TH`.
#[derive(Debug, Clone, Copy)]
pub struct InsertThresholds {
    pub topic: f64,
    pub entity: f64,
    pub tag: f64,
}

impl Default for InsertThresholds {
    fn default() -> Self {
        Self { topic: 0.50, entity: 0.50, tag: 0.50 }
    }
}

impl InsertThresholds {
    pub fn from_env() -> Self {
        let env_or = |key: &str, default: f64| {
            std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
        };
        Self {
            topic: env_or("NEO4J_TOPIC_INSERT_TH", 0.50),
            entity: env_or("NEO4J_ENTITY_INSERT_TH", 0.50),
            tag: env_or("NEO4J_TAG_INSERT_TH", 0.50),
        }
    }
}

fn ensure_constraint(label: &str) -> Statement {
    Statement::new(
        format!("CREATE CONSTRAINT IF NOT EXISTS FOR (n:{label}) REQUIRE n.id IS UNIQUE"),
        json!({}),
    )
}

fn merge_node(label: &str, id: &str, canonical_name: &str) -> Statement {
    Statement::new(
        format!(
            "MERGE (n:{label} {{id: $id}}) ON CREATE SET n.canonical_name = $canonical_name"
        ),
        json!({ "id": id, "canonical_name": canonical_name }),
    )
}

fn merge_edge(
    from_label: &str,
    from_id: &str,
    rel_type: &str,
    weight_prop: &str,
    weight: f64,
    to_label: &str,
    to_id: &str,
) -> Statement {
    Statement::new(
        format!(
            "MATCH (a:{from_label} {{id: $from_id}}), (b:{to_label} {{id: $to_id}}) \
             MERGE (a)-[r:{rel_type}]->(b) SET r.{weight_prop} = $weight"
        ),
        json!({ "from_id": from_id, "to_id": to_id, "weight": weight }),
    )
}

impl GraphClient {
    pub async fn ensure_constraints(&self) -> GraphResult<()> {
        self.run(vec![
            ensure_constraint("Video"),
            ensure_constraint("Topic"),
            ensure_constraint("Entity"),
            ensure_constraint("Tag"),
        ])
        .await?;
        Ok(())
    }

    /// Mirror one video's enrichment result, inserting nodes/edges only
    /// for items at or above the configured threshold. Pre-existing
    /// `canonical_name` is preserved via `ON CREATE SET` on the node merge.
    pub async fn mirror_enrichment(
        &self,
        video_id: &str,
        topics: &[MirrorItem],
        entities: &[MirrorItem],
        tags: &[MirrorItem],
        thresholds: InsertThresholds,
    ) -> GraphResult<()> {
        let mut statements = vec![merge_node("Video", video_id, video_id)];

        for t in topics.iter().filter(|t| t.weight >= thresholds.topic) {
            statements.push(merge_node("Topic", &t.id, &t.canonical_name));
            statements.push(merge_edge(
                "Video", video_id, "HAS_TOPIC", "prominence", t.weight, "Topic", &t.id,
            ));
        }
        for e in entities.iter().filter(|e| e.weight >= thresholds.entity) {
            statements.push(merge_node("Entity", &e.id, &e.canonical_name));
            statements.push(merge_edge(
                "Video", video_id, "HAS_ENTITY", "importance", e.weight, "Entity", &e.id,
            ));
        }
        for g in tags.iter().filter(|g| g.weight >= thresholds.tag) {
            statements.push(merge_node("Tag", &g.id, &g.canonical_name));
            statements.push(merge_edge(
                "Video", video_id, "HAS_TAG", "weight", g.weight, "Tag", &g.id,
            ));
        }

        self.run(statements).await?;
        Ok(())
    }

    /// Purge a video's node and its edges, part of the delete cascade.
    pub async fn delete_video(&self, video_id: &str) -> GraphResult<()> {
        self.run(vec![Statement::new(
            "MATCH (v:Video {id: $id}) DETACH DELETE v",
            json!({ "id": video_id }),
        )])
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_thresholds_match_open_question_decision() {
        let th = InsertThresholds::default();
        assert_eq!(th.topic, 0.50);
        assert_eq!(th.entity, 0.50);
        assert_eq!(th.tag, 0.50);
    }
}
