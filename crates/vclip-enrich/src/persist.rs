//! Orchestrates the Content Enricher's full side-effect chain: LLM call,
//! tolerant decode, normalize, transactional relational upsert, best-effort
//! graph mirror, best-effort vector index write.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;
use vclip_db::{CatalogRepository, EntityInput, TagInput, TopicInput};
use vclip_graph::{GraphClient, InsertThresholds, MirrorItem};
use vclip_search::{NestedCatalogDoc, SearchClient, VideoDoc};

use crate::error::EnrichResult;
use crate::llm::{Embedder, GeminiClient};
use crate::normalize::{normalize, NormalizedEnrichment};
use crate::prompt::{build_embedding_text, build_prompt};
use crate::schema::decode_tolerant;

/// Non-catalog video fields the enricher needs to assemble a full
/// searchable document; owned by the Relational Store's `Video` entity,
/// supplied by the caller (the Job Worker) rather than re-read here.
pub struct VideoIndexContext {
    pub video_id: String,
    pub user_id: String,
    pub status: String,
    pub duration_seconds: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outcome the caller folds back into `videos.content_type`/`videos.language`.
pub struct EnrichOutcome {
    pub content_type: Option<String>,
    pub language: Option<String>,
}

/// Index insert thresholds, overridable via `OPENSEARCH_TOPIC_INSERT_TH` /
/// `OPENSEARCH_ENTITY_INSERT_TH` / `OPENSEARCH_TAG_INSERT_TH`. The spec
/// defaults these to 0.75, stricter than the graph mirror's 0.50, per
/// Open Question #2 (SPEC_FULL §9).
#[derive(Debug, Clone, Copy)]
pub struct IndexThresholds {
    pub topic: f64,
    pub entity: f64,
    pub tag: f64,
}

impl Default for IndexThresholds {
    fn default() -> Self {
        Self { topic: 0.75, entity: 0.75, tag: 0.75 }
    }
}

impl IndexThresholds {
    pub fn from_env() -> Self {
        let env_or = |key: &str, default: f64| {
            std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
        };
        Self {
            topic: env_or("OPENSEARCH_TOPIC_INSERT_TH", 0.75),
            entity: env_or("OPENSEARCH_ENTITY_INSERT_TH", 0.75),
            tag: env_or("OPENSEARCH_TAG_INSERT_TH", 0.75),
        }
    }
}

pub struct ContentEnricher {
    embedder: Arc<dyn Embedder>,
    llm: GeminiClient,
    catalog: CatalogRepository,
    graph: Option<GraphClient>,
    search: Option<SearchClient>,
    graph_thresholds: InsertThresholds,
    index_thresholds: IndexThresholds,
}

impl ContentEnricher {
    pub fn new(
        llm: GeminiClient,
        catalog: CatalogRepository,
        graph: Option<GraphClient>,
        search: Option<SearchClient>,
    ) -> Self {
        Self {
            embedder: Arc::new(llm.clone()),
            llm,
            catalog,
            graph,
            search,
            graph_thresholds: InsertThresholds::from_env(),
            index_thresholds: IndexThresholds::from_env(),
        }
    }

    /// Run the full enrichment pass for one video. The relational upsert
    /// is the only part whose failure is propagated; graph and index
    /// writes are logged and swallowed, per the error taxonomy's
    /// best-effort class.
    pub async fn enrich(
        &self,
        title: &str,
        description: &str,
        transcript_chunks: &[String],
        index_ctx: VideoIndexContext,
    ) -> EnrichResult<EnrichOutcome> {
        let prompt = build_prompt(title, description, transcript_chunks);
        let raw_text = self.llm.generate_json(&prompt).await?;
        let raw = decode_tolerant(&raw_text)
            .map_err(crate::error::EnrichError::Decode)?;
        let normalized = normalize(raw);

        self.persist_catalog(&index_ctx.video_id, &normalized).await?;

        if let Some(graph) = &self.graph {
            if let Err(err) = self.mirror_graph(graph, &index_ctx.video_id, &normalized).await {
                warn!(video_id = %index_ctx.video_id, error = %err, "graph mirror failed, continuing");
            }
        }

        if let Some(search) = &self.search {
            if let Err(err) = self
                .write_search_index(search, title, description, &normalized, index_ctx)
                .await
            {
                warn!(error = %err, "search index write failed, continuing");
            }
        }

        Ok(EnrichOutcome {
            content_type: normalized.content_type,
            language: normalized.language,
        })
    }

    async fn persist_catalog(
        &self,
        video_id: &str,
        normalized: &NormalizedEnrichment,
    ) -> EnrichResult<()> {
        let video_id = video_id
            .parse()
            .map_err(|_| crate::error::EnrichError::Decode("invalid video id".to_string()))?;
        let topics: Vec<TopicInput> = normalized
            .topics
            .iter()
            .map(|t| TopicInput { name: t.name.clone(), weight: t.weight })
            .collect();
        let entities: Vec<EntityInput> = normalized
            .entities
            .iter()
            .map(|e| EntityInput {
                name: e.name.clone(),
                weight: e.weight,
                entity_type: e.entity_type.clone(),
            })
            .collect();
        let tags: Vec<TagInput> = normalized
            .tags
            .iter()
            .map(|t| TagInput { name: t.name.clone(), weight: t.weight })
            .collect();

        self.catalog
            .persist_enrichment(video_id, &normalized.short_summary, &topics, &entities, &tags)
            .await?;
        Ok(())
    }

    async fn mirror_graph(
        &self,
        graph: &GraphClient,
        video_id: &str,
        normalized: &NormalizedEnrichment,
    ) -> vclip_graph::GraphResult<()> {
        let catalog = self
            .catalog
            .weighted_catalog_for_video(
                video_id
                    .parse()
                    .map_err(|_| vclip_graph::GraphError::config("invalid video id"))?,
            )
            .await
            .map_err(|e| vclip_graph::GraphError::config(e.to_string()))?;

        let to_mirror = |items: &[vclip_db::WeightedCatalogItem]| -> Vec<MirrorItem> {
            items
                .iter()
                .map(|i| MirrorItem {
                    id: i.id.to_string(),
                    canonical_name: i.canonical_name.clone(),
                    weight: i.weight,
                })
                .collect()
        };

        graph
            .mirror_enrichment(
                video_id,
                &to_mirror(&catalog.topics),
                &to_mirror(&catalog.entities),
                &to_mirror(&catalog.tags),
                self.graph_thresholds,
            )
            .await
    }

    async fn write_search_index(
        &self,
        search: &SearchClient,
        title: &str,
        description: &str,
        normalized: &NormalizedEnrichment,
        ctx: VideoIndexContext,
    ) -> vclip_search::SearchResult<()> {
        let topics: Vec<_> = normalized
            .topics
            .iter()
            .filter(|t| t.weight >= self.index_thresholds.topic)
            .collect();
        let entities: Vec<_> = normalized
            .entities
            .iter()
            .filter(|e| e.weight >= self.index_thresholds.entity)
            .collect();
        let tags: Vec<_> = normalized
            .tags
            .iter()
            .filter(|t| t.weight >= self.index_thresholds.tag)
            .collect();

        let topic_names: Vec<String> = topics.iter().map(|t| t.name.clone()).collect();
        let entity_names: Vec<String> = entities.iter().map(|e| e.name.clone()).collect();
        let tag_names: Vec<String> = tags.iter().map(|t| t.name.clone()).collect();

        let embedding_text = build_embedding_text(
            title,
            description,
            &normalized.short_summary,
            &topic_names,
            &entity_names,
            &tag_names,
            normalized.content_type.as_deref(),
            normalized.language.as_deref(),
        );
        let embedding = self
            .embedder
            .embed(&embedding_text)
            .await
            .unwrap_or_default();

        let doc = VideoDoc {
            id: ctx.video_id,
            title: title.to_string(),
            description: description.to_string(),
            content_type: normalized.content_type.clone(),
            language: normalized.language.clone(),
            user_id: ctx.user_id,
            status: ctx.status,
            duration_seconds: ctx.duration_seconds,
            created_at: ctx.created_at,
            updated_at: ctx.updated_at,
            embedding,
            topics: topics
                .iter()
                .map(|t| NestedCatalogDoc {
                    id: t.canonical_name.clone(),
                    name: t.name.clone(),
                    canonical_name: t.canonical_name.clone(),
                    weight: t.weight,
                })
                .collect(),
            entities: entities
                .iter()
                .map(|e| NestedCatalogDoc {
                    id: e.canonical_name.clone(),
                    name: e.name.clone(),
                    canonical_name: e.canonical_name.clone(),
                    weight: e.weight,
                })
                .collect(),
            tags: tags
                .iter()
                .map(|t| NestedCatalogDoc {
                    id: t.canonical_name.clone(),
                    name: t.name.clone(),
                    canonical_name: t.canonical_name.clone(),
                    weight: t.weight,
                })
                .collect(),
        };

        search.index_video(&doc).await
    }
}
