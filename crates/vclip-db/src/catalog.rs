//! Catalog persistence: the Content Enricher's write path.
//!
//! For each video, the contract is: upsert the summary row; for each of
//! topics/entities/tags, upsert the canonical catalog row (by
//! `canonical_name`), upsert the per-video join row with its weight, and
//! delete any join rows for that video/kind no longer present in the new
//! set. Catalog row creation races are resolved by re-reading on a unique
//! violation rather than failing the enrichment.

use sqlx::{PgPool, Postgres, Transaction};
use vclip_models::catalog::{canonicalize, clamp_weight};
use vclip_models::ids::{EntityId, TagId, TopicId, VideoId};

use crate::error::DbResult;

pub struct TopicInput {
    pub name: String,
    pub weight: f64,
}

pub struct EntityInput {
    pub name: String,
    pub weight: f64,
    pub entity_type: Option<String>,
}

pub struct TagInput {
    pub name: String,
    pub weight: f64,
}

/// A catalog item's weighted relation to one video, as read back for the
/// Seed Builder's per-video aggregation.
#[derive(Debug, Clone)]
pub struct WeightedCatalogItem {
    pub id: uuid::Uuid,
    pub canonical_name: String,
    pub weight: f64,
}

/// The three weighted catalog collections attached to one video.
#[derive(Debug, Clone, Default)]
pub struct VideoCatalog {
    pub topics: Vec<WeightedCatalogItem>,
    pub entities: Vec<WeightedCatalogItem>,
    pub tags: Vec<WeightedCatalogItem>,
}

#[derive(Clone, Debug)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn persist_enrichment(
        &self,
        video_id: VideoId,
        short_summary: &str,
        topics: &[TopicInput],
        entities: &[EntityInput],
        tags: &[TagInput],
    ) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            insert into video_summaries (video_id, short_summary)
            values ($1, $2)
            on conflict (video_id) do update set short_summary = excluded.short_summary
            "#,
        )
        .bind(video_id.as_uuid())
        .bind(short_summary)
        .execute(&mut *tx)
        .await?;

        let mut kept_topics = Vec::with_capacity(topics.len());
        for t in topics {
            let id = get_or_create_topic(&mut tx, &t.name).await?;
            let weight = clamp_weight(t.weight);
            sqlx::query(
                r#"
                insert into video_topics (video_id, topic_id, weight)
                values ($1, $2, $3)
                on conflict (video_id, topic_id) do update set weight = excluded.weight
                "#,
            )
            .bind(video_id.as_uuid())
            .bind(id.as_uuid())
            .bind(weight)
            .execute(&mut *tx)
            .await?;
            kept_topics.push(id.as_uuid());
        }
        sqlx::query("delete from video_topics where video_id = $1 and not (topic_id = any($2))")
            .bind(video_id.as_uuid())
            .bind(&kept_topics)
            .execute(&mut *tx)
            .await?;

        let mut kept_entities = Vec::with_capacity(entities.len());
        for e in entities {
            let id = get_or_create_entity(&mut tx, &e.name).await?;
            let weight = clamp_weight(e.weight);
            sqlx::query(
                r#"
                insert into video_entities (video_id, entity_id, weight, entity_type)
                values ($1, $2, $3, $4)
                on conflict (video_id, entity_id) do update set
                    weight = excluded.weight, entity_type = excluded.entity_type
                "#,
            )
            .bind(video_id.as_uuid())
            .bind(id.as_uuid())
            .bind(weight)
            .bind(&e.entity_type)
            .execute(&mut *tx)
            .await?;
            kept_entities.push(id.as_uuid());
        }
        sqlx::query("delete from video_entities where video_id = $1 and not (entity_id = any($2))")
            .bind(video_id.as_uuid())
            .bind(&kept_entities)
            .execute(&mut *tx)
            .await?;

        let mut kept_tags = Vec::with_capacity(tags.len());
        for t in tags {
            let id = get_or_create_tag(&mut tx, &t.name).await?;
            let weight = clamp_weight(t.weight);
            sqlx::query(
                r#"
                insert into video_tags (video_id, tag_id, weight)
                values ($1, $2, $3)
                on conflict (video_id, tag_id) do update set weight = excluded.weight
                "#,
            )
            .bind(video_id.as_uuid())
            .bind(id.as_uuid())
            .bind(weight)
            .execute(&mut *tx)
            .await?;
            kept_tags.push(id.as_uuid());
        }
        sqlx::query("delete from video_tags where video_id = $1 and not (tag_id = any($2))")
            .bind(video_id.as_uuid())
            .bind(&kept_tags)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Fetch a video's weighted topics/entities/tags, used by the Seed
    /// Builder to aggregate per-catalog-item scores across history.
    pub async fn weighted_catalog_for_video(&self, video_id: VideoId) -> DbResult<VideoCatalog> {
        let topics: Vec<(uuid::Uuid, String, f64)> = sqlx::query_as(
            r#"
            select t.id, t.canonical_name, vt.weight
            from video_topics vt join topics t on t.id = vt.topic_id
            where vt.video_id = $1
            "#,
        )
        .bind(video_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        let entities: Vec<(uuid::Uuid, String, f64)> = sqlx::query_as(
            r#"
            select e.id, e.canonical_name, ve.weight
            from video_entities ve join entities e on e.id = ve.entity_id
            where ve.video_id = $1
            "#,
        )
        .bind(video_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        let tags: Vec<(uuid::Uuid, String, f64)> = sqlx::query_as(
            r#"
            select g.id, g.canonical_name, vg.weight
            from video_tags vg join tags g on g.id = vg.tag_id
            where vg.video_id = $1
            "#,
        )
        .bind(video_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        let into = |rows: Vec<(uuid::Uuid, String, f64)>| {
            rows.into_iter()
                .map(|(id, canonical_name, weight)| WeightedCatalogItem { id, canonical_name, weight })
                .collect()
        };
        Ok(VideoCatalog {
            topics: into(topics),
            entities: into(entities),
            tags: into(tags),
        })
    }
}

async fn get_or_create_topic(tx: &mut Transaction<'_, Postgres>, name: &str) -> DbResult<TopicId> {
    let canonical = canonicalize(name);
    let existing: Option<(uuid::Uuid,)> =
        sqlx::query_as("select id from topics where canonical_name = $1")
            .bind(&canonical)
            .fetch_optional(&mut **tx)
            .await?;
    if let Some((id,)) = existing {
        return Ok(TopicId::from(id));
    }
    let row: (uuid::Uuid,) = sqlx::query_as(
        r#"
        insert into topics (id, name, canonical_name)
        values (gen_random_uuid(), $1, $2)
        on conflict (canonical_name) do update set canonical_name = excluded.canonical_name
        returning id
        "#,
    )
    .bind(name)
    .bind(&canonical)
    .fetch_one(&mut **tx)
    .await?;
    Ok(TopicId::from(row.0))
}

async fn get_or_create_entity(
    tx: &mut Transaction<'_, Postgres>,
    name: &str,
) -> DbResult<EntityId> {
    let canonical = canonicalize(name);
    let existing: Option<(uuid::Uuid,)> =
        sqlx::query_as("select id from entities where canonical_name = $1")
            .bind(&canonical)
            .fetch_optional(&mut **tx)
            .await?;
    if let Some((id,)) = existing {
        return Ok(EntityId::from(id));
    }
    let row: (uuid::Uuid,) = sqlx::query_as(
        r#"
        insert into entities (id, name, canonical_name)
        values (gen_random_uuid(), $1, $2)
        on conflict (canonical_name) do update set canonical_name = excluded.canonical_name
        returning id
        "#,
    )
    .bind(name)
    .bind(&canonical)
    .fetch_one(&mut **tx)
    .await?;
    Ok(EntityId::from(row.0))
}

async fn get_or_create_tag(tx: &mut Transaction<'_, Postgres>, name: &str) -> DbResult<TagId> {
    let canonical = canonicalize(name);
    let existing: Option<(uuid::Uuid,)> =
        sqlx::query_as("select id from tags where canonical_name = $1")
            .bind(&canonical)
            .fetch_optional(&mut **tx)
            .await?;
    if let Some((id,)) = existing {
        return Ok(TagId::from(id));
    }
    let row: (uuid::Uuid,) = sqlx::query_as(
        r#"
        insert into tags (id, name, canonical_name)
        values (gen_random_uuid(), $1, $2)
        on conflict (canonical_name) do update set canonical_name = excluded.canonical_name
        returning id
        "#,
    )
    .bind(name)
    .bind(&canonical)
    .fetch_one(&mut **tx)
    .await?;
    Ok(TagId::from(row.0))
}
