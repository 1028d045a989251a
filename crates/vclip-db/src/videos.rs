//! Video rows and the status transitions the Job Worker orchestrator drives.

use chrono::Utc;
use sqlx::PgPool;
use vclip_models::ids::{UserId, VideoId};
use vclip_models::video::{Video, VideoStatus};

use crate::error::{DbError, DbResult};

#[derive(Clone, Debug)]
pub struct VideoRepository {
    pool: PgPool,
}

impl VideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, video: &Video) -> DbResult<()> {
        sqlx::query(
            r#"
            insert into videos (
                id, user_id, title, description, original_filename, storage_key_raw,
                status, duration_seconds, content_type, language, probe, checksum,
                error, notified_at, created_at, updated_at
            )
            values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(video.id.as_uuid())
        .bind(video.user_id.as_uuid())
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.original_filename)
        .bind(&video.storage_key_raw)
        .bind(video.status.as_str())
        .bind(video.duration_seconds)
        .bind(&video.content_type)
        .bind(&video.language)
        .bind(&video.probe)
        .bind(&video.checksum)
        .bind(&video.error)
        .bind(video.notified_at)
        .bind(video.created_at)
        .bind(video.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get(&self, id: VideoId) -> DbResult<Video> {
        let row = sqlx::query_as::<_, VideoRow>(SELECT_VIDEO)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found(format!("video {id}")))?;
        Ok(row.into())
    }

    /// Move a video into `processing`, recording no other change. Used at
    /// the start of the pipeline; idempotent across retries of the same job.
    pub async fn mark_processing(&self, id: VideoId) -> DbResult<()> {
        sqlx::query("update videos set status = 'processing', updated_at = $2 where id = $1")
            .bind(id.as_uuid())
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Record the ffprobe result and derived fields. Does not change status.
    pub async fn record_probe(
        &self,
        id: VideoId,
        duration_seconds: f64,
        content_type: Option<&str>,
        probe: &serde_json::Value,
    ) -> DbResult<()> {
        sqlx::query(
            r#"
            update videos
            set duration_seconds = $2, content_type = $3, probe = $4, updated_at = $5
            where id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(duration_seconds)
        .bind(content_type)
        .bind(probe)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn record_language(&self, id: VideoId, language: Option<&str>) -> DbResult<()> {
        sqlx::query("update videos set language = $2, updated_at = $3 where id = $1")
            .bind(id.as_uuid())
            .bind(language)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Transition into `ready`, returning whether this was the *first* such
    /// transition (i.e. whether the caller should enqueue a notification).
    /// `notified_at` is touched by the Notifier Worker only, never here.
    pub async fn mark_ready(&self, id: VideoId) -> DbResult<bool> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query_as::<_, VideoRow>(
            "select * from videos where id = $1 for update",
        )
        .bind(id.as_uuid())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found(format!("video {id}")))?;
        let first_transition = row.status != VideoStatus::Ready.as_str();
        sqlx::query("update videos set status = 'ready', error = null, updated_at = $2 where id = $1")
            .bind(id.as_uuid())
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(first_transition && row.notified_at.is_none())
    }

    pub async fn mark_failed(&self, id: VideoId, error: &str) -> DbResult<()> {
        sqlx::query("update videos set status = 'failed', error = $2, updated_at = $3 where id = $1")
            .bind(id.as_uuid())
            .bind(error)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn mark_notified(&self, id: VideoId) -> DbResult<()> {
        sqlx::query("update videos set notified_at = $2 where id = $1 and notified_at is null")
            .bind(id.as_uuid())
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Delete the video row; `ON DELETE CASCADE` on the join/asset/history/
    /// summary foreign keys takes care of the rest of the relational side.
    pub async fn delete(&self, id: VideoId) -> DbResult<()> {
        sqlx::query("delete from videos where id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn list_ready_for_user(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> DbResult<Vec<Video>> {
        let rows = sqlx::query_as::<_, VideoRow>(
            "select * from videos where user_id = $1 and status = 'ready' order by created_at desc limit $2",
        )
        .bind(user_id.as_uuid())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

const SELECT_VIDEO: &str = "select * from videos where id = $1";

#[derive(sqlx::FromRow)]
struct VideoRow {
    id: uuid::Uuid,
    user_id: uuid::Uuid,
    title: String,
    description: String,
    original_filename: String,
    storage_key_raw: String,
    status: String,
    duration_seconds: Option<f64>,
    content_type: Option<String>,
    language: Option<String>,
    probe: Option<serde_json::Value>,
    checksum: Option<String>,
    error: Option<String>,
    notified_at: Option<chrono::DateTime<chrono::Utc>>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<VideoRow> for Video {
    fn from(row: VideoRow) -> Self {
        Video {
            id: VideoId::from(row.id),
            user_id: UserId::from(row.user_id),
            title: row.title,
            description: row.description,
            original_filename: row.original_filename,
            storage_key_raw: row.storage_key_raw,
            status: row.status.parse().unwrap_or_default(),
            duration_seconds: row.duration_seconds,
            content_type: row.content_type,
            language: row.language,
            probe: row.probe,
            checksum: row.checksum,
            error: row.error,
            notified_at: row.notified_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
