//! Watch history, upserted keyed by (user, video).

use sqlx::PgPool;
use vclip_models::history::WatchHistory;
use vclip_models::ids::{UserId, VideoId};

use crate::error::DbResult;

#[derive(Clone, Debug)]
pub struct HistoryRepository {
    pool: PgPool,
}

impl HistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a heartbeat, never rewinding `last_watched_at`. Relies on the
    /// row's own timestamp, not application clock comparison, to stay
    /// correct under concurrent heartbeats for the same (user, video).
    pub async fn record_heartbeat(&self, history: &WatchHistory) -> DbResult<()> {
        sqlx::query(
            r#"
            insert into watch_history (user_id, video_id, last_position_seconds, last_watched_at)
            values ($1, $2, $3, $4)
            on conflict (user_id, video_id) do update set
                last_position_seconds = excluded.last_position_seconds,
                last_watched_at = excluded.last_watched_at
            where watch_history.last_watched_at < excluded.last_watched_at
            "#,
        )
        .bind(history.user_id.as_uuid())
        .bind(history.video_id.as_uuid())
        .bind(history.last_position_seconds)
        .bind(history.last_watched_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Most recently watched videos for a user, newest first. Drives the
    /// Seed Builder's recency-weighted aggregation and its exclusion set.
    pub async fn recent_for_user(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> DbResult<Vec<WatchHistory>> {
        let rows = sqlx::query_as::<_, HistoryRow>(
            r#"
            select user_id, video_id, last_position_seconds, last_watched_at
            from watch_history
            where user_id = $1
            order by last_watched_at desc
            limit $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Same ordering as [`Self::recent_for_user`], restricted to videos
    /// currently `ready`. Drives the Seed Builder, which cannot seed from
    /// history the user can't actually watch yet.
    pub async fn recent_ready_for_user(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> DbResult<Vec<WatchHistory>> {
        let rows = sqlx::query_as::<_, HistoryRow>(
            r#"
            select h.user_id, h.video_id, h.last_position_seconds, h.last_watched_at
            from watch_history h
            join videos v on v.id = h.video_id
            where h.user_id = $1 and v.status = 'ready'
            order by h.last_watched_at desc
            limit $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn video_ids_for_user(&self, user_id: UserId) -> DbResult<Vec<VideoId>> {
        let rows: Vec<(uuid::Uuid,)> = sqlx::query_as(
            "select video_id from watch_history where user_id = $1",
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| VideoId::from(id)).collect())
    }
}

#[derive(sqlx::FromRow)]
struct HistoryRow {
    user_id: uuid::Uuid,
    video_id: uuid::Uuid,
    last_position_seconds: f64,
    last_watched_at: chrono::DateTime<chrono::Utc>,
}

impl From<HistoryRow> for WatchHistory {
    fn from(row: HistoryRow) -> Self {
        WatchHistory {
            user_id: UserId::from(row.user_id),
            video_id: VideoId::from(row.video_id),
            last_position_seconds: row.last_position_seconds,
            last_watched_at: row.last_watched_at,
        }
    }
}
