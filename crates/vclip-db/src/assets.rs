//! Derived video assets (HLS renditions, posters), unique on (video, kind, label).

use sqlx::PgPool;
use vclip_models::ids::VideoId;
use vclip_models::video::{AssetKind, AssetLabel, VideoAsset};

use crate::error::DbResult;

#[derive(Clone, Debug)]
pub struct AssetRepository {
    pool: PgPool,
}

impl AssetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn upsert(&self, asset: &VideoAsset) -> DbResult<()> {
        sqlx::query(
            r#"
            insert into video_assets (id, video_id, kind, label, storage_key, created_at, updated_at)
            values ($1, $2, $3, $4, $5, $6, $7)
            on conflict (video_id, kind, label) do update set
                storage_key = excluded.storage_key,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(asset.id.as_uuid())
        .bind(asset.video_id.as_uuid())
        .bind(asset.kind.as_str())
        .bind(asset.label.as_str())
        .bind(&asset.storage_key)
        .bind(asset.created_at)
        .bind(asset.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn list_for_video(&self, video_id: VideoId) -> DbResult<Vec<VideoAsset>> {
        let rows = sqlx::query_as::<_, AssetRow>(
            "select * from video_assets where video_id = $1",
        )
        .bind(video_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().filter_map(|r| r.try_into().ok()).collect())
    }
}

#[derive(sqlx::FromRow)]
struct AssetRow {
    id: uuid::Uuid,
    video_id: uuid::Uuid,
    kind: String,
    label: String,
    storage_key: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<AssetRow> for VideoAsset {
    type Error = ();

    fn try_from(row: AssetRow) -> Result<Self, Self::Error> {
        let kind = match row.kind.as_str() {
            "hls" => AssetKind::Hls,
            "thumbnail" => AssetKind::Thumbnail,
            _ => return Err(()),
        };
        let label = match row.label.as_str() {
            "720p" => AssetLabel::Rung720p,
            "480p" => AssetLabel::Rung480p,
            "poster" => AssetLabel::Poster,
            _ => return Err(()),
        };
        Ok(VideoAsset {
            id: vclip_models::ids::VideoAssetId::from(row.id),
            video_id: vclip_models::ids::VideoId::from(row.video_id),
            kind,
            label,
            storage_key: row.storage_key,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
