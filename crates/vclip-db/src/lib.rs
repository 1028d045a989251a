//! Relational Store adapter: the Postgres-backed repositories the ingest
//! pipeline and recommendation lanes read and write through.

pub mod assets;
pub mod catalog;
pub mod error;
pub mod history;
pub mod pool;
pub mod users;
pub mod videos;

pub use assets::AssetRepository;
pub use catalog::{
    CatalogRepository, EntityInput, TagInput, TopicInput, VideoCatalog, WeightedCatalogItem,
};
pub use error::{DbError, DbResult};
pub use history::HistoryRepository;
pub use pool::{migrate, DbConfig};
pub use users::UserRepository;
pub use videos::VideoRepository;

#[cfg(test)]
mod tests {
    use super::*;
    use vclip_models::user::User;
    use vclip_models::video::Video;

    #[sqlx::test(migrations = "./migrations")]
    async fn user_upsert_is_idempotent_on_email(pool: sqlx::PgPool) -> sqlx::Result<()> {
        let repo = UserRepository::new(pool);
        let user = User::new("Person@Example.com");
        let first = repo.upsert(&user).await.unwrap();
        let second = repo.upsert(&User::new("person@example.com")).await.unwrap();
        assert_eq!(first.id, second.id);
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn video_ready_transition_fires_once(pool: sqlx::PgPool) -> sqlx::Result<()> {
        let users = UserRepository::new(pool.clone());
        let videos = VideoRepository::new(pool.clone());
        let user = users.upsert(&User::new("owner@example.com")).await.unwrap();
        let video = Video::new_uploaded(user.id, "t", "raw.mp4", "raw/k");
        videos.insert(&video).await.unwrap();

        let first = videos.mark_ready(video.id).await.unwrap();
        assert!(first);
        let second = videos.mark_ready(video.id).await.unwrap();
        assert!(!second, "second ready transition must not re-notify");
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn catalog_prunes_stale_join_rows(pool: sqlx::PgPool) -> sqlx::Result<()> {
        let users = UserRepository::new(pool.clone());
        let videos = VideoRepository::new(pool.clone());
        let catalog = CatalogRepository::new(pool.clone());
        let user = users.upsert(&User::new("owner2@example.com")).await.unwrap();
        let video = Video::new_uploaded(user.id, "t", "raw.mp4", "raw/k2");
        videos.insert(&video).await.unwrap();

        catalog
            .persist_enrichment(
                video.id,
                "summary",
                &[TopicInput { name: "Rust".into(), weight: 0.9 }],
                &[],
                &[
                    TagInput { name: "rust".into(), weight: 0.5 },
                    TagInput { name: "async".into(), weight: 0.3 },
                ],
            )
            .await
            .unwrap();

        catalog
            .persist_enrichment(
                video.id,
                "summary v2",
                &[TopicInput { name: "Rust".into(), weight: 0.95 }],
                &[],
                &[TagInput { name: "rust".into(), weight: 0.6 }],
            )
            .await
            .unwrap();

        let remaining: Vec<(uuid::Uuid,)> =
            sqlx::query_as("select tag_id from video_tags where video_id = $1")
                .bind(video.id.as_uuid())
                .fetch_all(&pool)
                .await
                .unwrap();
        assert_eq!(remaining.len(), 1, "the dropped 'async' tag join row must be pruned");
        Ok(())
    }
}
