//! Relational Store integration tests.

use vclip_db::{DbConfig, UserRepository, VideoRepository};
use vclip_models::user::User;
use vclip_models::video::Video;

/// Test Postgres connectivity and migration against `DATABASE_URL`.
#[tokio::test]
#[ignore = "requires Postgres"]
async fn test_connect_and_migrate() {
    dotenvy::dotenv().ok();

    let pool = DbConfig::from_env().expect("DATABASE_URL is not set").connect().await.expect("failed to connect");
    vclip_db::migrate(&pool).await.expect("failed to run migrations");
}

/// Test that a video's full lifecycle (insert, process, ready) persists
/// against a live database.
#[tokio::test]
#[ignore = "requires Postgres"]
async fn test_video_lifecycle_against_live_database() {
    dotenvy::dotenv().ok();

    let pool = DbConfig::from_env().expect("DATABASE_URL is not set").connect().await.expect("failed to connect");
    vclip_db::migrate(&pool).await.expect("failed to run migrations");

    let users = UserRepository::new(pool.clone());
    let videos = VideoRepository::new(pool.clone());

    let user = users.upsert(&User::new("integration@example.com")).await.expect("failed to upsert user");
    let video = Video::new_uploaded(user.id, "integration title", "raw.mp4", "raw/integration.mp4");
    videos.insert(&video).await.expect("failed to insert video");

    videos.mark_processing(video.id).await.expect("failed to mark processing");
    let fetched = videos.get(video.id).await.expect("failed to fetch video");
    assert_eq!(fetched.status, vclip_models::video::VideoStatus::Processing);

    let first_ready = videos.mark_ready(video.id).await.expect("failed to mark ready");
    assert!(first_ready, "first ready transition should fire notification");

    videos.delete(video.id).await.expect("failed to delete video");
}
