//! Object Store Adapter integration tests.

use vclip_storage::{content_type_for_key, Keys, R2Client, Rung};

/// Test R2 connectivity via a head-bucket call.
#[tokio::test]
#[ignore = "requires R2 credentials"]
async fn test_r2_connectivity() {
    dotenvy::dotenv().ok();

    let client = R2Client::from_env().await.expect("failed to create R2 client");
    client.check_connectivity().await.expect("failed to check R2 connectivity");
}

/// Test presigned URL generation carries a signature.
#[tokio::test]
#[ignore = "requires R2 credentials"]
async fn test_presigned_get_url() {
    dotenvy::dotenv().ok();

    let client = R2Client::from_env().await.expect("failed to create R2 client");
    let url = client
        .presign_get("integration/test.mp4", std::time::Duration::from_secs(3600))
        .await
        .expect("failed to presign");

    assert!(url.contains("X-Amz-Signature") || url.contains("Signature"));
}

/// Test upload, exists, and delete for a single object.
#[tokio::test]
#[ignore = "requires R2 credentials"]
async fn test_upload_exists_delete_cycle() {
    use std::io::Write;
    use tempfile::NamedTempFile;

    dotenvy::dotenv().ok();

    let client = R2Client::from_env().await.expect("failed to create R2 client");

    let mut temp_file = NamedTempFile::new().expect("failed to create temp file");
    temp_file.write_all(b"integration test content").expect("failed to write temp file");

    let key = "integration/upload-cycle.txt";
    client
        .upload_file(temp_file.path(), key, content_type_for_key(key))
        .await
        .expect("failed to upload");

    assert!(client.exists(key).await.expect("failed to stat"));

    client.delete_object(key).await.expect("failed to delete");
    assert!(!client.exists(key).await.expect("failed to stat after delete"));
}

/// Test recursive upload of an HLS rung directory and prefix delete.
#[tokio::test]
#[ignore = "requires R2 credentials"]
async fn test_upload_directory_and_prefix_delete() {
    dotenvy::dotenv().ok();

    let client = R2Client::from_env().await.expect("failed to create R2 client");

    let dir = tempfile::tempdir().expect("failed to create temp dir");
    std::fs::write(dir.path().join("index.m3u8"), "#EXTM3U\n").expect("failed to write playlist");
    std::fs::write(dir.path().join("seg_000.ts"), b"fake segment").expect("failed to write segment");

    let video_id = "integration-test-video";
    let prefix = Keys::hls_prefix(video_id, Rung::P720);
    let uploaded = client.upload_directory(dir.path(), &prefix).await.expect("failed to upload directory");
    assert_eq!(uploaded.len(), 2);

    let deleted = client.delete_prefix(&Keys::hls_root_prefix(video_id)).await.expect("failed to delete prefix");
    assert_eq!(deleted, 2);
}
