//! Graph Store integration tests.

/// Test Neo4j HTTP Cypher transactional-endpoint connectivity.
#[tokio::test]
#[ignore = "requires Neo4j credentials"]
async fn test_graph_connection() {
    dotenvy::dotenv().ok();

    let client = vclip_graph::GraphClient::from_env().expect("failed to build graph client");

    client
        .ensure_constraints()
        .await
        .expect("failed to ensure constraints");
}

/// Test that an enrichment mirror round-trips into a queryable node.
#[tokio::test]
#[ignore = "requires Neo4j credentials"]
async fn test_mirror_enrichment() {
    use vclip_graph::mirror::{InsertThresholds, MirrorItem};

    dotenvy::dotenv().ok();

    let client = vclip_graph::GraphClient::from_env().expect("failed to build graph client");
    let video_id = uuid::Uuid::new_v4().to_string();

    let topics = vec![MirrorItem {
        id: uuid::Uuid::new_v4().to_string(),
        canonical_name: "integration-test-topic".to_string(),
        weight: 0.9,
    }];

    client
        .mirror_enrichment(&video_id, &topics, &[], &[], InsertThresholds::default())
        .await
        .expect("failed to mirror enrichment");

    client
        .delete_video(&video_id)
        .await
        .expect("failed to purge test video from the graph");
}
