//! Queue & Lock Service integration tests.

use vclip_models::ids::VideoId;
use vclip_models::queue::{reasons, DeadLetterEnvelope, JobEnvelope, QueueKind};
use vclip_queue::{JobQueue, QueueConfig};

/// Test Redis connection and basic queue length reads.
#[tokio::test]
#[ignore = "requires Redis"]
async fn test_redis_connection() {
    dotenvy::dotenv().ok();

    let config = QueueConfig::from_env();
    let queue = JobQueue::connect(&config.redis_url)
        .await
        .expect("failed to connect to redis");

    let len = queue
        .queue_len(QueueKind::Video)
        .await
        .expect("failed to read queue length");
    println!("q:videos length: {len}");
}

/// Test the push/pop cycle for the video queue.
#[tokio::test]
#[ignore = "requires Redis"]
async fn test_push_pop_cycle() {
    dotenvy::dotenv().ok();

    let config = QueueConfig::from_env();
    let queue = JobQueue::connect(&config.redis_url)
        .await
        .expect("failed to connect to redis");

    let envelope = JobEnvelope::new(VideoId::new(), reasons::FINALIZE);
    queue
        .push(QueueKind::Video, &envelope)
        .await
        .expect("failed to push");

    let popped = queue
        .pop(QueueKind::Video)
        .await
        .expect("failed to pop")
        .expect("expected an envelope within the pop timeout");

    assert_eq!(popped.video_id, envelope.video_id);
    assert_eq!(popped.reason, reasons::FINALIZE);
}

/// Test that the dead-letter list accepts an entry and its length reflects it.
#[tokio::test]
#[ignore = "requires Redis"]
async fn test_dead_letter() {
    dotenvy::dotenv().ok();

    let config = QueueConfig::from_env();
    let queue = JobQueue::connect(&config.redis_url)
        .await
        .expect("failed to connect to redis");

    let envelope = JobEnvelope::new(VideoId::new(), reasons::RETRY);
    let dead_letter = DeadLetterEnvelope::new(envelope, "simulated failure", 3);

    let before = queue.dlq_len(QueueKind::Video).await.expect("failed to read dlq length");
    queue
        .dead_letter(QueueKind::Video, &dead_letter)
        .await
        .expect("failed to dead-letter");
    let after = queue.dlq_len(QueueKind::Video).await.expect("failed to read dlq length");

    assert_eq!(after, before + 1);
}
