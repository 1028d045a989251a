//! Consumes `q:videos`, guards each item with the lock service, runs the
//! pipeline, and drives the shared retry/backoff/DLQ policy on failure.

use std::sync::Arc;

use tokio::sync::{watch, Semaphore};
use tracing::{error, info, warn};

use vclip_models::queue::{DeadLetterEnvelope, JobEnvelope, QueueKind};
use vclip_queue::{JobQueue, LockService, RetryPolicy, RetryTracker};

use crate::pipeline::Pipeline;

pub struct JobExecutor {
    queue: JobQueue,
    locks: LockService,
    retry_policy: RetryPolicy,
    retry_tracker: RetryTracker,
    pipeline: Arc<Pipeline>,
    semaphore: Arc<Semaphore>,
    shutdown: watch::Sender<bool>,
}

impl JobExecutor {
    pub fn new(
        queue: JobQueue,
        locks: LockService,
        retry_tracker: RetryTracker,
        pipeline: Pipeline,
        max_concurrent_jobs: usize,
    ) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            queue,
            locks,
            retry_policy: RetryPolicy::from_env(),
            retry_tracker,
            pipeline: Arc::new(pipeline),
            semaphore: Arc::new(Semaphore::new(max_concurrent_jobs)),
            shutdown,
        }
    }

    pub fn shutdown(&self) {
        let _ = self.shutdown.send(true);
    }

    pub async fn run(&self) {
        let mut shutdown_rx = self.shutdown.subscribe();
        loop {
            if *shutdown_rx.borrow() {
                info!("job executor shutting down");
                break;
            }

            let popped = tokio::select! {
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("job executor shutting down");
                        break;
                    }
                    continue;
                }
                popped = self.queue.pop(QueueKind::Video) => popped,
            };

            let envelope = match popped {
                Ok(Some(envelope)) => envelope,
                Ok(None) => continue,
                Err(err) => {
                    warn!(error = %err, "queue pop failed, backing off");
                    tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                    continue;
                }
            };

            let permit = match self.semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => continue,
            };

            let queue = self.queue.clone();
            let locks = self.locks.clone();
            let retry_policy = self.retry_policy.clone();
            let retry_tracker = self.retry_tracker.clone();
            let pipeline = Arc::clone(&self.pipeline);

            tokio::spawn(async move {
                let _permit = permit;
                handle_envelope(queue, locks, retry_policy, retry_tracker, pipeline, envelope).await;
            });
        }
    }
}

async fn handle_envelope(
    queue: JobQueue,
    locks: LockService,
    retry_policy: RetryPolicy,
    retry_tracker: RetryTracker,
    pipeline: Arc<Pipeline>,
    envelope: JobEnvelope,
) {
    let video_id = envelope.video_id;
    let id_str = video_id.to_string();

    let guard = match locks.try_acquire(QueueKind::Video, &id_str).await {
        Ok(Some(guard)) => guard,
        Ok(None) => {
            info!(video_id = %video_id, "lock_skip: video is already being processed");
            return;
        }
        Err(err) => {
            warn!(video_id = %video_id, error = %err, "lock acquisition failed, dropping item");
            return;
        }
    };

    let result = pipeline.process(video_id).await;

    match result {
        Ok(()) => {
            if let Err(err) = retry_tracker.reset(QueueKind::Video, &id_str).await {
                warn!(video_id = %video_id, error = %err, "failed to reset attempt counter");
            }
        }
        Err(err) => {
            let attempts = match retry_tracker.increment(QueueKind::Video, &id_str).await {
                Ok(n) => n,
                Err(tracker_err) => {
                    error!(video_id = %video_id, error = %tracker_err, "failed to increment attempt counter");
                    u32::MAX
                }
            };

            if err.is_transient() && !retry_policy.is_exhausted(attempts) {
                let backoff = retry_policy.backoff_for(attempts).unwrap_or(30);
                warn!(
                    video_id = %video_id, attempts, backoff, error = %err,
                    "job failed transiently, scheduling retry"
                );
                tokio::spawn(async move {
                    tokio::time::sleep(std::time::Duration::from_secs(backoff)).await;
                    if let Err(requeue_err) = queue.requeue(QueueKind::Video, &envelope).await {
                        error!(video_id = %video_id, error = %requeue_err, "failed to requeue job");
                    }
                });
            } else {
                error!(video_id = %video_id, attempts, error = %err, "job failed terminally, moving to dlq");
                if let Err(mark_err) = pipeline.videos.mark_failed(video_id, err.message()).await {
                    error!(video_id = %video_id, error = %mark_err, "failed to mark video failed");
                }
                let dlq_entry = DeadLetterEnvelope::new(envelope, err.message(), attempts);
                if let Err(dlq_err) = queue.dead_letter(QueueKind::Video, &dlq_entry).await {
                    error!(video_id = %video_id, error = %dlq_err, "failed to write dlq entry");
                }
                if let Err(reset_err) = retry_tracker.reset(QueueKind::Video, &id_str).await {
                    warn!(video_id = %video_id, error = %reset_err, "failed to reset attempt counter after dlq");
                }
            }
        }
    }

    if let Err(err) = guard.release().await {
        warn!(video_id = %video_id, error = %err, "lock release failed, will expire via ttl");
    }
}
