//! Two durable FIFO queues (`q:videos`, `q:emails`) plus their DLQs,
//! maintained as Redis lists. Producers `LPUSH` JSON envelopes; consumers
//! perform a blocking right-pop (`BRPOP`) with a fixed timeout so the
//! consume loop can periodically check a stop signal.

use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use vclip_models::queue::{DeadLetterEnvelope, JobEnvelope, QueueKind};

use crate::error::QueueResult;

/// Dead-letter lists are capped at this many entries; a full DLQ drops its
/// oldest entry (`LTRIM`) to make room for the newest.
pub const DLQ_CAP: isize = 10_000;

/// Blocking pop timeout, in whole seconds.
pub const POP_TIMEOUT_SECS: usize = 5;

#[derive(Clone)]
pub struct JobQueue {
    conn: ConnectionManager,
}

impl JobQueue {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    pub async fn connect(redis_url: &str) -> QueueResult<Self> {
        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self::new(conn))
    }

    /// Push an envelope onto the head of the given queue (FIFO via
    /// `LPUSH` + `BRPOP`).
    pub async fn push(&self, kind: QueueKind, envelope: &JobEnvelope) -> QueueResult<()> {
        let payload = serde_json::to_string(envelope)?;
        let mut conn = self.conn.clone();
        conn.lpush::<_, _, ()>(kind.queue_key(), payload).await?;
        Ok(())
    }

    /// Blocking right-pop with the fixed [`POP_TIMEOUT_SECS`] timeout.
    /// Returns `None` on timeout, which is not an error — the caller loops
    /// and re-checks its stop signal.
    pub async fn pop(&self, kind: QueueKind) -> QueueResult<Option<JobEnvelope>> {
        let mut conn = self.conn.clone();
        let result: Option<(String, String)> = conn
            .brpop(kind.queue_key(), POP_TIMEOUT_SECS as f64)
            .await?;
        match result {
            Some((_key, payload)) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }

    /// Re-enqueue the same envelope (retry path); pushes onto the head so
    /// ordering among distinct items is preserved FIFO, matching the
    /// original enqueue.
    pub async fn requeue(&self, kind: QueueKind, envelope: &JobEnvelope) -> QueueResult<()> {
        self.push(kind, envelope).await
    }

    /// Push to the DLQ, trimming it to [`DLQ_CAP`] entries.
    pub async fn dead_letter(&self, kind: QueueKind, entry: &DeadLetterEnvelope) -> QueueResult<()> {
        let payload = serde_json::to_string(entry)?;
        let mut conn = self.conn.clone();
        conn.lpush::<_, _, ()>(kind.dlq_key(), payload).await?;
        conn.ltrim::<_, ()>(kind.dlq_key(), 0, DLQ_CAP - 1).await?;
        Ok(())
    }

    pub async fn queue_len(&self, kind: QueueKind) -> QueueResult<u64> {
        let mut conn = self.conn.clone();
        Ok(conn.llen(kind.queue_key()).await?)
    }

    pub async fn dlq_len(&self, kind: QueueKind) -> QueueResult<u64> {
        let mut conn = self.conn.clone();
        Ok(conn.llen(kind.dlq_key()).await?)
    }
}

#[derive(Debug, Clone)]
pub struct QueueConfig {
    pub redis_url: String,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://localhost:6379".to_string(),
        }
    }
}

impl QueueConfig {
    pub fn from_env() -> Self {
        Self {
            redis_url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
        }
    }
}
