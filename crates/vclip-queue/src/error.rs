//! Queue & Lock Service error types.

use thiserror::Error;

pub type QueueResult<T> = Result<T, QueueError>;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("lock not held by this owner: {0}")]
    LockNotOwned(String),
}

impl QueueError {
    /// Every queue/lock failure is a key-value RPC against Redis and is
    /// treated as potentially lost but idempotent, per the concurrency
    /// model — callers retry rather than branch on a transient/structural
    /// split here.
    pub fn is_transient(&self) -> bool {
        matches!(self, QueueError::Redis(_))
    }
}
