//! Job Worker error taxonomy: every step surfaces a tagged outcome the
//! orchestrator pattern-matches on to decide retry vs terminal failure,
//! per the Design Notes' "exceptions as control flow" rework.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    /// Network, timeout, subprocess exit, lock contention: retried with
    /// backoff by the executor.
    #[error("{0}")]
    Transient(String),

    /// Missing row, invalid id, malformed input: terminal for the item,
    /// routed straight to the DLQ.
    #[error("{0}")]
    Terminal(String),
}

impl WorkerError {
    pub fn is_transient(&self) -> bool {
        matches!(self, WorkerError::Transient(_))
    }

    pub fn message(&self) -> &str {
        match self {
            WorkerError::Transient(m) | WorkerError::Terminal(m) => m,
        }
    }
}

impl From<vclip_media::MediaError> for WorkerError {
    fn from(e: vclip_media::MediaError) -> Self {
        if e.is_transient() {
            WorkerError::Transient(e.to_string())
        } else {
            WorkerError::Terminal(e.to_string())
        }
    }
}

impl From<vclip_db::DbError> for WorkerError {
    fn from(e: vclip_db::DbError) -> Self {
        match &e {
            vclip_db::DbError::NotFound(_) => WorkerError::Terminal(e.to_string()),
            vclip_db::DbError::Sqlx(_) => WorkerError::Transient(e.to_string()),
            vclip_db::DbError::Config(_) | vclip_db::DbError::Migrate(_) => {
                WorkerError::Terminal(e.to_string())
            }
        }
    }
}

impl From<vclip_storage::StorageError> for WorkerError {
    fn from(e: vclip_storage::StorageError) -> Self {
        match &e {
            vclip_storage::StorageError::NotFound(_)
            | vclip_storage::StorageError::InvalidKey(_)
            | vclip_storage::StorageError::ConfigError(_) => WorkerError::Terminal(e.to_string()),
            _ => WorkerError::Transient(e.to_string()),
        }
    }
}

impl From<vclip_queue::QueueError> for WorkerError {
    fn from(e: vclip_queue::QueueError) -> Self {
        if e.is_transient() {
            WorkerError::Transient(e.to_string())
        } else {
            WorkerError::Terminal(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_is_distinguished_from_terminal() {
        assert!(WorkerError::Transient("x".into()).is_transient());
        assert!(!WorkerError::Terminal("x".into()).is_transient());
    }
}
