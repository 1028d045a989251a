//! Notifier error taxonomy, mirroring the Job Worker's tagged-outcome
//! approach so both binaries share the same retry/backoff/DLQ executor
//! shape.

use thiserror::Error;

pub type NotifierResult<T> = Result<T, NotifierError>;

#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("{0}")]
    Transient(String),
    #[error("{0}")]
    Terminal(String),
}

impl NotifierError {
    pub fn is_transient(&self) -> bool {
        matches!(self, NotifierError::Transient(_))
    }

    pub fn message(&self) -> &str {
        match self {
            NotifierError::Transient(m) | NotifierError::Terminal(m) => m,
        }
    }
}

impl From<vclip_db::DbError> for NotifierError {
    fn from(e: vclip_db::DbError) -> Self {
        match e {
            vclip_db::DbError::NotFound(_) => NotifierError::Terminal(e.to_string()),
            vclip_db::DbError::Sqlx(_) => NotifierError::Transient(e.to_string()),
            vclip_db::DbError::Config(_) | vclip_db::DbError::Migrate(_) => {
                NotifierError::Terminal(e.to_string())
            }
        }
    }
}

impl From<vclip_queue::QueueError> for NotifierError {
    fn from(e: vclip_queue::QueueError) -> Self {
        if e.is_transient() {
            NotifierError::Transient(e.to_string())
        } else {
            NotifierError::Terminal(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_is_distinguished_from_terminal() {
        assert!(NotifierError::Transient("x".into()).is_transient());
        assert!(!NotifierError::Terminal("x".into()).is_transient());
    }
}
