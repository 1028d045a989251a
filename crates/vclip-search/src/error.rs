//! Search Index Adapter error types.

use thiserror::Error;

pub type SearchResult<T> = Result<T, SearchError>;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("search index returned {status}: {body}")]
    IndexError { status: u16, body: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("search index config error: {0}")]
    Config(String),
}

impl SearchError {
    /// Index and search writes are best-effort collaborators per the
    /// error taxonomy: callers log and continue rather than branch on
    /// retry here, but network-shaped failures are still distinguished
    /// for observability.
    pub fn is_transient(&self) -> bool {
        matches!(self, SearchError::Request(_))
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
