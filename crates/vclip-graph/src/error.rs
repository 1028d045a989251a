//! Graph Store Adapter error types.

use thiserror::Error;

pub type GraphResult<T> = Result<T, GraphError>;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("graph request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("graph store returned errors: {0}")]
    Cypher(String),

    #[error("graph response decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("graph store config error: {0}")]
    Config(String),
}

impl GraphError {
    /// Graph writes are best-effort per the error taxonomy; network
    /// failures are distinguished only for logging.
    pub fn is_transient(&self) -> bool {
        matches!(self, GraphError::Request(_))
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
