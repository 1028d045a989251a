//! Content Enricher error types.

use thiserror::Error;

pub type EnrichResult<T> = Result<T, EnrichError>;

#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("llm request failed: {0}")]
    Llm(#[from] reqwest::Error),

    #[error("llm response had no usable content")]
    EmptyResponse,

    #[error("could not decode enrichment JSON: {0}")]
    Decode(String),

    #[error("relational store error: {0}")]
    Db(#[from] vclip_db::DbError),
}

impl EnrichError {
    /// Enrichment is a best-effort pipeline step: failures here are logged
    /// by the orchestrator and never promote `videos.status` to `failed`.
    pub fn is_transient(&self) -> bool {
        matches!(self, EnrichError::Llm(_))
    }
}
