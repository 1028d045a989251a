//! Errors surfaced by the Seed Builder and the Recall & Rerank Engine.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecallError {
    #[error("relational store error: {0}")]
    Db(#[from] vclip_db::DbError),
    #[error("search index error: {0}")]
    Search(#[from] vclip_search::SearchError),
    #[error("graph store error: {0}")]
    Graph(#[from] vclip_graph::GraphError),
}

impl RecallError {
    pub fn is_transient(&self) -> bool {
        match self {
            RecallError::Db(vclip_db::DbError::Sqlx(_)) => true,
            RecallError::Db(_) => false,
            RecallError::Search(e) => e.is_transient(),
            RecallError::Graph(e) => e.is_transient(),
        }
    }
}

pub type RecallResult<T> = Result<T, RecallError>;
