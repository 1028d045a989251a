//! Full-text search endpoint: thin glue deserializing `q`, calling into
//! the Search Index Adapter's two parallel sub-queries, and serializing
//! the grouped result. No auth/session handling here — that remains an
//! external collaborator.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use vclip_search::FullTextSearchResult;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<FullTextSearchResult>> {
    let search = state
        .search
        .as_ref()
        .ok_or_else(|| ApiError::internal("search index adapter is not configured"))?;

    if query.q.trim().is_empty() {
        return Err(ApiError::bad_request("q must not be empty"));
    }

    let result = search.full_text_search(&query.q).await?;
    Ok(Json(result))
}
