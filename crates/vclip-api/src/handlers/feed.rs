//! Personalized home feed: thin glue over the Recall & Rerank Engine.
//! This route only deserializes `user_id` and serializes the blended,
//! reranked candidate list.

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use vclip_models::ids::UserId;
use vclip_recall::Lane;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub user_id: UserId,
}

#[derive(Debug, Serialize)]
pub struct FeedItem {
    pub video_id: String,
    pub lane: &'static str,
    pub score: f64,
}

#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub items: Vec<FeedItem>,
}

pub async fn feed(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> ApiResult<Json<FeedResponse>> {
    let recall = state
        .recall
        .as_ref()
        .ok_or_else(|| ApiError::internal("recall engine is not configured"))?;

    let candidates = recall.recommend(query.user_id, Utc::now()).await?;
    let items = candidates
        .into_iter()
        .map(|c| FeedItem {
            video_id: c.video_id,
            lane: match c.lane {
                Lane::Os => "os",
                Lane::Graph => "graph",
            },
            score: c.score,
        })
        .collect();

    Ok(Json(FeedResponse { items }))
}
