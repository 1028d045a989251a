//! Thin glue over the Relational Store, Object Store, Search Index, and
//! Graph Store adapters: upload finalize (enqueue the Job Worker), video
//! lookup, the delete cascade, and watch-history heartbeats. Upload
//! presigning and authentication are external collaborators — the
//! caller is trusted to have already placed the raw object at
//! `storage_key_raw` before calling finalize.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use vclip_models::history::WatchHistory;
use vclip_models::ids::{UserId, VideoId};
use vclip_models::queue::{reasons, JobEnvelope};
use vclip_models::video::{Video, VideoAsset};
use vclip_queue::QueueKind;
use vclip_storage::Keys;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct FinalizeUploadRequest {
    pub user_id: UserId,
    #[validate(length(min = 1, max = 500))]
    pub title: String,
    #[validate(length(min = 1))]
    pub original_filename: String,
    #[validate(length(min = 1))]
    pub storage_key_raw: String,
}

/// Record the uploaded video and enqueue it onto `q:videos` with reason
/// `finalize`. The Job Worker picks it up, acquires the per-video lock,
/// and runs the pipeline DAG.
pub async fn finalize_upload(
    State(state): State<AppState>,
    Json(req): Json<FinalizeUploadRequest>,
) -> ApiResult<Json<Video>> {
    req.validate().map_err(|e| ApiError::bad_request(e.to_string()))?;

    let video = Video::new_uploaded(
        req.user_id,
        req.title,
        req.original_filename,
        req.storage_key_raw,
    );
    state.videos.insert(&video).await?;

    let envelope = JobEnvelope::new(video.id, reasons::FINALIZE);
    state.queue.push(QueueKind::Video, &envelope).await?;

    Ok(Json(video))
}

#[derive(Serialize)]
pub struct VideoDetail {
    #[serde(flatten)]
    pub video: Video,
    pub assets: Vec<VideoAsset>,
}

pub async fn get_video(
    State(state): State<AppState>,
    Path(video_id): Path<VideoId>,
) -> ApiResult<Json<VideoDetail>> {
    let video = state.videos.get(video_id).await?;
    let assets = state.assets.list_for_video(video_id).await?;
    Ok(Json(VideoDetail { video, assets }))
}

#[derive(Debug, Deserialize)]
pub struct ListUserVideosQuery {
    pub user_id: UserId,
    #[serde(default = "default_list_limit")]
    pub limit: i64,
}

fn default_list_limit() -> i64 {
    50
}

pub async fn list_user_videos(
    State(state): State<AppState>,
    Query(query): Query<ListUserVideosQuery>,
) -> ApiResult<Json<Vec<Video>>> {
    let videos = state.videos.list_ready_for_user(query.user_id, query.limit).await?;
    Ok(Json(videos))
}

/// Delete a video and every durable artifact derived from it: the
/// relational row (cascading to assets/history/summary/join rows via
/// `ON DELETE CASCADE`), the raw upload plus every derived object-store
/// prefix, and the search/graph mirrors. Index and graph purges are
/// best-effort, matching the write-side treatment of those same stores.
pub async fn delete_video(
    State(state): State<AppState>,
    Path(video_id): Path<VideoId>,
) -> ApiResult<Json<serde_json::Value>> {
    let video = state.videos.get(video_id).await?;
    let id_str = video_id.to_string();

    state.storage.delete_object(&video.storage_key_raw).await?;
    state.storage.delete_prefix(&Keys::hls_root_prefix(&id_str)).await?;
    state.storage.delete_prefix(&Keys::thumbs_prefix(&id_str)).await?;
    state.storage.delete_prefix(&Keys::captions_prefix(&id_str)).await?;

    if let Some(search) = &state.search {
        if let Err(err) = search.delete_video_doc(&id_str).await {
            tracing::warn!(video_id = %video_id, error = %err, "search doc delete failed, continuing");
        }
        if let Err(err) = search.delete_transcript_chunks_for_video(&id_str).await {
            tracing::warn!(video_id = %video_id, error = %err, "transcript chunk delete failed, continuing");
        }
    }
    if let Some(graph) = &state.graph {
        if let Err(err) = graph.delete_video(&id_str).await {
            tracing::warn!(video_id = %video_id, error = %err, "graph purge failed, continuing");
        }
    }

    state.videos.delete(video_id).await?;

    Ok(Json(serde_json::json!({ "deleted": id_str })))
}

#[derive(Debug, Deserialize)]
pub struct HeartbeatRequest {
    pub user_id: UserId,
    pub position_seconds: f64,
}

/// Record a watch-history heartbeat. The repository's own `where
/// last_watched_at < excluded.last_watched_at` clause is the source of
/// truth for monotonicity; this handler does not need to read-before-write.
pub async fn record_heartbeat(
    State(state): State<AppState>,
    Path(video_id): Path<VideoId>,
    Json(req): Json<HeartbeatRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let history = WatchHistory::new(req.user_id, video_id, req.position_seconds);
    state.history.record_heartbeat(&history).await?;
    Ok(Json(serde_json::json!({ "recorded": true })))
}
