//! Application state: handles for the collaborators the thin HTTP layer
//! sits in front of. Construction happens once at start-up; everything
//! here is cheaply cloneable and bounded by the process lifetime.

use std::sync::Arc;

use sqlx::PgPool;

use vclip_db::{AssetRepository, CatalogRepository, HistoryRepository, UserRepository, VideoRepository};
use vclip_graph::GraphClient;
use vclip_queue::JobQueue;
use vclip_recall::RecallEngine;
use vclip_search::SearchClient;
use vclip_storage::R2Client;

use crate::config::ApiConfig;

/// Shared application state, cloned into every handler via axum's
/// `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub pool: PgPool,
    pub videos: VideoRepository,
    pub users: UserRepository,
    pub assets: AssetRepository,
    pub history: HistoryRepository,
    pub catalog: CatalogRepository,
    pub storage: Arc<R2Client>,
    pub queue: Arc<JobQueue>,
    pub search: Option<SearchClient>,
    pub graph: Option<GraphClient>,
    pub recall: Option<Arc<RecallEngine>>,
}

impl AppState {
    pub fn new(
        config: ApiConfig,
        pool: PgPool,
        storage: R2Client,
        queue: JobQueue,
        search: Option<SearchClient>,
        graph: Option<GraphClient>,
    ) -> Self {
        let recall = match (search.clone(), graph.clone()) {
            (Some(search), Some(graph)) => Some(Arc::new(RecallEngine::new(
                HistoryRepository::new(pool.clone()),
                CatalogRepository::new(pool.clone()),
                search,
                graph,
            ))),
            _ => None,
        };

        Self {
            config,
            videos: VideoRepository::new(pool.clone()),
            users: UserRepository::new(pool.clone()),
            assets: AssetRepository::new(pool.clone()),
            history: HistoryRepository::new(pool.clone()),
            catalog: CatalogRepository::new(pool.clone()),
            pool,
            storage: Arc::new(storage),
            queue: Arc::new(queue),
            search,
            graph,
            recall,
        }
    }
}
