//! Recall & Rerank Engine: Seed Builder plus the two recall lanes
//! (lexical/vector and graph random-walk), blended and reranked by MMR
//! into a single ordered feed.

pub mod blend;
pub mod config;
pub mod error;
pub mod graph_lane;
pub mod mmr;
pub mod os_lane;
pub mod seed;

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use vclip_db::{CatalogRepository, HistoryRepository};
use vclip_graph::GraphClient;
use vclip_models::ids::UserId;
use vclip_search::SearchClient;

pub use config::RecallConfig;
pub use error::{RecallError, RecallResult};
pub use seed::{SeedBuilder, SeedBundle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lane {
    Os,
    Graph,
}

#[derive(Debug, Clone)]
pub struct Candidate {
    pub video_id: String,
    pub lane: Lane,
    pub score: f64,
    pub canonical_names: HashSet<String>,
}

/// Top-level entry point: builds seeds from watch history, runs both
/// recall lanes, and blends the result into a single ordered list of up
/// to `target_total` video ids.
pub struct RecallEngine {
    seed_builder: SeedBuilder,
    search: SearchClient,
    graph: GraphClient,
    config: RecallConfig,
}

impl RecallEngine {
    pub fn new(
        history: HistoryRepository,
        catalog: CatalogRepository,
        search: SearchClient,
        graph: GraphClient,
    ) -> Self {
        let config = RecallConfig::from_env();
        let seed_builder = SeedBuilder::new(history, catalog, search.clone());
        Self { seed_builder, search, graph, config }
    }

    pub fn with_config(mut self, config: RecallConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the full blended recall for `user_id`. Returns an empty list
    /// when the user has no watch history.
    pub async fn recommend(&self, user_id: UserId, now: DateTime<Utc>) -> RecallResult<Vec<Candidate>> {
        let seeds = self.seed_builder.build(user_id, now).await?;
        if seeds.is_empty() {
            return Ok(Vec::new());
        }

        let history_ids: Vec<String> = seeds.history.iter().map(|id| id.to_string()).collect();

        let os_shortlist =
            os_lane::run_os_lane(&self.search, &seeds, &history_ids, &self.config).await?;
        let os_exclude: Vec<String> = os_shortlist.iter().map(|c| c.video_id.clone()).collect();

        let graph_shortlist = graph_lane::run_graph_lane(
            &self.graph,
            &self.search,
            &seeds,
            &history_ids,
            &os_exclude,
            &self.config,
        )
        .await?;

        Ok(blend::blend(os_shortlist, graph_shortlist, &self.config))
    }
}
