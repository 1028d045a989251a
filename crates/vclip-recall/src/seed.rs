//! Seed Builder: turns recent watch history into a weighted set of
//! catalog seeds and a single user embedding, consumed by both recall
//! lanes.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use vclip_db::{CatalogRepository, HistoryRepository};
use vclip_models::ids::{UserId, VideoId};
use vclip_search::SearchClient;

use crate::config::SeedConfig;
use crate::error::RecallResult;

#[derive(Debug, Clone)]
pub struct ScoredSeed {
    pub id: String,
    pub canonical_name: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Default)]
pub struct SeedBundle {
    pub history: Vec<VideoId>,
    pub topics: Vec<ScoredSeed>,
    pub entities: Vec<ScoredSeed>,
    pub tags: Vec<ScoredSeed>,
    pub user_embedding: Option<Vec<f32>>,
}

impl SeedBundle {
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

pub struct SeedBuilder {
    history: HistoryRepository,
    catalog: CatalogRepository,
    search: SearchClient,
    config: SeedConfig,
}

impl SeedBuilder {
    pub fn new(history: HistoryRepository, catalog: CatalogRepository, search: SearchClient) -> Self {
        Self { history, catalog, search, config: SeedConfig::from_env() }
    }

    pub fn with_config(mut self, config: SeedConfig) -> Self {
        self.config = config;
        self
    }

    pub async fn build(&self, user_id: UserId, now: DateTime<Utc>) -> RecallResult<SeedBundle> {
        let history = self.history.recent_ready_for_user(user_id, self.config.history_depth).await?;
        if history.is_empty() {
            return Ok(SeedBundle::default());
        }

        let mut recencies = Vec::with_capacity(history.len());
        for h in &history {
            let age_days = (now - h.last_watched_at).num_seconds() as f64 / 86_400.0;
            recencies.push(recency_weight(age_days.max(0.0), self.config.recency_half_life_days));
        }

        let mut topic_scores: HashMap<String, (String, f64)> = HashMap::new();
        let mut entity_scores: HashMap<String, (String, f64)> = HashMap::new();
        let mut tag_scores: HashMap<String, (String, f64)> = HashMap::new();

        for (h, recency) in history.iter().zip(recencies.iter()) {
            let catalog = self.catalog.weighted_catalog_for_video(h.video_id).await?;
            accumulate(&mut topic_scores, &catalog.topics, *recency);
            accumulate(&mut entity_scores, &catalog.entities, *recency);
            accumulate(&mut tag_scores, &catalog.tags, *recency);
        }

        let topics = top_k_renormalized(topic_scores, self.config.max_topic_seeds);
        let entities = top_k_renormalized(entity_scores, self.config.max_entity_seeds);
        let tags = top_k_renormalized(tag_scores, self.config.max_tag_seeds);

        let history_ids: Vec<VideoId> = history.iter().map(|h| h.video_id).collect();
        let video_id_strings: Vec<String> = history_ids.iter().map(|id| id.to_string()).collect();
        let hydrated = self.search.hydrate_videos(&video_id_strings).await?;
        let embeddings_by_video: HashMap<String, Vec<f32>> =
            hydrated.into_iter().map(|h| (h.video_id, h.embedding)).collect();

        let user_embedding = build_user_embedding(&history, &recencies, &embeddings_by_video);

        Ok(SeedBundle { history: history_ids, topics, entities, tags, user_embedding })
    }
}

fn recency_weight(age_days: f64, half_life_days: f64) -> f64 {
    0.5_f64.powf(age_days / half_life_days)
}

fn accumulate(
    scores: &mut HashMap<String, (String, f64)>,
    items: &[vclip_db::WeightedCatalogItem],
    recency: f64,
) {
    for item in items {
        let entry = scores
            .entry(item.id.to_string())
            .or_insert((item.canonical_name.clone(), 0.0));
        entry.1 += item.weight * recency;
    }
}

fn top_k_renormalized(scores: HashMap<String, (String, f64)>, k: usize) -> Vec<ScoredSeed> {
    let mut items: Vec<ScoredSeed> = scores
        .into_iter()
        .map(|(id, (canonical_name, weight))| ScoredSeed { id, canonical_name, weight })
        .collect();
    items.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(std::cmp::Ordering::Equal));
    items.truncate(k);
    let total: f64 = items.iter().map(|i| i.weight).sum();
    if total > 0.0 {
        for item in &mut items {
            item.weight /= total;
        }
    }
    items
}

fn build_user_embedding(
    history: &[vclip_models::history::WatchHistory],
    recencies: &[f64],
    embeddings_by_video: &HashMap<String, Vec<f32>>,
) -> Option<Vec<f32>> {
    let mut dimension: Option<usize> = None;
    let mut accumulated: Vec<f64> = Vec::new();
    let mut recency_sum = 0.0_f64;

    for (h, recency) in history.iter().zip(recencies.iter()) {
        let Some(vector) = embeddings_by_video.get(&h.video_id.to_string()) else {
            continue;
        };
        if vector.is_empty() {
            continue;
        }
        let dim = *dimension.get_or_insert(vector.len());
        if vector.len() != dim {
            continue;
        }
        if accumulated.is_empty() {
            accumulated = vec![0.0; dim];
        }
        for (acc, v) in accumulated.iter_mut().zip(vector.iter()) {
            *acc += *recency * (*v as f64);
        }
        recency_sum += recency;
    }

    if recency_sum <= 0.0 || accumulated.is_empty() {
        return None;
    }
    for v in &mut accumulated {
        *v /= recency_sum;
    }
    let norm = accumulated.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm <= 0.0 {
        return None;
    }
    Some(accumulated.into_iter().map(|v| (v / norm) as f32).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recency_halves_every_half_life() {
        assert_eq!(recency_weight(0.0, 21.0), 1.0);
        assert!((recency_weight(21.0, 21.0) - 0.5).abs() < 1e-9);
        assert!((recency_weight(42.0, 21.0) - 0.25).abs() < 1e-9);
    }

    #[test]
    fn top_k_renormalizes_to_sum_one() {
        let mut scores = HashMap::new();
        scores.insert("a".to_string(), ("a".to_string(), 3.0));
        scores.insert("b".to_string(), ("b".to_string(), 1.0));
        let top = top_k_renormalized(scores, 5);
        let sum: f64 = top.iter().map(|i| i.weight).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn top_k_truncates_to_k_keeping_highest_weight() {
        let mut scores = HashMap::new();
        for i in 0..10 {
            scores.insert(i.to_string(), (i.to_string(), i as f64));
        }
        let top = top_k_renormalized(scores, 3);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].canonical_name, "9");
    }

    #[test]
    fn user_embedding_drops_dimension_mismatches_and_l2_normalizes() {
        use vclip_models::history::WatchHistory;
        use vclip_models::ids::{UserId, VideoId};

        let v1 = VideoId::new();
        let v2 = VideoId::new();
        let history = vec![
            WatchHistory {
                user_id: UserId::new(),
                video_id: v1,
                last_position_seconds: 0.0,
                last_watched_at: Utc::now(),
            },
            WatchHistory {
                user_id: UserId::new(),
                video_id: v2,
                last_position_seconds: 0.0,
                last_watched_at: Utc::now(),
            },
        ];
        let recencies = vec![1.0, 1.0];
        let mut embeddings = HashMap::new();
        embeddings.insert(v1.to_string(), vec![1.0_f32, 0.0]);
        embeddings.insert(v2.to_string(), vec![0.0_f32, 1.0, 2.0]); // mismatched dim, dropped

        let user_embedding = build_user_embedding(&history, &recencies, &embeddings).unwrap();
        assert_eq!(user_embedding.len(), 2);
        let norm: f32 = user_embedding.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn user_embedding_is_none_when_no_video_has_an_embedding() {
        use vclip_models::history::WatchHistory;
        use vclip_models::ids::{UserId, VideoId};

        let history = vec![WatchHistory {
            user_id: UserId::new(),
            video_id: VideoId::new(),
            last_position_seconds: 0.0,
            last_watched_at: Utc::now(),
        }];
        let recencies = vec![1.0];
        let embeddings = HashMap::new();
        assert!(build_user_embedding(&history, &recencies, &embeddings).is_none());
    }
}
