//! Tunables for the Seed Builder and the Recall & Rerank Engine, all
//! overridable via environment variables, all with the spec's defaults.

#[derive(Debug, Clone, Copy)]
pub struct SeedConfig {
    pub history_depth: i64,
    pub recency_half_life_days: f64,
    pub max_topic_seeds: usize,
    pub max_entity_seeds: usize,
    pub max_tag_seeds: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            history_depth: 50,
            recency_half_life_days: 21.0,
            max_topic_seeds: 5,
            max_entity_seeds: 15,
            max_tag_seeds: 20,
        }
    }
}

impl SeedConfig {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            history_depth: env_i64("HISTORY_DEPTH", default.history_depth).clamp(1, 50),
            recency_half_life_days: env_f64(
                "RECENCY_HALF_LIFE_DAYS",
                default.recency_half_life_days,
            ),
            max_topic_seeds: env_usize("MAX_TOPIC_SEEDS", default.max_topic_seeds),
            max_entity_seeds: env_usize("MAX_ENTITY_SEEDS", default.max_entity_seeds),
            max_tag_seeds: env_usize("MAX_TAG_SEEDS", default.max_tag_seeds),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RecallConfig {
    pub target_total: usize,
    pub os_lane_quota: usize,
    pub graph_lane_quota: usize,
    pub mmr_lambda: f64,
    pub os_bm25_weight: f64,
    pub os_cosine_weight: f64,
    pub graph_walk_length: u32,
    pub graph_walks_per_node: u32,
    pub graph_cosine_min: f64,
    pub graph_cosine_max: f64,
}

impl Default for RecallConfig {
    fn default() -> Self {
        Self {
            target_total: 100,
            os_lane_quota: 70,
            graph_lane_quota: 30,
            mmr_lambda: 0.7,
            os_bm25_weight: 0.5,
            os_cosine_weight: 0.5,
            graph_walk_length: 7,
            graph_walks_per_node: 50,
            graph_cosine_min: 0.1,
            graph_cosine_max: 0.9,
        }
    }
}

impl RecallConfig {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            target_total: env_usize("TARGET_TOTAL_RECOMMENDATIONS", default.target_total),
            os_lane_quota: env_usize("OS_LANE_QUOTA", default.os_lane_quota),
            graph_lane_quota: env_usize("GRAPH_LANE_QUOTA", default.graph_lane_quota),
            mmr_lambda: env_f64("MMR_LAMBDA", default.mmr_lambda),
            os_bm25_weight: env_f64("OS_BM25_WEIGHT", default.os_bm25_weight),
            os_cosine_weight: env_f64("OS_COSINE_WEIGHT", default.os_cosine_weight),
            graph_walk_length: env_u32("GRAPH_WALK_LENGTH", default.graph_walk_length),
            graph_walks_per_node: env_u32("GRAPH_WALKS_PER_NODE", default.graph_walks_per_node),
            graph_cosine_min: env_f64("GRAPH_COSINE_MIN", default.graph_cosine_min),
            graph_cosine_max: env_f64("GRAPH_COSINE_MAX", default.graph_cosine_max),
        }
    }
}

fn env_i64(key: &str, default: i64) -> i64 {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_f64(key: &str, default: f64) -> f64 {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_config_defaults_match_spec() {
        let c = SeedConfig::default();
        assert_eq!(c.history_depth, 50);
        assert_eq!(c.recency_half_life_days, 21.0);
        assert_eq!((c.max_topic_seeds, c.max_entity_seeds, c.max_tag_seeds), (5, 15, 20));
    }

    #[test]
    fn recall_config_defaults_match_spec() {
        let c = RecallConfig::default();
        assert_eq!(c.target_total, 100);
        assert_eq!((c.os_lane_quota, c.graph_lane_quota), (70, 30));
        assert_eq!(c.mmr_lambda, 0.7);
    }
}
