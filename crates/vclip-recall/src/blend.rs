//! Final blend: unify the two lane shortlists with quota backfill, then
//! re-run MMR once more over the combined pool.

use crate::config::RecallConfig;
use crate::mmr::{jaccard, mmr_select};
use crate::{Candidate, Lane};

/// Backfill shortfall from one lane's quota using the other lane's
/// shortlist, never exceeding what that lane actually produced, then
/// blend with a final MMR pass and return the first `target_total`.
pub fn blend(os_shortlist: Vec<Candidate>, graph_shortlist: Vec<Candidate>, config: &RecallConfig) -> Vec<Candidate> {
    let os_take = config.os_lane_quota.min(os_shortlist.len());
    let graph_take = config.graph_lane_quota.min(graph_shortlist.len());

    let os_shortfall = config.os_lane_quota.saturating_sub(os_take);
    let graph_shortfall = config.graph_lane_quota.saturating_sub(graph_take);

    let os_extra = (graph_shortlist.len() - graph_take).min(os_shortfall);
    let graph_extra = (os_shortlist.len() - os_take).min(graph_shortfall);

    let mut pool: Vec<Candidate> = Vec::new();
    pool.extend(os_shortlist.iter().take(os_take + graph_extra).cloned());
    pool.extend(graph_shortlist.iter().take(graph_take + os_extra).cloned());

    if pool.is_empty() {
        return Vec::new();
    }

    let relevances: Vec<f64> = pool.iter().map(|c| c.score).collect();
    let selected = mmr_select(
        &relevances,
        |a, b| jaccard(&pool[a].canonical_names, &pool[b].canonical_names),
        config.mmr_lambda,
        config.target_total,
    );

    selected.into_iter().map(|i| pool[i].clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn candidate(id: &str, lane: Lane, score: f64) -> Candidate {
        Candidate { video_id: id.to_string(), lane, score, canonical_names: HashSet::new() }
    }

    #[test]
    fn blend_never_exceeds_target_total() {
        let os: Vec<Candidate> = (0..200).map(|i| candidate(&format!("os{i}"), Lane::Os, 1.0)).collect();
        let graph: Vec<Candidate> = (0..200).map(|i| candidate(&format!("g{i}"), Lane::Graph, 1.0)).collect();
        let config = RecallConfig { target_total: 100, ..RecallConfig::default() };
        let out = blend(os, graph, &config);
        assert!(out.len() <= 100);
    }

    #[test]
    fn backfill_never_exceeds_other_lanes_supply() {
        let os: Vec<Candidate> = (0..5).map(|i| candidate(&format!("os{i}"), Lane::Os, 1.0)).collect();
        let graph: Vec<Candidate> = (0..200).map(|i| candidate(&format!("g{i}"), Lane::Graph, 1.0)).collect();
        let config = RecallConfig { target_total: 100, os_lane_quota: 70, graph_lane_quota: 30, ..RecallConfig::default() };
        let out = blend(os, graph, &config);
        // os supplied only 5; graph can backfill at most up to its own supply, total bounded by what both produced.
        assert!(out.len() <= 100);
        let os_count = out.iter().filter(|c| c.video_id.starts_with("os")).count();
        assert_eq!(os_count, 5);
    }

    #[test]
    fn empty_lanes_yield_empty_blend() {
        let config = RecallConfig::default();
        assert!(blend(Vec::new(), Vec::new(), &config).is_empty());
    }
}
