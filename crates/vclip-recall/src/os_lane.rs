//! OS-lane: lexical (BM25) + vector recall over the `videos` index,
//! followed by a lane-local MMR shortlist.

use std::collections::HashSet;

use vclip_search::{build_query_text, CandidateHit, SearchClient};

use crate::config::RecallConfig;
use crate::error::RecallResult;
use crate::mmr::{jaccard, min_max_normalize, mmr_select};
use crate::seed::SeedBundle;
use crate::Candidate;

pub(crate) fn cosine(a: &[f32], b: &[f32]) -> f64 {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| *x as f64 * *y as f64).sum();
    let na = a.iter().map(|x| *x as f64 * *x as f64).sum::<f64>().sqrt();
    let nb = b.iter().map(|x| *x as f64 * *x as f64).sum::<f64>().sqrt();
    if na <= 0.0 || nb <= 0.0 {
        0.0
    } else {
        dot / (na * nb)
    }
}

fn canonical_set(hit: &CandidateHit) -> HashSet<String> {
    hit.entities
        .iter()
        .chain(hit.tags.iter())
        .map(|d| d.canonical_name.clone())
        .collect()
}

/// Run the OS-lane: build the BM25 query from the seed bundle, issue the
/// single candidate search, score and MMR-rerank, and return up to
/// `2 * quota` candidates.
pub async fn run_os_lane(
    search: &SearchClient,
    seeds: &SeedBundle,
    history_ids: &[String],
    config: &RecallConfig,
) -> RecallResult<Vec<Candidate>> {
    let tags: Vec<String> = seeds.tags.iter().map(|s| s.canonical_name.clone()).collect();
    let entities: Vec<String> = seeds.entities.iter().map(|s| s.canonical_name.clone()).collect();
    let topics: Vec<String> = seeds.topics.iter().map(|s| s.canonical_name.clone()).collect();
    let query_text = build_query_text(&tags, &entities, &topics);

    let hits = search.candidate_search(&query_text, history_ids).await?;
    if hits.is_empty() {
        return Ok(Vec::new());
    }

    let bm25_raw: Vec<f64> = hits.iter().map(|h| h.bm25_score).collect();
    let bm25_norm = min_max_normalize(&bm25_raw);

    let cosine_raw: Vec<f64> = hits
        .iter()
        .map(|h| seeds.user_embedding.as_deref().map_or(0.0, |u| cosine(u, &h.embedding)))
        .collect();
    let cosine_norm = if seeds.user_embedding.is_some() {
        min_max_normalize(&cosine_raw)
    } else {
        vec![0.0; hits.len()]
    };

    let mut scored: Vec<(f64, CandidateHit)> = hits
        .into_iter()
        .enumerate()
        .map(|(i, hit)| {
            let score = config.os_cosine_weight * cosine_norm[i] + config.os_bm25_weight * bm25_norm[i];
            (score, hit)
        })
        .collect();
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    let pool_size = (4 * config.os_lane_quota).min(scored.len());
    scored.truncate(pool_size);

    let relevances: Vec<f64> = scored.iter().map(|(s, _)| *s).collect();
    let tag_sets: Vec<HashSet<String>> = scored.iter().map(|(_, h)| canonical_set(h)).collect();

    let shortlist_size = 2 * config.os_lane_quota;
    let selected = mmr_select(
        &relevances,
        |a, b| jaccard(&tag_sets[a], &tag_sets[b]),
        config.mmr_lambda,
        shortlist_size,
    );

    Ok(selected
        .into_iter()
        .map(|i| Candidate {
            video_id: scored[i].1.video_id.clone(),
            lane: crate::Lane::Os,
            score: scored[i].0,
            canonical_names: tag_sets[i].clone(),
        })
        .collect())
}
