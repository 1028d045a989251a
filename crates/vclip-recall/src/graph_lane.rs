//! Graph-lane: weighted random walk over a temporary Video∪Entity∪Tag
//! projection, seeded from the user's recent catalog, hydrated back
//! through the search index for embeddings, then lane-local MMR.

use std::collections::HashSet;

use vclip_graph::{build_adjacency, weighted_random_walk, GraphClient};
use vclip_search::SearchClient;

use crate::config::RecallConfig;
use crate::error::RecallResult;
use crate::mmr::{jaccard, min_max_normalize, mmr_select};
use crate::os_lane::cosine;
use crate::seed::SeedBundle;
use crate::Candidate;

/// Run the Graph-lane: seed ids are Entity ∪ Tag catalog ids (ordered,
/// deduped), walked over the ephemeral projection, excluding history and
/// the OS-lane's top `2 * os_lane_quota` video ids.
pub async fn run_graph_lane(
    graph: &GraphClient,
    search: &SearchClient,
    seeds: &SeedBundle,
    history_ids: &[String],
    os_exclude: &[String],
    config: &RecallConfig,
) -> RecallResult<Vec<Candidate>> {
    let mut seed_ids = Vec::new();
    let mut seen = HashSet::new();
    for s in seeds.entities.iter().chain(seeds.tags.iter()) {
        if seen.insert(s.id.clone()) {
            seed_ids.push(s.id.clone());
        }
    }
    if seed_ids.is_empty() {
        return Ok(Vec::new());
    }

    let edges = graph.fetch_walk_neighborhood(&seed_ids, 2).await?;
    let adjacency = build_adjacency(&edges);

    let mut rng = rand::rng();
    let visits = weighted_random_walk(
        &adjacency,
        &seed_ids,
        config.graph_walks_per_node,
        config.graph_walk_length,
        &mut rng,
    );

    let exclude: HashSet<&str> =
        history_ids.iter().chain(os_exclude.iter()).map(|s| s.as_str()).collect();

    let mut candidate_ids: Vec<String> =
        visits.keys().filter(|id| !exclude.contains(id.as_str())).cloned().collect();
    // Deterministic order for downstream tie-breaks: by visit count desc,
    // then id asc.
    candidate_ids.sort_by(|a, b| {
        visits[b].cmp(&visits[a]).then_with(|| a.cmp(b))
    });

    if candidate_ids.is_empty() {
        return Ok(Vec::new());
    }

    let hydrated = search.hydrate_videos(&candidate_ids).await?;
    let hydrated_by_id: std::collections::HashMap<String, vclip_search::CandidateHit> =
        hydrated.into_iter().map(|h| (h.video_id.clone(), h)).collect();

    let has_user_vector = seeds.user_embedding.is_some();
    let mut scored = Vec::new();
    for id in &candidate_ids {
        let Some(hit) = hydrated_by_id.get(id) else { continue };
        let cos = seeds.user_embedding.as_deref().map_or(0.0, |u| cosine(u, &hit.embedding));
        if has_user_vector && !(config.graph_cosine_min..=config.graph_cosine_max).contains(&cos) {
            continue;
        }
        let tag_set: HashSet<String> = hit
            .entities
            .iter()
            .chain(hit.tags.iter())
            .map(|d| d.canonical_name.clone())
            .collect();
        scored.push((id.clone(), cos, tag_set));
    }
    if scored.is_empty() {
        return Ok(Vec::new());
    }

    // Lane score is the normalized cosine, mirroring the OS-lane's
    // min-max treatment of its own relevance signal.
    let raw: Vec<f64> = scored.iter().map(|(_, c, _)| *c).collect();
    let relevances = min_max_normalize(&raw);
    let shortlist_size = 2 * config.graph_lane_quota;
    let selected = mmr_select(
        &relevances,
        |a, b| jaccard(&scored[a].2, &scored[b].2),
        config.mmr_lambda,
        shortlist_size,
    );

    Ok(selected
        .into_iter()
        .map(|i| Candidate {
            video_id: scored[i].0.clone(),
            lane: crate::Lane::Graph,
            score: relevances[i],
            canonical_names: scored[i].2.clone(),
        })
        .collect())
}
