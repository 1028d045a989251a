//! Weighted random walk over a temporary undirected projection of
//! Video ∪ Entity ∪ Tag, run in-process per the Design Notes: no
//! graph-analytics plug-in is assumed, so the "projection" is an
//! adjacency multiset fetched for the query's seed neighborhood and
//! discarded once the walk completes.

use std::collections::HashMap;

use rand::Rng;
use serde_json::{json, Value};

use crate::client::{GraphClient, Statement};
use crate::error::GraphResult;

#[derive(Debug, Clone)]
pub struct GraphEdge {
    pub a_id: String,
    pub a_is_video: bool,
    pub b_id: String,
    pub b_is_video: bool,
    pub weight: f64,
}

/// Undirected adjacency: node id -> neighbors as (neighbor_id, is_video, weight).
pub type Adjacency = HashMap<String, Vec<(String, bool, f64)>>;

pub fn build_adjacency(edges: &[GraphEdge]) -> Adjacency {
    let mut adj: Adjacency = HashMap::new();
    for e in edges {
        adj.entry(e.a_id.clone())
            .or_default()
            .push((e.b_id.clone(), e.b_is_video, e.weight.max(0.0).max(f64::MIN_POSITIVE)));
        adj.entry(e.b_id.clone())
            .or_default()
            .push((e.a_id.clone(), e.a_is_video, e.weight.max(0.0).max(f64::MIN_POSITIVE)));
    }
    adj
}

/// Sample one neighbor of `node`, proportional to edge weight. Returns
/// `None` if the node has no neighbors (dead end; the walk stops early).
fn sample_next<R: Rng + ?Sized>(
    adjacency: &Adjacency,
    node: &str,
    rng: &mut R,
) -> Option<(String, bool)> {
    let neighbors = adjacency.get(node)?;
    if neighbors.is_empty() {
        return None;
    }
    let total: f64 = neighbors.iter().map(|(_, _, w)| w).sum();
    if total <= 0.0 {
        let (id, is_video, _) = &neighbors[rng.random_range(0..neighbors.len())];
        return Some((id.clone(), *is_video));
    }
    let mut pick = rng.random_range(0.0..total);
    for (id, is_video, w) in neighbors {
        if pick < *w {
            return Some((id.clone(), *is_video));
        }
        pick -= w;
    }
    let (id, is_video, _) = neighbors.last().unwrap();
    Some((id.clone(), *is_video))
}

/// Run `walks_per_node` independent walks of `walk_length` steps from each
/// seed, aggregating visit counts over Video nodes encountered along the
/// way (the seeds themselves are Entity/Tag and are never counted).
pub fn weighted_random_walk<R: Rng + ?Sized>(
    adjacency: &Adjacency,
    seeds: &[String],
    walks_per_node: u32,
    walk_length: u32,
    rng: &mut R,
) -> HashMap<String, u32> {
    let mut visits: HashMap<String, u32> = HashMap::new();
    for seed in seeds {
        for _ in 0..walks_per_node {
            let mut current = seed.clone();
            for _ in 0..walk_length {
                match sample_next(adjacency, &current, rng) {
                    Some((next, is_video)) => {
                        if is_video {
                            *visits.entry(next.clone()).or_insert(0) += 1;
                        }
                        current = next;
                    }
                    None => break,
                }
            }
        }
    }
    visits
}

impl GraphClient {
    /// Fetch the edges reachable from `seed_ids` within `max_hops` of
    /// `HAS_ENTITY`/`HAS_TAG` relationships, in either direction. The
    /// result is consumed by [`build_adjacency`] and then discarded — no
    /// named graph projection is created in the store.
    pub async fn fetch_walk_neighborhood(
        &self,
        seed_ids: &[String],
        max_hops: usize,
    ) -> GraphResult<Vec<GraphEdge>> {
        if seed_ids.is_empty() {
            return Ok(Vec::new());
        }
        let cypher = format!(
            "MATCH (seed) WHERE seed.id IN $seed_ids AND (seed:Entity OR seed:Tag) \
             MATCH p = (seed)-[:HAS_ENTITY|HAS_TAG*1..{max_hops}]-(other) \
             UNWIND relationships(p) AS rel \
             WITH DISTINCT rel, startNode(rel) AS a, endNode(rel) AS b \
             RETURN a.id AS a_id, labels(a) AS a_labels, b.id AS b_id, labels(b) AS b_labels, \
                    coalesce(rel.importance, rel.weight, rel.prominence, 1.0) AS w"
        );
        let rows = self
            .run(vec![Statement::new(cypher, json!({ "seed_ids": seed_ids }))])
            .await?;

        Ok(rows
            .into_iter()
            .flatten()
            .filter_map(row_to_edge)
            .collect())
    }
}

fn row_to_edge(row: Value) -> Option<GraphEdge> {
    let cols = row.as_array()?;
    let a_id = cols.first()?.as_str()?.to_string();
    let a_labels = cols.get(1)?.as_array()?;
    let b_id = cols.get(2)?.as_str()?.to_string();
    let b_labels = cols.get(3)?.as_array()?;
    let weight = cols.get(4)?.as_f64()?;
    Some(GraphEdge {
        a_id,
        a_is_video: labels_contain_video(a_labels),
        b_id,
        b_is_video: labels_contain_video(b_labels),
        weight,
    })
}

fn labels_contain_video(labels: &[Value]) -> bool {
    labels.iter().any(|l| l.as_str() == Some("Video"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn edge(a: &str, a_video: bool, b: &str, b_video: bool, w: f64) -> GraphEdge {
        GraphEdge { a_id: a.into(), a_is_video: a_video, b_id: b.into(), b_is_video: b_video, weight: w }
    }

    #[test]
    fn single_path_walk_always_visits_the_only_video() {
        let edges = vec![edge("tag1", false, "v1", true, 1.0)];
        let adj = build_adjacency(&edges);
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let visits = weighted_random_walk(&adj, &["tag1".to_string()], 5, 3, &mut rng);
        assert_eq!(visits.get("v1"), Some(&5));
    }

    #[test]
    fn dead_end_seed_yields_no_visits() {
        let adj = build_adjacency(&[]);
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let visits = weighted_random_walk(&adj, &["lonely".to_string()], 10, 7, &mut rng);
        assert!(visits.is_empty());
    }

    #[test]
    fn heavier_edge_is_favored_over_many_samples() {
        let edges = vec![
            edge("tag1", false, "v_heavy", true, 99.0),
            edge("tag1", false, "v_light", true, 1.0),
        ];
        let adj = build_adjacency(&edges);
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let visits = weighted_random_walk(&adj, &["tag1".to_string()], 200, 1, &mut rng);
        assert!(visits.get("v_heavy").copied().unwrap_or(0) > visits.get("v_light").copied().unwrap_or(0));
    }
}
