//! Maximal Marginal Relevance: a generic, pure reranker shared by both
//! recall lanes and the final blend. Operates on indices into a caller-
//! owned relevance/similarity model so it never has to know what a
//! "document" is.

/// Greedily select up to `limit` indices out of `0..relevances.len()`,
/// maximizing `lambda * relevance - (1 - lambda) * max_similarity_to_selected`
/// at each step. Scanning candidates in ascending index order and keeping
/// only strictly-greater scores makes the lower original index win ties.
pub fn mmr_select(
    relevances: &[f64],
    similarity: impl Fn(usize, usize) -> f64,
    lambda: f64,
    limit: usize,
) -> Vec<usize> {
    let n = relevances.len();
    let limit = limit.min(n);
    let mut selected: Vec<usize> = Vec::with_capacity(limit);
    let mut remaining: Vec<usize> = (0..n).collect();

    while selected.len() < limit && !remaining.is_empty() {
        let mut best_pos = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (pos, &candidate) in remaining.iter().enumerate() {
            let max_sim = selected
                .iter()
                .map(|&s| similarity(candidate, s))
                .fold(0.0_f64, f64::max);
            let score = lambda * relevances[candidate] - (1.0 - lambda) * max_sim;
            if score > best_score {
                best_score = score;
                best_pos = pos;
            }
        }
        selected.push(remaining.remove(best_pos));
    }
    selected
}

/// Jaccard similarity over two canonical-name sets (entity/tag union), as
/// used by both recall lanes and the final blend.
pub fn jaccard(a: &std::collections::HashSet<String>, b: &std::collections::HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count() as f64;
    let union = a.union(b).count() as f64;
    if union == 0.0 {
        0.0
    } else {
        intersection / union
    }
}

/// Min-max normalize to `[0, 1]`. A flat input (max == min) normalizes to
/// all zeros rather than dividing by zero — a tie carries no signal.
pub fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() || (max - min).abs() < f64::EPSILON {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - min) / (max - min)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_first_two_in_original_order_when_similarity_is_zero() {
        let relevances = [0.9, 0.9, 0.5];
        let selected = mmr_select(&relevances, |_, _| 0.0, 0.7, 2);
        assert_eq!(selected, vec![0, 1]);
    }

    #[test]
    fn lambda_one_equals_sort_desc_by_relevance() {
        let relevances = [0.2, 0.9, 0.5, 0.9];
        let selected = mmr_select(&relevances, |_, _| 1.0, 1.0, 4);
        assert_eq!(selected, vec![1, 3, 2, 0]);
    }

    #[test]
    fn lambda_zero_minimizes_max_similarity_to_selected() {
        // Item 0 and 1 are near-identical; item 2 is distinct from both.
        let relevances = [1.0, 1.0, 1.0];
        let sim = |a: usize, b: usize| -> f64 {
            match (a.min(b), a.max(b)) {
                (0, 1) => 1.0,
                _ => 0.0,
            }
        };
        let selected = mmr_select(&relevances, sim, 0.0, 2);
        // First pick has no selected set yet, so max_sim=0 for all: lowest index wins.
        assert_eq!(selected[0], 0);
        // Second pick avoids item 1 (similarity 1.0 to item 0) in favor of item 2.
        assert_eq!(selected[1], 2);
    }

    #[test]
    fn output_length_never_exceeds_limit_or_input_size() {
        let relevances = [0.1, 0.2];
        let selected = mmr_select(&relevances, |_, _| 0.0, 0.5, 10);
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn output_has_no_duplicates() {
        let relevances = [0.5, 0.5, 0.5, 0.5];
        let selected = mmr_select(&relevances, |_, _| 0.0, 0.5, 4);
        let unique: std::collections::HashSet<_> = selected.iter().collect();
        assert_eq!(unique.len(), selected.len());
    }

    #[test]
    fn min_max_normalize_flat_input_yields_zeros() {
        assert_eq!(min_max_normalize(&[5.0, 5.0, 5.0]), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn min_max_normalize_spans_zero_to_one() {
        let normed = min_max_normalize(&[1.0, 2.0, 4.0]);
        assert_eq!(normed[0], 0.0);
        assert_eq!(normed[2], 1.0);
    }

    #[test]
    fn jaccard_of_disjoint_sets_is_zero() {
        let a: std::collections::HashSet<String> = ["x".into()].into_iter().collect();
        let b: std::collections::HashSet<String> = ["y".into()].into_iter().collect();
        assert_eq!(jaccard(&a, &b), 0.0);
    }

    #[test]
    fn jaccard_of_identical_sets_is_one() {
        let a: std::collections::HashSet<String> = ["x".into(), "y".into()].into_iter().collect();
        assert_eq!(jaccard(&a, &a.clone()), 1.0);
    }
}
