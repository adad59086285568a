//! Deterministic top-N ranking
//!
//! Every ranked facet sorts with the same explicit tuple comparator:
//! score descending, then original input index ascending. The result does
//! not depend on the sort algorithm's stability.

use std::cmp::Ordering;

/// Rank `items` by `score` (higher first) and keep at most `limit`.
///
/// Ties keep their input order. NaN scores compare via `total_cmp`, but
/// callers only pass finite scores.
pub fn top_by_score<T>(items: Vec<T>, limit: usize, score: impl Fn(&T) -> f64) -> Vec<T> {
    let mut keyed: Vec<(f64, usize, T)> = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| (score(&item), index, item))
        .collect();

    keyed.sort_by(|a, b| compare_ranked((a.0, a.1), (b.0, b.1)));
    keyed.truncate(limit);
    keyed.into_iter().map(|(_, _, item)| item).collect()
}

/// `(score desc, index asc)`
pub fn compare_ranked(a: (f64, usize), b: (f64, usize)) -> Ordering {
    b.0.total_cmp(&a.0).then(a.1.cmp(&b.1))
}
