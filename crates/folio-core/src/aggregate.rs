//! Weighted statistics over normalized records
//!
//! All functions are sum-based and accept empty input, returning neutral
//! values instead of dividing by zero.

use crate::numeric::percent_of;

/// `Σ(weight * change) / Σ(weight)`, or `0.0` when the total weight is not
/// positive.
///
/// Records with zero weight are still visited; they simply contribute
/// nothing to either sum.
pub fn weighted_change<T>(
    records: &[T],
    weight: impl Fn(&T) -> f64,
    change: impl Fn(&T) -> f64,
) -> f64 {
    let (weighted, total) = records.iter().fold((0.0, 0.0), |(weighted, total), record| {
        let w = weight(record);
        (weighted + w * change(record), total + w)
    });

    if total <= 0.0 {
        return 0.0;
    }

    weighted / total
}

/// Sum of a metric across records.
pub fn total<T>(records: &[T], metric: impl Fn(&T) -> f64) -> f64 {
    records.iter().map(metric).sum()
}

/// Percentage share of each value against the given total. All shares are
/// `0.0` when the total is not positive.
pub fn shares(values: &[f64], total: f64) -> Vec<f64> {
    values.iter().map(|v| percent_of(*v, total)).collect()
}

/// 24h volume over market cap, `0.0` for a non-positive market cap.
pub fn turnover_ratio(volume_24h: f64, market_cap: f64) -> f64 {
    if market_cap > 0.0 {
        volume_24h / market_cap
    } else {
        0.0
    }
}

/// Thin a series to roughly `target` points by keeping every `stride`-th
/// point, `stride = max(1, len / target)`. The final point is always kept.
pub fn downsample<T: Clone>(points: &[T], target: usize, same: impl Fn(&T, &T) -> bool) -> Vec<T> {
    if points.len() <= target {
        return points.to_vec();
    }

    let stride = (points.len() / target.max(1)).max(1);
    let mut sampled: Vec<T> = points.iter().step_by(stride).cloned().collect();

    if let Some(last) = points.last() {
        let already_kept = sampled.last().is_some_and(|kept| same(kept, last));
        if !already_kept {
            sampled.push(last.clone());
        }
    }

    sampled
}
