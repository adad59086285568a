//! Safe numeric and text coercion shared by every normalizer
//!
//! Upstream numbers arrive as `Option<f64>`. Nothing non-finite is allowed
//! past normalization, so all fallbacks route through here.

/// Finite value or `0.0`.
pub fn finite(value: Option<f64>) -> f64 {
    finite_or(value, 0.0)
}

/// Finite value or the given fallback.
pub fn finite_or(value: Option<f64>, fallback: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => fallback,
    }
}

/// Non-negative integer count. Negative, fractional or non-finite input is
/// truncated toward zero.
pub fn count(value: Option<f64>) -> u64 {
    let v = finite(value);
    if v <= 0.0 {
        0
    } else {
        v.trunc() as u64
    }
}

/// Owned text or the given fallback.
pub fn text_or(value: Option<&str>, fallback: &str) -> String {
    value.unwrap_or(fallback).to_string()
}

/// Collapse whitespace runs to single spaces and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `part / total * 100`, or `0.0` when the total is not positive.
pub fn percent_of(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        part / total * 100.0
    } else {
        0.0
    }
}
