//! DeFi analytics pipeline
//!
//! Protocol and chain normalization, TVL-weighted headline figures, chain
//! dominance, category breakdown and momentum signal scoring over DeFiLlama
//! payloads.

use std::collections::HashMap;

use chrono::Utc;

use crate::aggregate::{downsample, shares, total, weighted_change};
use crate::models::*;
use crate::numeric::{finite, percent_of, text_or};
use crate::ranking::top_by_score;
use crate::raw::{LlamaChain, LlamaHistoricalPoint, LlamaProtocol};

pub const TOP_CHAIN_LIMIT: usize = 8;
pub const CATEGORY_LIMIT: usize = 6;
pub const PROTOCOL_BOARD_LIMIT: usize = 8;
pub const MOMENTUM_SIGNAL_LIMIT: usize = 3;

/// Minimum TVL (USD) for a protocol to be considered for momentum
pub const MOMENTUM_MIN_TVL_USD: f64 = 250_000_000.0;
const BREAKOUT_CHANGE_7D: f64 = 20.0;
const EXPANSION_CHANGE_7D: f64 = 10.0;

/// Most recent history points considered before thinning
const HISTORY_WINDOW: usize = 150;
const HISTORY_POINTS: usize = 90;

/// Raw payloads fetched for one DeFi snapshot
#[derive(Debug, Clone, Default)]
pub struct DefiPayloads {
    pub protocols: Vec<LlamaProtocol>,
    pub chains: Vec<LlamaChain>,
    pub tvl_history: Vec<LlamaHistoricalPoint>,
}

/// Coerce, filter and rank protocols by TVL descending.
///
/// Protocols with an empty name, a non-positive TVL or a category listed in
/// `excluded_categories` are dropped.
pub fn normalize_protocols(
    protocols: Vec<LlamaProtocol>,
    excluded_categories: &[String],
) -> Vec<NormalizedProtocol> {
    let kept: Vec<NormalizedProtocol> = protocols
        .into_iter()
        .map(|protocol| NormalizedProtocol {
            id: protocol.id,
            slug: protocol.slug.unwrap_or_default(),
            name: text_or(protocol.name.as_deref(), ""),
            category: text_or(protocol.category.as_deref(), "Other"),
            chains: protocol
                .chains
                .unwrap_or_default()
                .into_iter()
                .filter_map(|chain| chain.as_str().map(String::from))
                .collect(),
            tvl_usd: finite(protocol.tvl),
            change_1d: finite(protocol.change_1d),
            change_7d: finite(protocol.change_7d),
            url: protocol.url,
        })
        .filter(|p| {
            !p.name.is_empty()
                && p.tvl_usd > 0.0
                && !excluded_categories.iter().any(|c| c == &p.category)
        })
        .collect();

    top_by_score(kept, usize::MAX, |p| p.tvl_usd)
}

pub fn headline_stats(protocols: &[NormalizedProtocol]) -> DefiHeadlineStats {
    DefiHeadlineStats {
        total_tvl_usd: total(protocols, |p| p.tvl_usd),
        weighted_change_1d: weighted_change(protocols, |p| p.tvl_usd, |p| p.change_1d),
        weighted_change_7d: weighted_change(protocols, |p| p.tvl_usd, |p| p.change_7d),
        active_protocols: protocols.len(),
    }
}

/// Largest chains by TVL with their share of all valid chains' TVL
pub fn build_top_chains(chains: Vec<LlamaChain>) -> Vec<DefiChainSnapshot> {
    let valid: Vec<(String, Option<String>, f64)> = chains
        .into_iter()
        .map(|chain| {
            (
                text_or(chain.name.as_deref(), ""),
                chain.token_symbol,
                finite(chain.tvl),
            )
        })
        .filter(|(name, _, tvl)| !name.is_empty() && *tvl > 0.0)
        .collect();

    let total_tvl = total(&valid, |c| c.2);
    let ranked = top_by_score(valid, TOP_CHAIN_LIMIT, |c| c.2);
    let tvls: Vec<f64> = ranked.iter().map(|c| c.2).collect();

    ranked
        .into_iter()
        .zip(shares(&tvls, total_tvl))
        .map(|((name, token_symbol, tvl_usd), dominance)| DefiChainSnapshot {
            name,
            token_symbol,
            tvl_usd,
            dominance,
        })
        .collect()
}

/// Group protocols by category, largest categories first
pub fn build_category_breakdown(
    protocols: &[NormalizedProtocol],
    total_tvl_usd: f64,
) -> Vec<DefiCategorySnapshot> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut grouped: Vec<DefiCategorySnapshot> = Vec::new();

    for protocol in protocols {
        let slot = *index.entry(protocol.category.as_str()).or_insert_with(|| {
            grouped.push(DefiCategorySnapshot {
                name: protocol.category.clone(),
                tvl_usd: 0.0,
                share: 0.0,
                protocol_count: 0,
            });
            grouped.len() - 1
        });

        let entry = &mut grouped[slot];
        entry.tvl_usd += protocol.tvl_usd;
        entry.protocol_count += 1;
    }

    for category in &mut grouped {
        category.share = percent_of(category.tvl_usd, total_tvl_usd);
    }

    top_by_score(grouped, CATEGORY_LIMIT, |c| c.tvl_usd)
}

pub fn build_protocol_board(protocols: &[NormalizedProtocol]) -> Vec<DefiProtocolSnapshot> {
    protocols
        .iter()
        .take(PROTOCOL_BOARD_LIMIT)
        .map(|p| DefiProtocolSnapshot {
            id: p.id.clone(),
            name: p.name.clone(),
            category: p.category.clone(),
            tvl_usd: p.tvl_usd,
            change_1d: p.change_1d,
            change_7d: p.change_7d,
            chain_count: p.chains.len(),
            url: p.url.clone(),
        })
        .collect()
}

pub fn is_momentum_eligible(protocol: &NormalizedProtocol) -> bool {
    protocol.tvl_usd >= MOMENTUM_MIN_TVL_USD && protocol.change_7d > 0.0
}

/// `change7d * log10(max(tvl, 1))`
pub fn momentum_score(tvl_usd: f64, change_7d: f64) -> f64 {
    change_7d * tvl_usd.max(1.0).log10()
}

pub fn momentum_tier(change_7d: f64) -> MomentumTier {
    if change_7d >= BREAKOUT_CHANGE_7D {
        MomentumTier::Breakout
    } else if change_7d >= EXPANSION_CHANGE_7D {
        MomentumTier::Expansion
    } else {
        MomentumTier::Steady
    }
}

fn narrative(tier: MomentumTier) -> &'static str {
    match tier {
        MomentumTier::Breakout => "Breakout week with strong TVL inflows.",
        MomentumTier::Expansion => "Solid expansion trend with healthy momentum.",
        MomentumTier::Steady => "Steady accumulation and constructive flow.",
    }
}

pub fn build_momentum_signals(protocols: &[NormalizedProtocol]) -> Vec<DefiMomentumSignal> {
    let eligible: Vec<DefiMomentumSignal> = protocols
        .iter()
        .filter(|p| is_momentum_eligible(p))
        .map(|p| {
            let tier = momentum_tier(p.change_7d);
            DefiMomentumSignal {
                id: p.id.clone(),
                name: p.name.clone(),
                tvl_usd: p.tvl_usd,
                change_7d: p.change_7d,
                score: momentum_score(p.tvl_usd, p.change_7d),
                tier,
                narrative: narrative(tier).to_string(),
            }
        })
        .collect();

    top_by_score(eligible, MOMENTUM_SIGNAL_LIMIT, |s| s.score)
}

/// Valid points from the most recent window, timestamps in milliseconds
pub fn build_tvl_history(history: Vec<LlamaHistoricalPoint>) -> Vec<DefiTvlPoint> {
    let points: Vec<DefiTvlPoint> = history
        .into_iter()
        .filter_map(|point| match (point.date, point.tvl) {
            (Some(date), Some(tvl)) if date.is_finite() && tvl.is_finite() && tvl > 0.0 => {
                Some(DefiTvlPoint {
                    timestamp: (date * 1000.0) as i64,
                    tvl_usd: tvl,
                })
            }
            _ => None,
        })
        .collect();

    let window = &points[points.len().saturating_sub(HISTORY_WINDOW)..];
    downsample(window, HISTORY_POINTS, |a, b| a.timestamp == b.timestamp)
}

/// Assemble a [`DefiAnalyticsData`] snapshot from fetched payloads.
///
/// An empty protocol set is not an error; it yields zeroed headline figures
/// and empty facets.
pub fn assemble_defi_analytics(
    payloads: DefiPayloads,
    excluded_categories: &[String],
) -> DefiAnalyticsData {
    let received = payloads.protocols.len();
    let protocols = normalize_protocols(payloads.protocols, excluded_categories);

    tracing::debug!(
        received,
        kept = protocols.len(),
        "Normalized DeFi protocols"
    );

    let headline = headline_stats(&protocols);

    DefiAnalyticsData {
        tvl_history: build_tvl_history(payloads.tvl_history),
        top_chains: build_top_chains(payloads.chains),
        categories: build_category_breakdown(&protocols, headline.total_tvl_usd),
        protocol_board: build_protocol_board(&protocols),
        momentum_signals: build_momentum_signals(&protocols),
        headline,
        generated_at: Utc::now(),
    }
}
