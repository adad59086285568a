//! Snapshot models handed to the presentation layer
//!
//! Every type here is a plain serializable value. Snapshots are built fresh on
//! each pipeline call and never mutated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Crypto Dashboard
// =============================================================================

/// A tracked coin after normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedCoin {
    pub id: String,

    /// Uppercased ticker (e.g. "BTC")
    pub symbol: String,

    pub name: String,
    pub current_price: f64,
    pub market_cap: f64,
    pub total_volume: f64,
    pub high_24h: f64,
    pub low_24h: f64,

    /// 24h price change in percent
    pub change_24h: f64,

    /// 7d price change in percent
    pub change_7d: f64,

    /// Hourly prices over the last week, finite values only
    pub sparkline_7d: Vec<f64>,

    pub last_updated: String,
}

/// Market-wide figures from the global endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSnapshot {
    pub active_cryptocurrencies: u64,
    pub total_market_cap_usd: f64,
    pub total_volume_usd: f64,
    pub btc_dominance: f64,
}

/// Market-cap weighted price change across the tracked coins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketPulse {
    pub weighted_change_24h: f64,
    pub weighted_change_7d: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    pub price: f64,
}

/// Direction of large-wallet flow inferred from turnover and momentum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WhaleSentiment {
    Accumulation,
    Distribution,
    Rotation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalIntensity {
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhaleSignal {
    pub id: String,
    pub symbol: String,
    pub sentiment: WhaleSentiment,
    pub intensity: SignalIntensity,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoDashboardData {
    pub coins: Vec<TrackedCoin>,
    pub global: GlobalSnapshot,
    pub market_pulse: MarketPulse,
    pub bitcoin_history: Vec<PricePoint>,
    pub whale_signals: Vec<WhaleSignal>,
    pub generated_at: DateTime<Utc>,
}

// =============================================================================
// DeFi Analytics
// =============================================================================

/// A protocol that survived filtering, ordered by TVL descending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedProtocol {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub category: String,
    pub chains: Vec<String>,
    pub tvl_usd: f64,
    pub change_1d: f64,
    pub change_7d: f64,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefiHeadlineStats {
    pub total_tvl_usd: f64,
    pub weighted_change_1d: f64,
    pub weighted_change_7d: f64,
    pub active_protocols: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefiTvlPoint {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    pub tvl_usd: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefiChainSnapshot {
    pub name: String,
    pub token_symbol: Option<String>,
    pub tvl_usd: f64,

    /// Share of total chain TVL in percent (0-100)
    pub dominance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefiCategorySnapshot {
    pub name: String,
    pub tvl_usd: f64,

    /// Share of total protocol TVL in percent (0-100)
    pub share: f64,

    pub protocol_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefiProtocolSnapshot {
    pub id: String,
    pub name: String,
    pub category: String,
    pub tvl_usd: f64,
    pub change_1d: f64,
    pub change_7d: f64,
    pub chain_count: usize,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefiMomentumSignal {
    pub id: String,
    pub name: String,
    pub tvl_usd: f64,
    pub change_7d: f64,
    pub score: f64,
    pub tier: MomentumTier,
    pub narrative: String,
}

/// Narrative tier picked from the 7d TVL change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MomentumTier {
    /// change7d >= 20
    Breakout,
    /// change7d >= 10
    Expansion,
    Steady,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefiAnalyticsData {
    pub headline: DefiHeadlineStats,
    pub tvl_history: Vec<DefiTvlPoint>,
    pub top_chains: Vec<DefiChainSnapshot>,
    pub categories: Vec<DefiCategorySnapshot>,
    pub protocol_board: Vec<DefiProtocolSnapshot>,
    pub momentum_signals: Vec<DefiMomentumSignal>,
    pub generated_at: DateTime<Utc>,
}

// =============================================================================
// Farcaster Widget
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarcasterUserSnapshot {
    pub fid: u64,
    pub username: String,
    pub display_name: String,
    pub follower_count: u64,
    pub following_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarcasterProfileSnapshot {
    #[serde(flatten)]
    pub user: FarcasterUserSnapshot,
    pub bio: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarcasterCastSnapshot {
    pub hash: String,
    pub text: String,
    pub timestamp: String,
    pub channel: Option<String>,
    pub likes: u64,
    pub recasts: u64,
    pub replies: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeTier {
    Core,
    Follower,
    Following,
}

/// A node positioned in a 0-100 coordinate space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarcasterGraphNode {
    pub id: String,
    pub fid: u64,
    pub username: String,
    pub label: String,
    pub tier: NodeTier,

    /// Visual weight in [0.18, 1], rendering only
    pub influence: f64,

    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarcasterGraphEdge {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarcasterTrendKeyword {
    pub term: String,
    pub mentions: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarcasterWidgetData {
    pub profile: FarcasterProfileSnapshot,
    pub recent_casts: Vec<FarcasterCastSnapshot>,
    pub top_followers: Vec<FarcasterUserSnapshot>,
    pub top_following: Vec<FarcasterUserSnapshot>,
    pub graph_nodes: Vec<FarcasterGraphNode>,
    pub graph_edges: Vec<FarcasterGraphEdge>,
    pub trend_keywords: Vec<FarcasterTrendKeyword>,
    pub generated_at: DateTime<Utc>,
}
