//! Upstream payload shapes
//!
//! These mirror what CoinGecko, DeFiLlama and Neynar return. Numeric fields
//! are optional because the sources routinely send `null` or omit them; the
//! normalizers in each domain module decide the fallback.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

// =============================================================================
// CoinGecko
// =============================================================================

/// Entry from `/coins/markets`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoinMarketEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub total_volume: Option<f64>,
    #[serde(default)]
    pub high_24h: Option<f64>,
    #[serde(default)]
    pub low_24h: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_7d_in_currency: Option<f64>,
    #[serde(default)]
    pub sparkline_in_7d: Option<Sparkline>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Sparkline {
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: Vec<Option<f64>>,
}

/// Body of `/global`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GlobalResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: GlobalData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GlobalData {
    #[serde(default)]
    pub active_cryptocurrencies: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_market_cap: UsdAmount,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_volume: UsdAmount,
    #[serde(default, deserialize_with = "null_as_default")]
    pub market_cap_percentage: BtcShare,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsdAmount {
    #[serde(default)]
    pub usd: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BtcShare {
    #[serde(default)]
    pub btc: Option<f64>,
}

/// Body of `/coins/{id}/market_chart`; each price is `[timestamp_ms, price]`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarketChartResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub prices: Vec<(Option<f64>, Option<f64>)>,
}

// =============================================================================
// DeFiLlama
// =============================================================================

/// Entry from `/protocols`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LlamaProtocol {
    /// DeFiLlama sends ids as strings, older snapshots as numbers
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// Entries that are not strings are dropped during normalization
    #[serde(default)]
    pub chains: Option<Vec<Value>>,
    #[serde(default)]
    pub tvl: Option<f64>,
    #[serde(default)]
    pub change_1d: Option<f64>,
    #[serde(default)]
    pub change_7d: Option<f64>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Entry from `/v2/chains`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlamaChain {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tvl: Option<f64>,
    #[serde(default)]
    pub token_symbol: Option<String>,
}

/// Entry from `/v2/historicalChainTvl`; `date` is in seconds
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LlamaHistoricalPoint {
    #[serde(default)]
    pub date: Option<f64>,
    #[serde(default)]
    pub tvl: Option<f64>,
}

// =============================================================================
// Neynar (Farcaster)
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NeynarUser {
    /// Follow entries without a fid are dropped during normalization
    #[serde(default)]
    pub fid: Option<u64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub follower_count: Option<f64>,
    #[serde(default)]
    pub following_count: Option<f64>,
    #[serde(default)]
    pub profile: Option<NeynarProfile>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NeynarProfile {
    #[serde(default)]
    pub bio: Option<NeynarBio>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NeynarBio {
    #[serde(default)]
    pub text: Option<String>,
}

/// Body of `/user/by_username`
#[derive(Debug, Clone, Deserialize)]
pub struct UserByUsernameResponse {
    pub user: NeynarUser,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NeynarCast {
    #[serde(default, deserialize_with = "null_as_default")]
    pub hash: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub reactions: Option<NeynarReactions>,
    #[serde(default)]
    pub replies: Option<NeynarReplies>,
    #[serde(default)]
    pub channel: Option<NeynarChannel>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NeynarReactions {
    #[serde(default)]
    pub likes_count: Option<f64>,
    #[serde(default)]
    pub recasts_count: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NeynarReplies {
    #[serde(default)]
    pub count: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NeynarChannel {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Body of `/feed/user/casts`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFeedResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub casts: Vec<NeynarCast>,
}

/// Body of `/followers` and `/following`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FollowResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub users: Vec<FollowEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FollowEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub user: NeynarUser,
}

/// Treat an explicit `null` like a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_protocol_tolerates_nulls_and_numeric_id() {
        let protocol: LlamaProtocol = serde_json::from_value(json!({
            "id": 2269,
            "name": "Aave",
            "category": null,
            "chains": ["Ethereum", 42, null],
            "tvl": null
        }))
        .unwrap();

        assert_eq!(protocol.id, "2269");
        assert_eq!(protocol.category, None);
        assert_eq!(protocol.tvl, None);
        assert_eq!(protocol.chains.map(|c| c.len()), Some(3));
    }

    #[test]
    fn test_market_chart_accepts_null_pairs() {
        let chart: MarketChartResponse = serde_json::from_value(json!({
            "prices": [[1700000000000.0, 37000.5], [null, 1.0]]
        }))
        .unwrap();

        assert_eq!(chart.prices.len(), 2);
        assert_eq!(chart.prices[1].0, None);
    }

    #[test]
    fn test_follow_entries_tolerate_missing_or_null_fid() {
        let follows: FollowResponse = serde_json::from_value(json!({
            "users": [
                { "user": { "fid": null, "username": "ghost" } },
                { "user": { "username": "nofid" } },
                { "user": null },
                { "user": { "fid": 42, "username": "real" } }
            ]
        }))
        .unwrap();

        let fids: Vec<Option<u64>> = follows.users.iter().map(|e| e.user.fid).collect();
        assert_eq!(fids, vec![None, None, None, Some(42)]);
    }

    #[test]
    fn test_null_collections_and_ids_default() {
        let feed: UserFeedResponse = serde_json::from_value(json!({
            "casts": [{ "hash": null, "text": "gm farcaster" }]
        }))
        .unwrap();
        assert_eq!(feed.casts[0].hash, "");

        let empty: UserFeedResponse = serde_json::from_value(json!({ "casts": null })).unwrap();
        assert!(empty.casts.is_empty());

        let coin: CoinMarketEntry = serde_json::from_value(json!({
            "id": null,
            "sparkline_in_7d": { "price": null }
        }))
        .unwrap();
        assert_eq!(coin.id, "");
        assert_eq!(coin.sparkline_in_7d.map(|s| s.price.len()), Some(0));

        let global: GlobalResponse = serde_json::from_value(json!({
            "data": { "total_market_cap": null, "market_cap_percentage": null }
        }))
        .unwrap();
        assert_eq!(global.data.total_market_cap.usd, None);

        let chart: MarketChartResponse = serde_json::from_value(json!({ "prices": null })).unwrap();
        assert!(chart.prices.is_empty());
    }

    #[test]
    fn test_follow_response_defaults_to_empty() {
        let follows: FollowResponse = serde_json::from_value(json!({})).unwrap();
        assert!(follows.users.is_empty());
    }
}
