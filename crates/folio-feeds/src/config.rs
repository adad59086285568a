//! Configuration management for the data source gateway
//!
//! Each pipeline receives only its own section. Upstream URLs, tracked ids
//! and exclusion sets live here instead of in module-level constants.

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{FeedError, Result};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub crypto: CryptoConfig,
    #[serde(default)]
    pub defi: DefiConfig,
    #[serde(default)]
    pub farcaster: FarcasterConfig,
}

/// Shared HTTP client settings
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("folio-feeds/{}", env!("CARGO_PKG_VERSION"))
}

/// CoinGecko market data
#[derive(Debug, Clone, Deserialize)]
pub struct CryptoConfig {
    #[serde(default = "default_coingecko_url")]
    pub api_url: String,
    /// Coin ids to keep, in display order
    #[serde(default = "default_tracked_coin_ids")]
    pub tracked_coin_ids: Vec<String>,
    /// Coin whose price history is charted
    #[serde(default = "default_history_coin")]
    pub history_coin_id: String,
    #[serde(default = "default_history_days")]
    pub history_days: u32,
    /// Approximate number of points kept after thinning
    #[serde(default = "default_history_points")]
    pub history_points: usize,
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            api_url: default_coingecko_url(),
            tracked_coin_ids: default_tracked_coin_ids(),
            history_coin_id: default_history_coin(),
            history_days: default_history_days(),
            history_points: default_history_points(),
        }
    }
}

fn default_coingecko_url() -> String {
    "https://api.coingecko.com/api/v3".to_string()
}

fn default_tracked_coin_ids() -> Vec<String> {
    ["bitcoin", "ethereum", "solana", "chainlink"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_history_coin() -> String {
    "bitcoin".to_string()
}

fn default_history_days() -> u32 {
    7
}

fn default_history_points() -> usize {
    64
}

/// DeFiLlama protocol and chain data
#[derive(Debug, Clone, Deserialize)]
pub struct DefiConfig {
    #[serde(default = "default_defillama_url")]
    pub api_url: String,
    /// Protocol categories removed before any aggregation
    #[serde(default = "default_excluded_categories")]
    pub excluded_categories: Vec<String>,
}

impl Default for DefiConfig {
    fn default() -> Self {
        Self {
            api_url: default_defillama_url(),
            excluded_categories: default_excluded_categories(),
        }
    }
}

fn default_defillama_url() -> String {
    "https://api.llama.fi".to_string()
}

fn default_excluded_categories() -> Vec<String> {
    vec!["CEX".to_string()]
}

/// Neynar Farcaster data
#[derive(Debug, Clone, Deserialize)]
pub struct FarcasterConfig {
    #[serde(default = "default_neynar_url")]
    pub api_url: String,
    /// Required. There is no placeholder key; unset falls back to the
    /// `NEYNAR_API_KEY` environment variable
    #[serde(default = "default_neynar_api_key")]
    pub api_key: Option<String>,
    #[serde(default = "default_username")]
    pub default_username: String,
    #[serde(default = "default_viewer_fid")]
    pub viewer_fid: u64,
    #[serde(default = "default_follower_sample_limit")]
    pub follower_sample_limit: u32,
    #[serde(default = "default_cast_sample_limit")]
    pub cast_sample_limit: u32,
}

impl Default for FarcasterConfig {
    fn default() -> Self {
        Self {
            api_url: default_neynar_url(),
            api_key: default_neynar_api_key(),
            default_username: default_username(),
            viewer_fid: default_viewer_fid(),
            follower_sample_limit: default_follower_sample_limit(),
            cast_sample_limit: default_cast_sample_limit(),
        }
    }
}

fn default_neynar_url() -> String {
    "https://api.neynar.com/v2/farcaster".to_string()
}

fn default_neynar_api_key() -> Option<String> {
    std::env::var("NEYNAR_API_KEY")
        .ok()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
}

fn default_username() -> String {
    "shevas".to_string()
}

fn default_viewer_fid() -> u64 {
    3
}

fn default_follower_sample_limit() -> u32 {
    24
}

fn default_cast_sample_limit() -> u32 {
    8
}

impl AppConfig {
    /// Load configuration from defaults, optional files and `FOLIO__*`
    /// environment variables (e.g. `FOLIO__DEFI__API_URL`).
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name("folio").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("FOLIO")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("crypto.tracked_coin_ids")
                    .with_list_parse_key("defi.excluded_categories")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| FeedError::Config(e.to_string()))?;

        let config: AppConfig = settings
            .try_deserialize()
            .map_err(|e| FeedError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.crypto.tracked_coin_ids.is_empty() {
            return Err(FeedError::Config("crypto.tracked_coin_ids cannot be empty".into()));
        }
        if self.crypto.history_points == 0 {
            return Err(FeedError::Config("crypto.history_points must be positive".into()));
        }
        if self.http.timeout_seconds == 0 {
            return Err(FeedError::Config("http.timeout_seconds must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.crypto.tracked_coin_ids, vec!["bitcoin", "ethereum", "solana", "chainlink"]);
        assert_eq!(config.crypto.history_points, 64);
        assert_eq!(config.defi.excluded_categories, vec!["CEX"]);
        assert_eq!(config.farcaster.default_username, "shevas");
        assert_eq!(config.farcaster.follower_sample_limit, 24);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_section_fills_defaults() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "defi": { "api_url": "http://localhost:9000" }
        }))
        .unwrap();

        assert_eq!(config.defi.api_url, "http://localhost:9000");
        assert_eq!(config.defi.excluded_categories, vec!["CEX"]);
        assert_eq!(config.http.timeout_seconds, 30);
    }

    #[test]
    fn test_validate_rejects_empty_tracked_ids() {
        let mut config = AppConfig::default();
        config.crypto.tracked_coin_ids.clear();
        assert!(matches!(config.validate(), Err(FeedError::Config(_))));
    }
}
