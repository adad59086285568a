//! # Folio Feeds
//!
//! Data source gateway for the Folio dashboards. Fetches raw CoinGecko,
//! DeFiLlama and Neynar payloads concurrently and hands them to
//! `folio-core` for normalization, scoring and snapshot assembly.
//!
//! Each entry point either returns a complete snapshot or fails with the
//! first upstream error. There are no partial snapshots.

pub mod coingecko;
pub mod config;
pub mod defillama;
pub mod error;
pub mod gateway;
pub mod neynar;

pub use crate::coingecko::CoinGeckoClient;
pub use crate::config::{AppConfig, CryptoConfig, DefiConfig, FarcasterConfig, HttpConfig};
pub use crate::defillama::DefiLlamaClient;
pub use crate::error::{DataSource, FeedError, Result};
pub use crate::neynar::NeynarClient;

use folio_core::{CryptoDashboardData, DefiAnalyticsData, FarcasterWidgetData};

/// Fetch and assemble the crypto dashboard snapshot
pub async fn get_crypto_dashboard_data(config: &CryptoConfig, http: &HttpConfig) -> Result<CryptoDashboardData> {
    CoinGeckoClient::new(config, http)?.dashboard().await
}

/// Fetch and assemble the DeFi analytics snapshot
pub async fn get_defi_analytics_data(config: &DefiConfig, http: &HttpConfig) -> Result<DefiAnalyticsData> {
    DefiLlamaClient::new(config, http)?.analytics().await
}

/// Fetch and assemble the Farcaster widget snapshot for `username`, or the
/// configured default account
pub async fn get_farcaster_widget_data(
    config: &FarcasterConfig,
    http: &HttpConfig,
    username: Option<&str>,
) -> Result<FarcasterWidgetData> {
    NeynarClient::new(config, http)?.widget(username).await
}
