//! CoinGecko client and crypto dashboard pipeline

use folio_core::crypto::CryptoPayloads;
use folio_core::raw::{CoinMarketEntry, GlobalResponse, MarketChartResponse};
use folio_core::{assemble_crypto_dashboard, CryptoDashboardData};

use crate::config::{CryptoConfig, HttpConfig};
use crate::error::{DataSource, Result};
use crate::gateway::HttpGateway;

/// HTTP client for the CoinGecko public API
pub struct CoinGeckoClient {
    gateway: HttpGateway,
    config: CryptoConfig,
}

impl CoinGeckoClient {
    pub fn new(config: &CryptoConfig, http: &HttpConfig) -> Result<Self> {
        Ok(Self {
            gateway: HttpGateway::new(DataSource::CoinGecko, &config.api_url, http)?,
            config: config.clone(),
        })
    }

    /// Market entries for the tracked coins, with 7d sparklines
    pub async fn markets(&self) -> Result<Vec<CoinMarketEntry>> {
        let per_page = self.config.tracked_coin_ids.len().max(10);
        self.gateway
            .get_json(
                "/coins/markets",
                &[
                    ("vs_currency", "usd".to_string()),
                    ("ids", self.config.tracked_coin_ids.join(",")),
                    ("order", "market_cap_desc".to_string()),
                    ("per_page", per_page.to_string()),
                    ("page", "1".to_string()),
                    ("sparkline", "true".to_string()),
                    ("price_change_percentage", "24h,7d".to_string()),
                ],
            )
            .await
    }

    pub async fn global(&self) -> Result<GlobalResponse> {
        self.gateway.get_json("/global", &[]).await
    }

    /// Price history for the configured history coin
    pub async fn price_history(&self) -> Result<MarketChartResponse> {
        let path = format!("/coins/{}/market_chart", self.config.history_coin_id);
        self.gateway
            .get_json(
                &path,
                &[
                    ("vs_currency", "usd".to_string()),
                    ("days", self.config.history_days.to_string()),
                ],
            )
            .await
    }

    /// Fetch markets, global figures and history concurrently, then
    /// assemble the dashboard. Any failed request fails the whole call.
    pub async fn dashboard(&self) -> Result<CryptoDashboardData> {
        let (markets, global, bitcoin_history) =
            tokio::try_join!(self.markets(), self.global(), self.price_history())?;

        let snapshot = assemble_crypto_dashboard(
            CryptoPayloads {
                markets,
                global,
                bitcoin_history,
            },
            &self.config.tracked_coin_ids,
            self.config.history_points,
        );

        tracing::info!(
            coins = snapshot.coins.len(),
            history_points = snapshot.bitcoin_history.len(),
            whale_signals = snapshot.whale_signals.len(),
            "Crypto dashboard assembled"
        );

        Ok(snapshot)
    }
}
