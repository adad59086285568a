//! DeFiLlama client and DeFi analytics pipeline

use folio_core::defi::DefiPayloads;
use folio_core::raw::{LlamaChain, LlamaHistoricalPoint, LlamaProtocol};
use folio_core::{assemble_defi_analytics, DefiAnalyticsData};

use crate::config::{DefiConfig, HttpConfig};
use crate::error::{DataSource, Result};
use crate::gateway::HttpGateway;

/// HTTP client for the DeFiLlama API
pub struct DefiLlamaClient {
    gateway: HttpGateway,
    config: DefiConfig,
}

impl DefiLlamaClient {
    pub fn new(config: &DefiConfig, http: &HttpConfig) -> Result<Self> {
        Ok(Self {
            gateway: HttpGateway::new(DataSource::DefiLlama, &config.api_url, http)?,
            config: config.clone(),
        })
    }

    pub async fn protocols(&self) -> Result<Vec<LlamaProtocol>> {
        self.gateway.get_json("/protocols", &[]).await
    }

    pub async fn chains(&self) -> Result<Vec<LlamaChain>> {
        self.gateway.get_json("/v2/chains", &[]).await
    }

    /// Daily TVL across all chains
    pub async fn tvl_history(&self) -> Result<Vec<LlamaHistoricalPoint>> {
        self.gateway.get_json("/v2/historicalChainTvl", &[]).await
    }

    /// Fetch protocols, chains and TVL history concurrently, then assemble
    /// the analytics snapshot. Any failed request fails the whole call.
    pub async fn analytics(&self) -> Result<DefiAnalyticsData> {
        let (protocols, chains, tvl_history) =
            tokio::try_join!(self.protocols(), self.chains(), self.tvl_history())?;

        let snapshot = assemble_defi_analytics(
            DefiPayloads {
                protocols,
                chains,
                tvl_history,
            },
            &self.config.excluded_categories,
        );

        tracing::info!(
            active_protocols = snapshot.headline.active_protocols,
            total_tvl_usd = snapshot.headline.total_tvl_usd,
            momentum_signals = snapshot.momentum_signals.len(),
            "DeFi analytics assembled"
        );

        Ok(snapshot)
    }
}
