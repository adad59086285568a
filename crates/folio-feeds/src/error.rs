//! Error types for the data source gateway
//!
//! Only fetch-side failures live here. Malformed records, empty facets and
//! degenerate aggregates are absorbed by `folio-core` and never surface.

use std::fmt;

use thiserror::Error;

/// Upstream provider a request was sent to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    CoinGecko,
    DefiLlama,
    Neynar,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataSource::CoinGecko => "CoinGecko",
            DataSource::DefiLlama => "DeFiLlama",
            DataSource::Neynar => "Neynar",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("{feed} request failed ({status}) for {endpoint}")]
    Upstream {
        feed: DataSource,
        endpoint: String,
        status: u16,
    },

    #[error("{feed} request to {endpoint} failed: {message}")]
    Transport {
        feed: DataSource,
        endpoint: String,
        message: String,
    },

    #[error("{feed} returned an unreadable payload for {endpoint}: {message}")]
    Decode {
        feed: DataSource,
        endpoint: String,
        message: String,
    },

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, FeedError>;
