//! Folio CLI
//!
//! Runs one pipeline and prints its snapshot as JSON on stdout. Logs go to
//! stderr so the output can be piped straight into a file or another tool.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use folio_feeds::{
    get_crypto_dashboard_data, get_defi_analytics_data, get_farcaster_widget_data, AppConfig,
};

/// Build display-ready market, DeFi and Farcaster snapshots.
#[derive(Debug, Parser)]
#[command(name = "folio", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Pretty-print the snapshot JSON.
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Tracked coins, market pulse, bitcoin history and whale signals.
    Crypto,

    /// DeFi headline TVL, chains, categories and momentum signals.
    Defi,

    /// Farcaster profile, casts, social graph and trend keywords.
    Farcaster {
        /// Account to inspect; defaults to `farcaster.default_username`.
        #[arg(long)]
        username: Option<String>,
    },
}

fn print_snapshot<T: Serialize>(snapshot: &T, pretty: bool) -> anyhow::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(snapshot)?
    } else {
        serde_json::to_string(snapshot)?
    };
    println!("{json}");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the snapshot, logs go to stderr
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("folio_feeds=info,folio_core=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Failed to load configuration")?;

    tracing::debug!(
        crypto_api = %config.crypto.api_url,
        defi_api = %config.defi.api_url,
        farcaster_api = %config.farcaster.api_url,
        farcaster_key_set = config.farcaster.api_key.is_some(),
        "Configuration loaded"
    );

    match cli.command {
        Command::Crypto => {
            let snapshot = get_crypto_dashboard_data(&config.crypto, &config.http).await?;
            print_snapshot(&snapshot, cli.pretty)
        }
        Command::Defi => {
            let snapshot = get_defi_analytics_data(&config.defi, &config.http).await?;
            print_snapshot(&snapshot, cli.pretty)
        }
        Command::Farcaster { username } => {
            let snapshot =
                get_farcaster_widget_data(&config.farcaster, &config.http, username.as_deref()).await?;
            print_snapshot(&snapshot, cli.pretty)
        }
    }
}
