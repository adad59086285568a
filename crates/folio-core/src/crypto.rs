//! Crypto dashboard pipeline
//!
//! Tracked-coin normalization, market pulse, whale signal scoring and
//! bitcoin history thinning over CoinGecko payloads.

use std::collections::{HashMap, HashSet};

use chrono::Utc;

use crate::aggregate::{downsample, turnover_ratio, weighted_change};
use crate::models::*;
use crate::numeric::{count, finite, text_or};
use crate::ranking::top_by_score;
use crate::raw::{CoinMarketEntry, GlobalResponse, MarketChartResponse};

/// Maximum whale signals in a snapshot
pub const WHALE_SIGNAL_LIMIT: usize = 3;

/// Turnover above which flow is read as directional
const DIRECTIONAL_TURNOVER: f64 = 0.035;
const HIGH_TURNOVER: f64 = 0.06;
/// Absolute 24h change (percent) that marks a high-intensity move
const HIGH_MOMENTUM: f64 = 4.0;

/// Raw payloads fetched for one crypto dashboard
#[derive(Debug, Clone, Default)]
pub struct CryptoPayloads {
    pub markets: Vec<CoinMarketEntry>,
    pub global: GlobalResponse,
    pub bitcoin_history: MarketChartResponse,
}

/// Keep only tracked coins, first occurrence per id, ordered by their
/// position in `tracked_ids`.
pub fn normalize_coins(entries: Vec<CoinMarketEntry>, tracked_ids: &[String]) -> Vec<TrackedCoin> {
    let priority: HashMap<&str, usize> = tracked_ids
        .iter()
        .enumerate()
        .map(|(index, id)| (id.as_str(), index))
        .collect();

    let mut seen = HashSet::new();
    let mut coins: Vec<(usize, TrackedCoin)> = entries
        .into_iter()
        .filter_map(|entry| {
            let rank = *priority.get(entry.id.as_str())?;
            if !seen.insert(entry.id.clone()) {
                return None;
            }
            Some((rank, to_tracked_coin(entry)))
        })
        .collect();

    coins.sort_by_key(|(rank, _)| *rank);
    coins.into_iter().map(|(_, coin)| coin).collect()
}

fn to_tracked_coin(entry: CoinMarketEntry) -> TrackedCoin {
    TrackedCoin {
        symbol: text_or(entry.symbol.as_deref(), "").to_uppercase(),
        name: text_or(entry.name.as_deref(), &entry.id),
        current_price: finite(entry.current_price),
        market_cap: finite(entry.market_cap),
        total_volume: finite(entry.total_volume),
        high_24h: finite(entry.high_24h),
        low_24h: finite(entry.low_24h),
        change_24h: finite(entry.price_change_percentage_24h),
        change_7d: finite(entry.price_change_percentage_7d_in_currency),
        sparkline_7d: entry
            .sparkline_in_7d
            .map(|s| s.price.into_iter().flatten().filter(|p| p.is_finite()).collect())
            .unwrap_or_default(),
        last_updated: entry.last_updated.unwrap_or_default(),
        id: entry.id,
    }
}

pub fn to_global_snapshot(global: &GlobalResponse) -> GlobalSnapshot {
    let data = &global.data;
    GlobalSnapshot {
        active_cryptocurrencies: count(data.active_cryptocurrencies),
        total_market_cap_usd: finite(data.total_market_cap.usd),
        total_volume_usd: finite(data.total_volume.usd),
        btc_dominance: finite(data.market_cap_percentage.btc),
    }
}

/// Market-cap weighted 24h and 7d change across the tracked coins
pub fn market_pulse(coins: &[TrackedCoin]) -> MarketPulse {
    MarketPulse {
        weighted_change_24h: weighted_change(coins, |c| c.market_cap, |c| c.change_24h),
        weighted_change_7d: weighted_change(coins, |c| c.market_cap, |c| c.change_7d),
    }
}

pub fn classify_sentiment(turnover: f64, momentum: f64) -> WhaleSentiment {
    if turnover > DIRECTIONAL_TURNOVER {
        if momentum >= 0.0 {
            WhaleSentiment::Accumulation
        } else {
            WhaleSentiment::Distribution
        }
    } else {
        WhaleSentiment::Rotation
    }
}

pub fn classify_intensity(turnover: f64, momentum: f64) -> SignalIntensity {
    if turnover > HIGH_TURNOVER || momentum.abs() > HIGH_MOMENTUM {
        SignalIntensity::High
    } else {
        SignalIntensity::Medium
    }
}

/// `turnover * 100 + |momentum|`
pub fn whale_score(turnover: f64, momentum: f64) -> f64 {
    turnover * 100.0 + momentum.abs()
}

/// Score every coin and keep the strongest [`WHALE_SIGNAL_LIMIT`]
pub fn build_whale_signals(coins: &[TrackedCoin]) -> Vec<WhaleSignal> {
    let scored: Vec<(f64, WhaleSignal)> = coins
        .iter()
        .map(|coin| {
            let turnover = turnover_ratio(coin.total_volume, coin.market_cap);
            let momentum = coin.change_24h;
            let sentiment = classify_sentiment(turnover, momentum);

            let headline = match sentiment {
                WhaleSentiment::Accumulation => "Large wallets are likely accumulating.",
                WhaleSentiment::Distribution => "High-volume selling pressure detected.",
                WhaleSentiment::Rotation => "Flow rotation across majors remains active.",
            };

            let signal = WhaleSignal {
                id: coin.id.clone(),
                symbol: coin.symbol.clone(),
                sentiment,
                intensity: classify_intensity(turnover, momentum),
                message: format!(
                    "{} 24h turnover is {:.1}% of market cap with {:.2}% price change.",
                    headline,
                    turnover * 100.0,
                    momentum
                ),
            };

            (whale_score(turnover, momentum), signal)
        })
        .collect();

    top_by_score(scored, WHALE_SIGNAL_LIMIT, |(score, _)| *score)
        .into_iter()
        .map(|(_, signal)| signal)
        .collect()
}

/// Drop non-finite points and thin to about `target` points
pub fn normalize_price_history(chart: MarketChartResponse, target: usize) -> Vec<PricePoint> {
    let points: Vec<PricePoint> = chart
        .prices
        .into_iter()
        .filter_map(|(timestamp, price)| match (timestamp, price) {
            (Some(t), Some(p)) if t.is_finite() && p.is_finite() => Some(PricePoint {
                timestamp: t as i64,
                price: p,
            }),
            _ => None,
        })
        .collect();

    downsample(&points, target, |a, b| a.timestamp == b.timestamp)
}

/// Assemble a [`CryptoDashboardData`] snapshot from fetched payloads
pub fn assemble_crypto_dashboard(
    payloads: CryptoPayloads,
    tracked_ids: &[String],
    history_points: usize,
) -> CryptoDashboardData {
    let received = payloads.markets.len();
    let coins = normalize_coins(payloads.markets, tracked_ids);

    tracing::debug!(
        received,
        kept = coins.len(),
        "Normalized coin markets"
    );

    CryptoDashboardData {
        global: to_global_snapshot(&payloads.global),
        market_pulse: market_pulse(&coins),
        bitcoin_history: normalize_price_history(payloads.bitcoin_history, history_points),
        whale_signals: build_whale_signals(&coins),
        coins,
        generated_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::Sparkline;
    use pretty_assertions::assert_eq;

    fn tracked() -> Vec<String> {
        ["bitcoin", "ethereum", "solana", "chainlink"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn entry(id: &str, cap: f64, volume: f64, change: Option<f64>) -> CoinMarketEntry {
        CoinMarketEntry {
            id: id.to_string(),
            symbol: Some(id[..3].to_string()),
            name: Some(id.to_string()),
            market_cap: Some(cap),
            total_volume: Some(volume),
            price_change_percentage_24h: change,
            ..Default::default()
        }
    }

    fn coin(id: &str, cap: f64, volume: f64, change: f64) -> TrackedCoin {
        to_tracked_coin(entry(id, cap, volume, Some(change)))
    }

    #[test]
    fn test_normalize_orders_by_tracked_priority() {
        let entries = vec![
            entry("solana", 80.0, 1.0, None),
            entry("dogecoin", 30.0, 1.0, None),
            entry("bitcoin", 1000.0, 1.0, None),
            entry("bitcoin", 999.0, 1.0, None),
            entry("chainlink", 10.0, 1.0, None),
        ];

        let coins = normalize_coins(entries, &tracked());
        let ids: Vec<_> = coins.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["bitcoin", "solana", "chainlink"]);
        assert_eq!(coins[0].market_cap, 1000.0);
        assert_eq!(coins[0].symbol, "BIT");
    }

    #[test]
    fn test_normalize_coerces_missing_numbers() {
        let raw = CoinMarketEntry {
            id: "ethereum".to_string(),
            current_price: Some(f64::NAN),
            sparkline_in_7d: Some(Sparkline {
                price: vec![Some(1.0), None, Some(f64::INFINITY), Some(2.0)],
            }),
            ..Default::default()
        };

        let coins = normalize_coins(vec![raw], &tracked());
        let eth = &coins[0];
        assert_eq!(eth.current_price, 0.0);
        assert_eq!(eth.change_24h, 0.0);
        assert_eq!(eth.change_7d, 0.0);
        assert_eq!(eth.sparkline_7d, vec![1.0, 2.0]);
        assert_eq!(eth.name, "ethereum");
        for value in [eth.market_cap, eth.total_volume, eth.high_24h, eth.low_24h] {
            assert!(value.is_finite());
        }
    }

    #[test]
    fn test_market_pulse_weights_by_cap() {
        let coins = vec![
            coin("bitcoin", 10.0, 0.0, 5.0),
            coin("ethereum", 20.0, 0.0, -2.0),
            coin("solana", 0.0, 0.0, 100.0),
        ];
        let pulse = market_pulse(&coins);
        assert!((pulse.weighted_change_24h - 10.0 / 30.0).abs() < 1e-12);
        assert_eq!(market_pulse(&[]).weighted_change_24h, 0.0);
    }

    #[test]
    fn test_sentiment_and_intensity_thresholds() {
        assert_eq!(classify_sentiment(0.05, 1.0), WhaleSentiment::Accumulation);
        assert_eq!(classify_sentiment(0.05, -1.0), WhaleSentiment::Distribution);
        assert_eq!(classify_sentiment(0.035, 9.0), WhaleSentiment::Rotation);
        assert_eq!(classify_intensity(0.061, 0.0), SignalIntensity::High);
        assert_eq!(classify_intensity(0.01, -4.5), SignalIntensity::High);
        assert_eq!(classify_intensity(0.06, 4.0), SignalIntensity::Medium);
    }

    #[test]
    fn test_whale_signals_ranked_and_capped() {
        let coins = vec![
            coin("bitcoin", 100.0, 2.0, 1.0),   // 2 + 1 = 3
            coin("ethereum", 100.0, 8.0, -3.0), // 8 + 3 = 11
            coin("solana", 100.0, 4.0, 6.0),    // 4 + 6 = 10
            coin("chainlink", 0.0, 50.0, 0.5),  // 0 + 0.5
        ];

        let signals = build_whale_signals(&coins);
        let ids: Vec<_> = signals.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["ethereum", "solana", "bitcoin"]);

        assert_eq!(signals[0].sentiment, WhaleSentiment::Distribution);
        assert_eq!(signals[0].intensity, SignalIntensity::High);
        assert_eq!(
            signals[0].message,
            "High-volume selling pressure detected. 24h turnover is 8.0% of market cap with -3.00% price change."
        );
        assert_eq!(signals[1].sentiment, WhaleSentiment::Accumulation);
        assert_eq!(signals[2].sentiment, WhaleSentiment::Rotation);
    }

    #[test]
    fn test_whale_signals_tie_keeps_priority_order() {
        let coins = vec![
            coin("bitcoin", 100.0, 0.0, 2.0),
            coin("ethereum", 100.0, 0.0, -2.0),
        ];
        let ids: Vec<_> = build_whale_signals(&coins).into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["bitcoin", "ethereum"]);
        assert!(build_whale_signals(&[]).is_empty());
    }

    #[test]
    fn test_price_history_filters_and_downsamples() {
        let mut prices: Vec<(Option<f64>, Option<f64>)> =
            (0..200).map(|i| (Some(i as f64 * 1000.0), Some(100.0 + i as f64))).collect();
        prices.push((None, Some(1.0)));
        prices.push((Some(1.0), Some(f64::NAN)));

        let history = normalize_price_history(MarketChartResponse { prices }, 64);
        // stride 3 over 200 points keeps 67, then the final point is appended
        assert_eq!(history.len(), 68);
        assert_eq!(history.first().map(|p| p.timestamp), Some(0));
        assert_eq!(history.last().map(|p| p.timestamp), Some(199_000));
    }

    #[test]
    fn test_assemble_snapshot() {
        let payloads = CryptoPayloads {
            markets: vec![entry("ethereum", 400.0, 20.0, Some(2.0)), entry("bitcoin", 1200.0, 30.0, Some(-1.0))],
            ..Default::default()
        };

        let before = Utc::now();
        let snapshot = assemble_crypto_dashboard(payloads, &tracked(), 64);

        assert_eq!(snapshot.coins.len(), 2);
        assert_eq!(snapshot.coins[0].id, "bitcoin");
        assert_eq!(snapshot.global.active_cryptocurrencies, 0);
        assert!(snapshot.bitcoin_history.is_empty());
        assert_eq!(snapshot.whale_signals.len(), 2);
        assert!(snapshot.generated_at >= before);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json.get("generatedAt").is_some());
        assert!(json.get("whaleSignals").is_some());
        assert_eq!(json["whaleSignals"][0]["sentiment"], "accumulation");
    }
}
