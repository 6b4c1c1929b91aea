//! Synthetic market data
//!
//! Served when the upstream is down. History is a random walk seeded from
//! the request key, so the same request yields the same shape.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{HistoryQuery, MarketChart, PriceQuote, PriceResponse};

/// Reference USD price per asset id
pub fn base_price(id: &str) -> f64 {
    match id {
        "bitcoin" => 65_000.0,
        "ethereum" => 3_500.0,
        "binancecoin" => 600.0,
        "solana" => 150.0,
        _ => 100.0,
    }
}

fn seeded_rng(key: &str) -> StdRng {
    let digest = md5::compute(key.as_bytes());
    let mut seed = [0u8; 8];
    seed.copy_from_slice(&digest.0[..8]);
    StdRng::seed_from_u64(u64::from_le_bytes(seed))
}

/// Base price ± 100, 24h change in [-5, 5]
pub fn mock_price(id: &str) -> PriceResponse {
    let mut rng = rand::thread_rng();
    let quote = PriceQuote {
        usd: base_price(id) + rng.gen_range(-100.0..=100.0),
        usd_24h_change: rng.gen_range(-5.0..=5.0),
    };
    PriceResponse::from([(id.to_string(), quote)])
}

/// Random walk ending now, one point per interval step
pub fn mock_history(query: &HistoryQuery) -> MarketChart {
    mock_history_at(query, Utc::now().timestamp_millis())
}

pub(crate) fn mock_history_at(query: &HistoryQuery, now_ms: i64) -> MarketChart {
    let mut rng = seeded_rng(&query.key());
    let count = query.point_count();
    let step = query.interval.step_ms();
    let volatility = match query.interval {
        super::Interval::Daily => 0.03,
        super::Interval::Hourly => 0.006,
    };

    let supply: f64 = rng.gen_range(1.0e7..1.0e8);
    let mut price = base_price(&query.id) * rng.gen_range(0.9..1.1);

    let mut prices = Vec::with_capacity(count);
    let mut market_caps = Vec::with_capacity(count);
    let mut total_volumes = Vec::with_capacity(count);

    for i in (0..count as i64).rev() {
        let ts = now_ms - i * step;
        // Floor keeps long walks from collapsing to zero
        price = (price * (1.0 + rng.gen_range(-volatility..volatility))).max(0.01);
        let cap = price * supply;

        prices.push((ts, price));
        market_caps.push((ts, cap));
        total_volumes.push((ts, cap * rng.gen_range(0.02..0.08)));
    }

    MarketChart {
        prices,
        market_caps,
        total_volumes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::Interval;

    fn query(id: &str, days: u32, interval: Interval) -> HistoryQuery {
        HistoryQuery {
            id: id.to_string(),
            days,
            interval,
        }
    }

    #[test]
    fn test_mock_price_range() {
        for id in ["bitcoin", "ethereum", "binancecoin", "solana", "dogecoin"] {
            let response = mock_price(id);
            let quote = &response[id];
            assert!((quote.usd - base_price(id)).abs() <= 100.0);
            assert!((-5.0..=5.0).contains(&quote.usd_24h_change));
        }
    }

    #[test]
    fn test_daily_history_shape() {
        let now = 1_703_494_800_000;
        let chart = mock_history_at(&query("bitcoin", 7, Interval::Daily), now);

        assert_eq!(chart.prices.len(), 8);
        assert_eq!(chart.market_caps.len(), 8);
        assert_eq!(chart.total_volumes.len(), 8);
        assert_eq!(chart.prices.last().unwrap().0, now);
        assert_eq!(chart.prices[0].0, now - 7 * 86_400_000);
        assert!(chart.prices.iter().all(|(_, p)| *p > 0.0));
    }

    #[test]
    fn test_hourly_history_shape() {
        let now = 1_703_494_800_000;
        let chart = mock_history_at(&query("ethereum", 1, Interval::Hourly), now);
        assert_eq!(chart.prices.len(), 25);
        assert_eq!(chart.prices[1].0 - chart.prices[0].0, 3_600_000);
    }

    #[test]
    fn test_history_is_deterministic_per_key() {
        let now = 1_703_494_800_000;
        let a = mock_history_at(&query("solana", 30, Interval::Daily), now);
        let b = mock_history_at(&query("solana", 30, Interval::Daily), now);
        let c = mock_history_at(&query("solana", 31, Interval::Daily), now);

        assert_eq!(a, b);
        assert_ne!(a.prices[0].1, c.prices[0].1);
    }
}
