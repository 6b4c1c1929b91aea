//! Market Data Proxy
//!
//! USD price and price history for the assets shown next to the invoice.
//! Requests go to an upstream source (CoinGecko) through a TTL cache; when
//! the upstream is unreachable or answers non-2xx a deterministic synthetic
//! series is served instead, with nothing in the payload marking it as such.

pub mod cache;
pub mod coingecko;
pub mod fallback;

pub use cache::{history_cached, price_cached};
pub use coingecko::CoinGeckoSource;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Default history window when `days` is absent
pub const DEFAULT_DAYS: u32 = 7;
/// Largest accepted history window
pub const MAX_DAYS: u32 = 365;

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned status {0}")]
    Status(u16),

    #[error("Invalid parameter: {0}")]
    InvalidParam(String),
}

/// Spot price for one asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PriceQuote {
    #[schema(example = 600.12)]
    pub usd: f64,
    #[serde(default)]
    #[schema(example = -1.42)]
    pub usd_24h_change: f64,
}

/// `{ "<id>": { usd, usd_24h_change } }`
pub type PriceResponse = HashMap<String, PriceQuote>;

/// Time series keyed by millisecond timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MarketChart {
    /// [[ts_ms, usd], ...]
    #[schema(value_type = Vec<Vec<f64>>, example = json!([[1703494800000_i64, 600.12]]))]
    pub prices: Vec<(i64, f64)>,
    #[serde(default)]
    #[schema(value_type = Vec<Vec<f64>>)]
    pub market_caps: Vec<(i64, f64)>,
    #[serde(default)]
    #[schema(value_type = Vec<Vec<f64>>)]
    pub total_volumes: Vec<(i64, f64)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    #[default]
    Daily,
    Hourly,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Daily => "daily",
            Interval::Hourly => "hourly",
        }
    }

    /// Spacing between points in milliseconds
    pub fn step_ms(&self) -> i64 {
        match self {
            Interval::Daily => 24 * 60 * 60 * 1000,
            Interval::Hourly => 60 * 60 * 1000,
        }
    }

    pub fn points_per_day(&self) -> u32 {
        match self {
            Interval::Daily => 1,
            Interval::Hourly => 24,
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Interval {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Interval::Daily),
            "hourly" => Ok(Interval::Hourly),
            other => Err(MarketDataError::InvalidParam(format!(
                "interval must be daily or hourly, got {}",
                other
            ))),
        }
    }
}

/// Validated history request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HistoryQuery {
    pub id: String,
    pub days: u32,
    pub interval: Interval,
}

impl HistoryQuery {
    /// Parse raw query values, applying defaults (`7`, `daily`)
    pub fn parse(
        id: &str,
        days: Option<&str>,
        interval: Option<&str>,
    ) -> Result<Self, MarketDataError> {
        let days = match days {
            None => DEFAULT_DAYS,
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|d| (1..=MAX_DAYS).contains(d))
                .ok_or_else(|| {
                    MarketDataError::InvalidParam(format!(
                        "days must be an integer between 1 and {}, got {}",
                        MAX_DAYS, raw
                    ))
                })?,
        };
        let interval = match interval {
            None => Interval::default(),
            Some(raw) => raw.parse()?,
        };
        Ok(Self {
            id: id.to_string(),
            days,
            interval,
        })
    }

    /// Cache key: `<id>-<days>-<interval>`
    pub fn key(&self) -> String {
        format!("{}-{}-{}", self.id, self.days, self.interval)
    }

    /// Number of points a full series has (both ends inclusive)
    pub fn point_count(&self) -> usize {
        (self.days * self.interval.points_per_day()) as usize + 1
    }
}

/// Upstream price source
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Source name; part of the cache key
    fn name(&self) -> &'static str;

    async fn price(&self, id: &str) -> Result<PriceResponse, MarketDataError>;

    async fn history(&self, query: &HistoryQuery) -> Result<MarketChart, MarketDataError>;
}
