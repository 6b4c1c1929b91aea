//! TTL cache in front of the upstream source
//!
//! Uses the `cached` crate with a `TimedSizedCache` per endpoint: entries
//! expire after the TTL and the least recently used key is evicted once the
//! cache is full, so arbitrary query ids cannot grow it without bound.
//! Fallback data is cached exactly like live data, so a flapping upstream is
//! hit at most once per TTL per key.

use std::sync::Arc;

use cached::TimedSizedCache;
use cached::proc_macro::cached;
use tracing::{debug, warn};

use super::{HistoryQuery, MarketChart, MarketDataSource, PriceResponse, fallback};

/// TTL for spot prices in seconds
pub const PRICE_TTL_SECONDS: u64 = 60;
/// TTL for history series in seconds
pub const HISTORY_TTL_SECONDS: u64 = 300;
/// Distinct price keys kept at once
pub const PRICE_CACHE_SIZE: usize = 1_000;
/// Distinct history keys kept at once
pub const HISTORY_CACHE_SIZE: usize = 500;

fn price_cache() -> TimedSizedCache<String, PriceResponse> {
    TimedSizedCache::with_size_and_lifespan(PRICE_CACHE_SIZE, PRICE_TTL_SECONDS)
}

fn history_cache() -> TimedSizedCache<String, MarketChart> {
    TimedSizedCache::with_size_and_lifespan(HISTORY_CACHE_SIZE, HISTORY_TTL_SECONDS)
}

/// Spot price for `id`, cached for PRICE_TTL_SECONDS
#[cached(
    ty = "TimedSizedCache<String, PriceResponse>",
    create = "{ price_cache() }",
    convert = r#"{ format!("{}:{}", source.name(), id) }"#
)]
pub async fn price_cached(source: Arc<dyn MarketDataSource>, id: String) -> PriceResponse {
    debug!(source = source.name(), id = %id, "[cache] price miss");
    match source.price(&id).await {
        Ok(response) => response,
        Err(e) => {
            warn!(
                source = source.name(),
                id = %id,
                error = %e,
                "[market] upstream price failed, using fallback"
            );
            fallback::mock_price(&id)
        }
    }
}

/// History series, cached for HISTORY_TTL_SECONDS per `<id>-<days>-<interval>`
#[cached(
    ty = "TimedSizedCache<String, MarketChart>",
    create = "{ history_cache() }",
    convert = r#"{ format!("{}:{}", source.name(), query.key()) }"#
)]
pub async fn history_cached(
    source: Arc<dyn MarketDataSource>,
    query: HistoryQuery,
) -> MarketChart {
    debug!(source = source.name(), key = %query.key(), "[cache] history miss");
    match source.history(&query).await {
        Ok(chart) => chart,
        Err(e) => {
            warn!(
                source = source.name(),
                key = %query.key(),
                error = %e,
                "[market] upstream history failed, using fallback"
            );
            fallback::mock_history(&query)
        }
    }
}
