use std::sync::Arc;

use crate::market::MarketDataSource;

/// Gateway shared state
#[derive(Clone)]
pub struct AppState {
    /// Upstream market-data source (cached in front)
    pub market: Arc<dyn MarketDataSource>,
}

impl AppState {
    pub fn new(market: Arc<dyn MarketDataSource>) -> Self {
        Self { market }
    }
}
