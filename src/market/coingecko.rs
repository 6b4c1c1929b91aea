//! CoinGecko upstream

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use tracing::debug;

use super::{HistoryQuery, MarketChart, MarketDataError, MarketDataSource, PriceResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Browser-like agent; the public API throttles unknown clients harder
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub struct CoinGeckoSource {
    client: reqwest::Client,
    base_url: String,
    /// Pause before each upstream call (rate-limit courtesy)
    request_delay: Duration,
}

impl CoinGeckoSource {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        request_delay: Duration,
    ) -> Result<Self, MarketDataError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            request_delay,
        })
    }

    async fn pause(&self) {
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, MarketDataError> {
        self.pause().await;
        debug!(url = %url, "[market] upstream request");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MarketDataError::Status(status.as_u16()));
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl MarketDataSource for CoinGeckoSource {
    fn name(&self) -> &'static str {
        "coingecko"
    }

    async fn price(&self, id: &str) -> Result<PriceResponse, MarketDataError> {
        let url = format!("{}/simple/price", self.base_url);
        self.get_json(
            &url,
            &[
                ("ids", id.to_string()),
                ("vs_currencies", "usd".to_string()),
                ("include_24hr_change", "true".to_string()),
            ],
        )
        .await
    }

    async fn history(&self, query: &HistoryQuery) -> Result<MarketChart, MarketDataError> {
        let url = format!("{}/coins/{}/market_chart", self.base_url, query.id);
        self.get_json(
            &url,
            &[
                ("vs_currency", "usd".to_string()),
                ("days", query.days.to_string()),
                ("interval", query.interval.to_string()),
            ],
        )
        .await
    }
}
