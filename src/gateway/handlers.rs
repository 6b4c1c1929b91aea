//! Gateway handlers: health and market-data proxy

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use super::state::AppState;
use super::types::{ApiError, ApiResponse, ApiResult, ErrorBody};
use crate::market::{self, HistoryQuery, MarketChart, PriceQuote, PriceResponse};

/// Health check response data
#[derive(serde::Serialize, ToSchema)]
pub struct HealthResponse {
    /// Server timestamp in milliseconds
    #[schema(example = 1703494800000_i64)]
    pub timestamp_ms: i64,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse, content_type = "application/json")
    ),
    tag = "System"
)]
pub async fn health_check() -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success(HealthResponse {
        timestamp_ms: Utc::now().timestamp_millis(),
    }))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PriceParams {
    /// Asset id, e.g. `binancecoin`
    pub id: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct HistoryParams {
    /// Asset id, e.g. `ethereum`
    pub id: Option<String>,
    /// Window in days (1-365, default 7)
    pub days: Option<String>,
    /// `daily` (default) or `hourly`
    pub interval: Option<String>,
}

/// Empty and absent ids are both "missing"
fn require_id(id: Option<String>) -> Result<String, ApiError> {
    id.filter(|s| !s.trim().is_empty())
        .ok_or_else(ApiError::missing_id)
}

/// Spot USD price with 24h change
///
/// GET /api/crypto/price?id=bitcoin
#[utoipa::path(
    get,
    path = "/api/crypto/price",
    params(PriceParams),
    responses(
        (status = 200, description = "Price keyed by asset id", body = HashMap<String, PriceQuote>, content_type = "application/json"),
        (status = 400, description = "Missing id parameter", body = ErrorBody)
    ),
    tag = "Market Data"
)]
pub async fn get_price(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PriceParams>,
) -> ApiResult<PriceResponse> {
    let id = require_id(params.id)?;
    let response = market::price_cached(state.market.clone(), id).await;
    Ok(Json(response))
}

/// USD price history
///
/// GET /api/crypto/history?id=ethereum&days=7&interval=daily
#[utoipa::path(
    get,
    path = "/api/crypto/history",
    params(HistoryParams),
    responses(
        (status = 200, description = "prices / market_caps / total_volumes as [ts_ms, value] pairs", body = MarketChart, content_type = "application/json"),
        (status = 400, description = "Missing id or invalid days/interval", body = ErrorBody)
    ),
    tag = "Market Data"
)]
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryParams>,
) -> ApiResult<MarketChart> {
    let id = require_id(params.id)?;
    let query = HistoryQuery::parse(&id, params.days.as_deref(), params.interval.as_deref())?;
    let chart = market::history_cached(state.market.clone(), query).await;
    Ok(Json(chart))
}
