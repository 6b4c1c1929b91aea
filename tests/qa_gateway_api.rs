use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use chainpay::gateway::{router, state::AppState};
use chainpay::market::{HistoryQuery, MarketChart, MarketDataError, MarketDataSource, PriceResponse};

/// Upstream that is always down
struct DownSource {
    calls: AtomicUsize,
}

#[async_trait]
impl MarketDataSource for DownSource {
    fn name(&self) -> &'static str {
        "qa-down"
    }

    async fn price(&self, _id: &str) -> Result<PriceResponse, MarketDataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(MarketDataError::Status(429))
    }

    async fn history(&self, _query: &HistoryQuery) -> Result<MarketChart, MarketDataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(MarketDataError::Status(500))
    }
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn app(source: Arc<DownSource>) -> axum::Router {
    router(Arc::new(AppState::new(source)))
}

#[tokio::test]
async fn qa_price_falls_back_when_upstream_down() {
    let source = Arc::new(DownSource {
        calls: AtomicUsize::new(0),
    });

    let (status, body) = get(app(source.clone()), "/api/crypto/price?id=binancecoin").await;
    assert_eq!(status, StatusCode::OK);
    let usd = body["binancecoin"]["usd"].as_f64().unwrap();
    let change = body["binancecoin"]["usd_24h_change"].as_f64().unwrap();
    assert!((500.0..=700.0).contains(&usd));
    assert!((-5.0..=5.0).contains(&change));

    // Cached: same quote, no second upstream call
    let (_, again) = get(app(source.clone()), "/api/crypto/price?id=binancecoin").await;
    assert_eq!(body, again);
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn qa_history_fallback_shape() {
    let source = Arc::new(DownSource {
        calls: AtomicUsize::new(0),
    });

    let (status, body) = get(
        app(source.clone()),
        "/api/crypto/history?id=ethereum&days=3&interval=hourly",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    for series in ["prices", "market_caps", "total_volumes"] {
        let points = body[series].as_array().unwrap();
        assert_eq!(points.len(), 3 * 24 + 1, "{}", series);
        assert_eq!(points[0].as_array().unwrap().len(), 2);
    }

    let prices = body["prices"].as_array().unwrap();
    let t0 = prices[0][0].as_i64().unwrap();
    let t1 = prices[1][0].as_i64().unwrap();
    assert_eq!(t1 - t0, 3_600_000);
}

#[tokio::test]
async fn qa_missing_id_is_400() {
    let source = Arc::new(DownSource {
        calls: AtomicUsize::new(0),
    });

    for uri in ["/api/crypto/price", "/api/crypto/history"] {
        let (status, body) = get(app(source.clone()), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({"error": "Missing id parameter"}));
    }
    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn qa_openapi_document_served() {
    let source = Arc::new(DownSource {
        calls: AtomicUsize::new(0),
    });
    let (status, body) = get(app(source), "/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/crypto/price"].is_object());
}
