//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::OpenApi;

use crate::gateway::handlers::HealthResponse;
use crate::gateway::types::ErrorBody;
use crate::market::{MarketChart, PriceQuote};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "chainpay API",
        version = "0.1.0",
        description = "Market-data proxy for the multi-chain invoice payment page."
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health_check,
        crate::gateway::handlers::get_price,
        crate::gateway::handlers::get_history,
    ),
    components(
        schemas(HealthResponse, ErrorBody, PriceQuote, MarketChart)
    ),
    tags(
        (name = "System", description = "Service health"),
        (name = "Market Data", description = "Cached USD prices and history"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_all_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in ["/api/health", "/api/crypto/price", "/api/crypto/history"] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {}",
                expected
            );
        }
    }
}
