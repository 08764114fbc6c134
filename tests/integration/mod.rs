// Shared fixtures for the integration tests: a mock marketplace and
// fast, deterministic client configuration.

pub mod monitor_tests;
pub mod notifier_tests;
pub mod source_tests;

use flipwatch::config::SourceConfig;
use flipwatch::{
    AppConfig, CostModel, DealEvaluator, PriceEstimator, PricingTables, VintedClient,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::{Value, json};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CATALOG_PATH: &str = "/catalog";
pub const ITEMS_PATH: &str = "/api/v2/catalog/items";

/// Source configuration pointed at a mock server, with every delay shrunk to
/// almost nothing so retries finish quickly.
pub fn test_source_config(base_url: &str) -> SourceConfig {
    SourceConfig {
        base_url: base_url.to_string(),
        retry_attempts: 3,
        retry_delay_ms: 1,
        min_request_interval_ms: 0,
        request_timeout: 5,
        warmup_min_ms: 0,
        warmup_max_ms: 0,
        ..SourceConfig::default()
    }
}

pub fn test_client(server: &MockServer) -> VintedClient<StdRng> {
    VintedClient::with_rng(test_source_config(&server.uri()), StdRng::seed_from_u64(42))
        .expect("client builds")
}

pub fn test_evaluator(seed: u64) -> DealEvaluator<PriceEstimator> {
    let config = AppConfig::default();
    let estimator = PriceEstimator::seeded(Arc::new(PricingTables::standard()), &config.analyzer, seed);
    DealEvaluator::new(
        estimator,
        CostModel::from_config(&config.analyzer),
        config.analyzer.profit_threshold,
    )
}

pub fn catalog_body() -> Value {
    json!({
        "items": [
            {
                "id": 1001,
                "title": "Nike Air Force 1 Low White",
                "price": {"amount": "30.00", "currency_code": "GBP"},
                "brand_title": "Nike",
                "size_title": "UK 9",
                "photos": [{"url": "https://images.example/1001.jpg"}]
            },
            {
                "id": 1002,
                "title": "Supreme Small Box Logo Tee",
                "price": "£25.00",
                "brand_title": "Supreme",
                "size_title": "M",
                "photos": []
            },
            {
                "id": 1003,
                "title": "Adidas Gazelle Trainers",
                "price": "$50",
                "brand_title": "Adidas",
                "photos": []
            },
            {
                "id": 1004,
                "title": "Free bag",
                "price": {"amount": "0.00", "currency_code": "GBP"},
                "brand_title": "Other"
            }
        ]
    })
}

/// Marketplace that answers both the session warmup and the items API.
pub async fn mount_healthy_marketplace(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path(CATALOG_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>catalog</html>"))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(ITEMS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub async fn requests_to(server: &MockServer, target: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == target)
        .count()
}

/// User agents seen on `target`, oldest first. The mock server splits header
/// values on commas, so the parts are joined back together.
pub async fn user_agents_to(server: &MockServer, target: &str) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == target)
        .filter_map(|r| {
            r.headers
                .iter()
                .find(|(name, _)| name.as_str() == "user-agent")
                .map(|(_, values)| values.iter().map(|v| v.as_str()).collect::<Vec<_>>().join(", "))
        })
        .collect()
}
