use super::*;
use flipwatch::models::{Category, SearchFilters, ShirtSearch};
use flipwatch::ListingSource;
use flipwatch::source::identity::{ClientIdentity, USER_AGENTS};
use std::time::{Duration, Instant};
use wiremock::matchers::{header, query_param};

fn nike_filters() -> SearchFilters {
    SearchFilters::new(0.0, 100.0, vec!["Nike".to_string(), "Adidas".to_string()])
}

#[tokio::test]
async fn test_fetch_parses_live_listings() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_healthy_marketplace(&server, catalog_body()).await;
    let mut client = test_client(&server);

    let listings = client.fetch(&nike_filters()).await;

    // All four items carry a price; the zero-priced one is left for the analyzer to skip
    assert_eq!(listings.len(), 4);
    let af1 = listings.iter().find(|l| l.id == "1001").unwrap();
    assert_eq!(af1.price, 30.0);
    assert_eq!(af1.brand, "Nike");
    assert_eq!(af1.size.as_deref(), Some("UK 9"));
    assert_eq!(af1.photo.as_deref(), Some("https://images.example/1001.jpg"));
    assert_eq!(af1.url, format!("{}/items/1001", server.uri()));

    let tee = listings.iter().find(|l| l.id == "1002").unwrap();
    assert_eq!(tee.price, 25.0);

    // Dollar prices are converted to pounds
    let gazelle = listings.iter().find(|l| l.id == "1003").unwrap();
    assert_eq!(gazelle.price, 39.5);

    assert_eq!(requests_to(&server, CATALOG_PATH).await, 1);
    assert_eq!(requests_to(&server, ITEMS_PATH).await, 1);
    Ok(())
}

#[tokio::test]
async fn test_fetch_sends_filters_and_browser_headers() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CATALOG_PATH))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(ITEMS_PATH))
        .and(query_param("brand_ids", "53,14"))
        .and(query_param("order", "newest_first"))
        .and(query_param("price_to", "100"))
        .and(query_param("currency", "GBP"))
        .and(header("dnt", "1"))
        .and(header("sec-fetch-mode", "cors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [
            {"id": 1, "title": "Nike Dunk Low", "price": "40", "brand_title": "Nike"}
        ]})))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = test_client(&server);
    let listings = client.fetch(&nike_filters()).await;

    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].id, "1");
    Ok(())
}

#[tokio::test]
async fn test_blocked_marketplace_retries_then_falls_back() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CATALOG_PATH))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let mut client = test_client(&server);
    let listings = client.fetch(&nike_filters()).await;

    // One attempt per configured retry, each refused at the warmup request
    assert_eq!(requests_to(&server, CATALOG_PATH).await, 3);
    assert_eq!(requests_to(&server, ITEMS_PATH).await, 0);

    assert!(!listings.is_empty());
    for listing in &listings {
        assert!(listing.id.starts_with("demo"));
        assert!(!listing.title.is_empty());
        assert!(listing.price > 0.0);
        assert!(!listing.brand.is_empty());
        assert!(listing.url.starts_with(&server.uri()));
    }
    Ok(())
}

#[tokio::test]
async fn test_each_retry_presents_a_fresh_identity() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CATALOG_PATH))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    mount_healthy_marketplace(&server, catalog_body()).await;

    let mut client = test_client(&server);
    let listings = client.fetch(&nike_filters()).await;
    assert_eq!(listings.len(), 4);

    let agents = user_agents_to(&server, CATALOG_PATH).await;
    assert_eq!(agents.len(), 3);
    assert!(agents.iter().all(|ua| USER_AGENTS.contains(&ua.as_str())));

    // Same seed as test_client; warmup is disabled so only identities draw from it
    let mut rng = StdRng::seed_from_u64(42);
    let expected: Vec<String> = (0..3)
        .map(|_| ClientIdentity::random(&mut rng).user_agent.to_string())
        .collect();
    assert_eq!(agents, expected);
    assert_eq!(user_agents_to(&server, ITEMS_PATH).await, vec![expected[2].clone()]);
    Ok(())
}

#[tokio::test]
async fn test_every_request_waits_for_the_rate_limit() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_healthy_marketplace(&server, catalog_body()).await;

    let mut config = test_source_config(&server.uri());
    config.min_request_interval_ms = 150;
    let mut client = VintedClient::with_rng(config, StdRng::seed_from_u64(42))?;

    let start = Instant::now();
    client.fetch(&nike_filters()).await;
    client.fetch(&nike_filters()).await;

    // Warmup and items requests of both fetches: four requests, three gaps
    assert_eq!(requests_to(&server, CATALOG_PATH).await, 2);
    assert_eq!(requests_to(&server, ITEMS_PATH).await, 2);
    assert!(start.elapsed() >= Duration::from_millis(450));
    Ok(())
}

#[tokio::test]
async fn test_retries_also_wait_for_the_rate_limit() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CATALOG_PATH))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let mut config = test_source_config(&server.uri());
    config.min_request_interval_ms = 150;
    let mut client = VintedClient::with_rng(config, StdRng::seed_from_u64(42))?;

    let start = Instant::now();
    client.fetch(&nike_filters()).await;

    assert_eq!(requests_to(&server, CATALOG_PATH).await, 3);
    assert!(start.elapsed() >= Duration::from_millis(300));
    Ok(())
}

#[tokio::test]
async fn test_captcha_page_counts_as_failure() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CATALOG_PATH))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(ITEMS_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string("<!DOCTYPE html><html><body>Please verify you are human</body></html>"),
        )
        .mount(&server)
        .await;

    let mut client = test_client(&server);
    let listings = client.fetch(&nike_filters()).await;

    assert_eq!(requests_to(&server, ITEMS_PATH).await, 3);
    assert!(listings.iter().all(|l| l.id.starts_with("demo")));
    Ok(())
}

#[tokio::test]
async fn test_recovers_after_transient_error() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CATALOG_PATH))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    // First items call fails, later ones succeed
    Mock::given(method("GET"))
        .and(path(ITEMS_PATH))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(ITEMS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog_body()))
        .mount(&server)
        .await;

    let mut client = test_client(&server);
    let listings = client.fetch(&nike_filters()).await;

    assert_eq!(requests_to(&server, ITEMS_PATH).await, 2);
    assert!(listings.iter().all(|l| !l.id.starts_with("demo")));
    assert_eq!(listings.len(), 4);
    Ok(())
}

#[tokio::test]
async fn test_invalid_filters_return_nothing() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let mut client = test_client(&server);

    let listings = client.fetch(&SearchFilters::new(50.0, 10.0, vec![])).await;

    assert!(listings.is_empty());
    assert_eq!(requests_to(&server, CATALOG_PATH).await, 0);
    Ok(())
}

#[tokio::test]
async fn test_football_search_tags_live_results() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CATALOG_PATH))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(ITEMS_PATH))
        .and(query_param("catalog_ids", "5066"))
        .and(query_param("search_text", "Arsenal home"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [
            {"id": 1, "title": "Arsenal 2004 Home Shirt", "price": "25", "brand_title": "Nike"},
            {"id": 2, "title": "Arsenal 1989 Home Shirt", "price": "60", "brand_title": "Adidas"},
            {"id": 3, "title": "Arsenal home shirt", "price": "20", "brand_title": "Puma"}
        ]})))
        .mount(&server)
        .await;

    let mut search = ShirtSearch::new("Arsenal home", 0.0, 200.0);
    search.min_year = Some(2000);
    let mut client = test_client(&server);
    let shirts = client.search_football_shirts(&search).await;

    // 1989 falls outside the requested range; the undated shirt is kept
    let ids: Vec<_> = shirts.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "3"]);
    for shirt in &shirts {
        assert_eq!(shirt.category, Category::FootballShirt);
        assert_eq!(shirt.team.as_deref(), Some("Arsenal"));
    }
    assert_eq!(shirts[0].year, Some(2004));
    assert_eq!(shirts[1].year, None);
    Ok(())
}

#[tokio::test]
async fn test_football_search_falls_back() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let mut search = ShirtSearch::new("Liverpool away", 0.0, 200.0);
    search.min_year = Some(2000);
    search.max_year = Some(2010);
    let mut client = test_client(&server);
    let shirts = client.search_football_shirts(&search).await;

    assert_eq!(shirts.len(), 3);
    for shirt in &shirts {
        assert!(shirt.id.starts_with("football_"));
        assert_eq!(shirt.category, Category::FootballShirt);
        assert!(shirt.title.starts_with("Liverpool"));
        assert!(shirt.title.contains("Away Shirt"));
        let year = shirt.year.unwrap();
        assert!((2000..=2010).contains(&year));
    }
    Ok(())
}
