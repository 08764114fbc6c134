use super::*;
use flipwatch::config::{DiscordConfig, MonitorConfig};
use flipwatch::{DealMonitor, DealStore, DiscordNotifier};
use tempfile::TempDir;

const WEBHOOK_PATH: &str = "/api/webhooks/42/token";

fn monitor_config(csv_path: &std::path::Path) -> MonitorConfig {
    MonitorConfig {
        brands: vec!["Nike".to_string(), "Adidas".to_string(), "Supreme".to_string()],
        batch_pause_ms: 0,
        deals_csv_path: csv_path.to_string_lossy().to_string(),
        ..MonitorConfig::default()
    }
}

async fn mount_webhook(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(WEBHOOK_PATH))
        .respond_with(ResponseTemplate::new(204))
        .mount(server)
        .await;
}

fn discord(server: &MockServer) -> DiscordNotifier {
    DiscordNotifier::new(DiscordConfig {
        webhook_url: Some(format!("{}{}", server.uri(), WEBHOOK_PATH)),
        min_interval_ms: 0,
        ..DiscordConfig::default()
    })
    .expect("notifier builds")
}

#[tokio::test]
async fn test_scan_finds_notifies_and_persists_deals() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_healthy_marketplace(&server, catalog_body()).await;
    mount_webhook(&server).await;

    let dir = TempDir::new()?;
    let csv_path = dir.path().join("deals.csv");
    let mut monitor = DealMonitor::new(test_client(&server), test_evaluator(3), monitor_config(&csv_path));
    monitor.add_notifier(Box::new(discord(&server)));

    let report = monitor.scan().await;

    assert_eq!(report.listings_fetched, 4);
    assert_eq!(report.new_listings, 4);
    let ids: Vec<_> = report.deals.iter().map(|d| d.id()).collect();
    assert_eq!(ids.len(), 3);
    assert!(ids.contains(&"1001"));
    assert!(!ids.contains(&"1004"));
    for pair in report.deals.windows(2) {
        assert!(pair[0].estimated_profit >= pair[1].estimated_profit);
    }

    assert_eq!(report.notifications_sent, 3);
    assert_eq!(report.notifications_failed, 0);
    assert_eq!(requests_to(&server, WEBHOOK_PATH).await, 3);

    let saved = DealStore::new(&csv_path).load()?;
    assert_eq!(saved, report.deals);
    println!("✓ Scan found, notified and saved {} deals", saved.len());
    Ok(())
}

#[tokio::test]
async fn test_repeat_scan_skips_seen_listings() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_healthy_marketplace(&server, catalog_body()).await;
    mount_webhook(&server).await;

    let dir = TempDir::new()?;
    let mut monitor = DealMonitor::new(
        test_client(&server),
        test_evaluator(3),
        monitor_config(&dir.path().join("deals.csv")),
    );
    monitor.add_notifier(Box::new(discord(&server)));

    let first = monitor.scan().await;
    let second = monitor.scan().await;

    assert_eq!(second.listings_fetched, 4);
    assert_eq!(second.new_listings, 0);
    assert!(second.deals.is_empty());
    assert_eq!(requests_to(&server, WEBHOOK_PATH).await, first.deals.len());
    assert_eq!(monitor.deals().len(), first.deals.len());
    assert_eq!(monitor.stats().total_scanned, 8);
    Ok(())
}

#[tokio::test]
async fn test_failing_webhook_does_not_stop_scan() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_healthy_marketplace(&server, catalog_body()).await;
    Mock::given(method("POST"))
        .and(path(WEBHOOK_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = TempDir::new()?;
    let csv_path = dir.path().join("deals.csv");
    let mut monitor = DealMonitor::new(test_client(&server), test_evaluator(3), monitor_config(&csv_path));
    monitor.add_notifier(Box::new(discord(&server)));

    let report = monitor.scan().await;

    assert_eq!(report.deals.len(), 3);
    assert_eq!(report.notifications_sent, 0);
    assert_eq!(report.notifications_failed, 3);
    assert!(csv_path.exists());
    Ok(())
}

#[tokio::test]
async fn test_unreachable_marketplace_still_yields_report() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dir = TempDir::new()?;
    let mut monitor = DealMonitor::new(
        test_client(&server),
        test_evaluator(5),
        monitor_config(&dir.path().join("deals.csv")),
    );

    let report = monitor.scan().await;

    // Fallback catalogue stands in for the live one
    assert!(report.listings_fetched > 0);
    assert_eq!(report.new_listings, report.listings_fetched);
    for deal in &report.deals {
        assert!(deal.id().starts_with("demo"));
        assert!(deal.estimated_profit >= 5.0);
    }
    Ok(())
}
