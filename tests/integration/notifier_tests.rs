use super::*;
use flipwatch::config::DiscordConfig;
use flipwatch::models::{Deal, Listing};
use flipwatch::{DealNotifier, DiscordNotifier};
use wiremock::matchers::body_partial_json;

fn deal_with_photo() -> Deal {
    Deal {
        listing: Listing::new(
            "77",
            "Stone Island Ghost Piece Overshirt",
            90.0,
            "Stone Island",
            "https://www.vinted.co.uk/items/77",
        )
        .with_photo("https://images.example/77.jpg"),
        estimated_value: 150.0,
        estimated_profit: 32.05,
        profit_percentage: 35.6,
    }
}

#[tokio::test]
async fn test_discord_receives_deal_embed() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/webhooks/1/abc"))
        .and(body_partial_json(json!({
            "embeds": [{
                "title": "🔥 New Vinted Deal Found!",
                "color": 65280,
                "thumbnail": {"url": "https://images.example/77.jpg"}
            }]
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut notifier = DiscordNotifier::new(DiscordConfig {
        webhook_url: Some(format!("{}/api/webhooks/1/abc", server.uri())),
        min_interval_ms: 0,
        ..DiscordConfig::default()
    })?;

    let result = notifier.send_deal(&deal_with_photo()).await;
    assert!(result.success, "{:?}", result.error);
    Ok(())
}

#[tokio::test]
async fn test_discord_notifications_are_spaced_out() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let mut notifier = DiscordNotifier::new(DiscordConfig {
        webhook_url: Some(format!("{}/hook", server.uri())),
        min_interval_ms: 300,
        ..DiscordConfig::default()
    })?;

    let start = std::time::Instant::now();
    notifier.send_deal(&deal_with_photo()).await;
    notifier.send_deal(&deal_with_photo()).await;

    assert!(start.elapsed() >= std::time::Duration::from_millis(300));
    Ok(())
}
