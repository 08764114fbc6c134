use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, error, info};

use super::{DealNotifier, NotificationResult};
use crate::config::DiscordConfig;
use crate::models::Deal;
use crate::utils::error::Result;
use crate::utils::money::format_gbp;
use crate::utils::rate_limit::RateLimiter;

const EMBED_TITLE: &str = "🔥 New Vinted Deal Found!";
const EMBED_COLOR: u32 = 0x00ff00;

pub struct DiscordNotifier {
    client: Client,
    config: DiscordConfig,
    limiter: RateLimiter,
}

impl DiscordNotifier {
    pub fn new(config: DiscordConfig) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            client,
            limiter: RateLimiter::new(Duration::from_millis(config.min_interval_ms)),
            config,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.config
            .webhook_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }

    fn create_embed(&self, deal: &Deal) -> Value {
        let mut embed = json!({
            "title": EMBED_TITLE,
            "color": EMBED_COLOR,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "fields": [
                {
                    "name": "Item",
                    "value": deal.title(),
                    "inline": false
                },
                {
                    "name": "Price",
                    "value": format_gbp(deal.price()),
                    "inline": true
                },
                {
                    "name": "Potential Profit",
                    "value": format_gbp(deal.estimated_profit),
                    "inline": true
                },
                {
                    "name": "Profit %",
                    "value": format!("{:.1}%", deal.profit_percentage),
                    "inline": true
                },
                {
                    "name": "Link",
                    "value": deal.listing.url,
                    "inline": false
                }
            ]
        });

        if let Some(photo) = deal.listing.photo.as_deref().filter(|p| !p.is_empty()) {
            embed["thumbnail"] = json!({ "url": photo });
        }

        embed
    }

    pub fn create_webhook_payload(&self, deal: &Deal) -> Value {
        let mut payload = json!({
            "embeds": [self.create_embed(deal)]
        });

        if !self.config.username.is_empty() {
            payload["username"] = json!(self.config.username);
        }

        if let Some(avatar_url) = &self.config.avatar_url {
            payload["avatar_url"] = json!(avatar_url);
        }

        payload
    }
}

#[async_trait]
impl DealNotifier for DiscordNotifier {
    fn name(&self) -> &str {
        "discord"
    }

    async fn send_deal(&mut self, deal: &Deal) -> NotificationResult {
        let Some(webhook_url) = self
            .config
            .webhook_url
            .clone()
            .filter(|url| !url.trim().is_empty())
        else {
            debug!("Discord webhook not configured, skipping '{}'", deal.title());
            return NotificationResult::failed("webhook not configured");
        };

        self.limiter.acquire().await;
        let payload = self.create_webhook_payload(deal);

        let result = match self.client.post(&webhook_url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {
                let message_id = response
                    .json::<Value>()
                    .await
                    .ok()
                    .and_then(|body| body.get("id").and_then(Value::as_str).map(str::to_string));
                info!("Sent Discord notification for '{}'", deal.title());
                NotificationResult::sent(message_id)
            }
            Ok(response) => {
                let status = response.status();
                error!("Discord webhook rejected notification: HTTP {}", status);
                NotificationResult::failed(format!("HTTP {}", status.as_u16()))
            }
            Err(e) => {
                error!("Error sending Discord notification: {}", e);
                NotificationResult::failed(e.to_string())
            }
        };

        let status = if result.success { "sent" } else { "failed" };
        metrics::counter!("flipwatch_notifications_total", "status" => status).increment(1);
        result
    }
}
