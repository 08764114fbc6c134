pub mod discord;

pub use discord::DiscordNotifier;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::Deal;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationResult {
    pub success: bool,
    pub message_id: Option<String>,
    pub error: Option<String>,
}

impl NotificationResult {
    pub fn sent(message_id: Option<String>) -> Self {
        Self {
            success: true,
            message_id,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message_id: None,
            error: Some(error.into()),
        }
    }
}

/// Pushes deal alerts to an external channel.
///
/// Delivery problems are reported through the result, never as an error,
/// so a broken webhook cannot stop a scan.
#[async_trait]
pub trait DealNotifier: Send {
    fn name(&self) -> &str;

    async fn send_deal(&mut self, deal: &Deal) -> NotificationResult;
}
