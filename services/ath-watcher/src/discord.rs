//! Discord-style webhook sink

use std::sync::Arc;

use async_trait::async_trait;

use crate::io::HttpClient;
use crate::notifier::{Notifier, WebhookMessage};

/// Posts messages as JSON to a webhook URL
pub struct DiscordWebhook {
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for DiscordWebhook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordWebhook").finish_non_exhaustive()
    }
}

impl DiscordWebhook {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Notifier for DiscordWebhook {
    fn type_name(&self) -> &str {
        "discord"
    }

    async fn send(&self, sink_url: &str, message: &WebhookMessage) -> crate::Result<()> {
        let body = serde_json::to_value(message)?;

        tracing::debug!(
            "Sending webhook message with {} embed(s)",
            message.embeds.len()
        );

        let response = self
            .http
            .post_json(sink_url, &body)
            .await
            .map_err(|e| crate::WatcherError::Notify(e.to_string()))?;

        if !response.is_success() {
            return Err(crate::WatcherError::Notify(format!(
                "Webhook returned status {}: {}",
                response.status, response.body
            )));
        }

        tracing::debug!("Webhook message delivered");
        Ok(())
    }
}
