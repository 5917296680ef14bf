use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

use super::{NotificationEvent, Notifier};

#[derive(Debug, Clone, Serialize)]
pub struct WebhookPayload<'a> {
    pub timestamp: DateTime<Utc>,
    pub task: &'a str,
    pub message: &'a str,
    pub emoji: &'a str,
}

/// POSTs each alert as JSON to a generic webhook
pub struct WebhookNotifier {
    webhook_url: String,
    client: Client,
    timeout: Duration,
}

impl WebhookNotifier {
    pub fn new(webhook_url: String, request_timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(request_timeout).build()?;

        Ok(Self {
            webhook_url,
            client,
            timeout: request_timeout,
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn send(&self, message: &str, event: &NotificationEvent) -> bool {
        let payload = WebhookPayload {
            timestamp: event.timestamp,
            task: &event.task,
            message,
            emoji: event.emoji.glyph(),
        };

        match timeout(
            self.timeout,
            self.client.post(&self.webhook_url).json(&payload).send(),
        )
        .await
        {
            Ok(Ok(response)) => {
                if response.status().is_success() {
                    info!("Alert sent successfully for {}", event.task);
                    true
                } else {
                    warn!(
                        "Alert webhook returned status: {} for {}",
                        response.status(),
                        event.task
                    );
                    false
                }
            }
            Ok(Err(e)) => {
                warn!("Failed to send alert for {}: {}", event.task, e);
                false
            }
            Err(_) => {
                warn!("Alert webhook timeout for {}", event.task);
                false
            }
        }
    }
}
