use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::{NotificationEvent, Notifier};

const TELEGRAM_API: &str = "https://api.telegram.org";

/// Sends alerts through the Telegram Bot API to every configured chat
pub struct TelegramNotifier {
    api_base: String,
    token: String,
    chat_ids: Vec<String>,
    client: Client,
    timeout: Duration,
}

impl TelegramNotifier {
    pub fn new(
        token: String,
        chat_ids: Vec<String>,
        request_timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Self::with_api_base(TELEGRAM_API.to_string(), token, chat_ids, request_timeout)
    }

    pub fn with_api_base(
        api_base: String,
        token: String,
        chat_ids: Vec<String>,
        request_timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(request_timeout).build()?;

        Ok(Self {
            api_base,
            token,
            chat_ids,
            client,
            timeout: request_timeout,
        })
    }

    async fn send_to(&self, chat_id: &str, text: &str) -> bool {
        let url = format!(
            "{}/bot{}/sendMessage",
            self.api_base.trim_end_matches('/'),
            self.token
        );
        let body = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "disable_web_page_preview": true
        });

        match timeout(self.timeout, self.client.post(&url).json(&body).send()).await {
            Ok(Ok(response)) if response.status().is_success() => {
                debug!("Telegram message delivered to {}", chat_id);
                true
            }
            Ok(Ok(response)) => {
                warn!("Telegram returned status {} for chat {}", response.status(), chat_id);
                false
            }
            Ok(Err(e)) => {
                warn!("Telegram request failed for chat {}: {}", chat_id, e);
                false
            }
            Err(_) => {
                warn!("Telegram request timeout for chat {}", chat_id);
                false
            }
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send(&self, message: &str, _event: &NotificationEvent) -> bool {
        let mut delivered = false;
        for chat_id in &self.chat_ids {
            delivered |= self.send_to(chat_id, message).await;
        }
        delivered
    }
}
