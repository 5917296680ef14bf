//! Notification events and delivery channels
//!
//! Checks produce [`NotificationEvent`]s; the [`Notification`] dispatcher
//! prefixes them with the node label and fans them out to every configured
//! [`Notifier`].

mod telegram;
mod webhook;

pub use telegram::TelegramNotifier;
pub use webhook::WebhookNotifier;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::constants::defaults;

/// Severity glyph embedded in every message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Emoji {
    BlockMiss,
    PosUp,
    PosDown,
    NoLeader,
    Proposal,
    Stuck,
    Slow,
    SyncOk,
    LowPeer,
}

impl Emoji {
    pub fn glyph(&self) -> &'static str {
        match self {
            Emoji::BlockMiss => "❗",
            Emoji::PosUp => "📈",
            Emoji::PosDown => "📉",
            Emoji::NoLeader => "🚨",
            Emoji::Proposal => "📜",
            Emoji::Stuck => "⏳",
            Emoji::Slow => "🐢",
            Emoji::SyncOk => "✅",
            Emoji::LowPeer => "📡",
        }
    }
}

impl fmt::Display for Emoji {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

/// Alert produced by one task evaluation, consumed once by the dispatcher
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationEvent {
    pub task: String,
    pub message: String,
    pub emoji: Emoji,
    pub timestamp: DateTime<Utc>,
}

impl NotificationEvent {
    /// Message text with the severity glyph appended
    pub fn text(&self) -> String {
        format!("{} {}", self.message, self.emoji)
    }
}

/// Delivery channel for formatted messages
#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;

    /// Deliver one message, returning whether it was accepted
    async fn send(&self, message: &str, event: &NotificationEvent) -> bool;
}

/// Fan-out over every configured channel
pub struct Notification {
    prefix: String,
    notifiers: Vec<Box<dyn Notifier>>,
}

impl Notification {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            notifiers: Vec::new(),
        }
    }

    /// Build channels from the `[notification]` section
    pub fn from_config(config: &Config, prefix: impl Into<String>) -> Self {
        let mut notification = Self::new(prefix);
        let timeout = Duration::from_secs(defaults::NOTIFY_TIMEOUT_SECONDS);

        if let Some(url) = &config.notification.webhook_url {
            match WebhookNotifier::new(url.clone(), timeout) {
                Ok(webhook) => notification.add(Box::new(webhook)),
                Err(e) => warn!("Webhook notifier disabled: {}", e),
            }
        }

        if let Some(token) = &config.notification.telegram_token {
            if config.notification.telegram_chat_ids.is_empty() {
                warn!("Telegram token configured without chat ids, skipping");
            } else {
                match TelegramNotifier::new(
                    token.clone(),
                    config.notification.telegram_chat_ids.clone(),
                    timeout,
                ) {
                    Ok(telegram) => notification.add(Box::new(telegram)),
                    Err(e) => warn!("Telegram notifier disabled: {}", e),
                }
            }
        }

        notification
    }

    pub fn add(&mut self, notifier: Box<dyn Notifier>) {
        info!("Notification channel enabled: {}", notifier.name());
        self.notifiers.push(notifier);
    }

    pub fn is_enabled(&self) -> bool {
        !self.notifiers.is_empty()
    }

    pub fn format(&self, event: &NotificationEvent) -> String {
        if self.prefix.is_empty() {
            event.text()
        } else {
            format!("{} {}", self.prefix, event.text())
        }
    }

    /// Deliver to all channels; true if at least one accepted the message
    pub async fn notify(&self, event: &NotificationEvent) -> bool {
        let message = self.format(event);
        info!(task = %event.task, "{}", message);

        if self.notifiers.is_empty() {
            debug!("No notification channel configured, alert only logged");
            return false;
        }

        let results = join_all(self.notifiers.iter().map(|n| n.send(&message, event))).await;
        let delivered = results.iter().filter(|ok| **ok).count();
        if delivered < results.len() {
            warn!(
                task = %event.task,
                "Alert delivered to {}/{} channels",
                delivered,
                results.len()
            );
        }
        delivered > 0
    }
}
