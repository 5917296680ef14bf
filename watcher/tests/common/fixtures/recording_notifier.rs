//! Notifier that keeps every delivered message in memory

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use watcher::notification::{NotificationEvent, Notifier};

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<String>>>,
    events: Arc<Mutex<Vec<NotificationEvent>>>,
    accept: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            accept: true,
            ..Self::default()
        }
    }

    /// A channel that receives messages but reports every delivery as failed
    pub fn rejecting() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn events(&self) -> Vec<NotificationEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send(&self, message: &str, event: &NotificationEvent) -> bool {
        self.messages.lock().unwrap().push(message.to_string());
        self.events.lock().unwrap().push(event.clone());
        self.accept
    }
}
