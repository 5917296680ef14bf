//! Mock webhook server for testing alert delivery
//!
//! This simulates a webhook endpoint that receives alerts,
//! allowing tests to verify the payloads that were posted.

use serde_json::Value;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

pub struct MockWebhookServer {
    pub server: MockServer,
    pub base_url: String,
}

impl MockWebhookServer {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let base_url = server.uri();
        Self { server, base_url }
    }

    pub fn webhook_url(&self) -> String {
        format!("{}/webhook", self.base_url)
    }

    /// Mock successful webhook delivery
    pub async fn mock_success(&self) {
        Mock::given(method("POST"))
            .and(path("/webhook"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&self.server)
            .await;
    }

    /// Mock webhook rejecting every alert
    pub async fn mock_failure(&self) {
        Mock::given(method("POST"))
            .and(path("/webhook"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&self.server)
            .await;
    }

    /// Mock the Bot API `sendMessage` endpoint for a token
    pub async fn mock_telegram(&self, token: &str, status: u16) {
        Mock::given(method("POST"))
            .and(path(format!("/bot{}/sendMessage", token)))
            .respond_with(ResponseTemplate::new(status).set_body_json(serde_json::json!({
                "ok": status == 200
            })))
            .mount(&self.server)
            .await;
    }

    /// JSON bodies received so far
    pub async fn received(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|req| req.body_json::<Value>().ok())
            .collect()
    }
}
