//! This module provides reusable test utilities:
//! - In-memory chain backend with scriptable state
//! - Recording notifier
//! - Mock HTTP servers (JSON-RPC node, webhook)
//! - Test configuration builder

// Not every test binary uses every fixture
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod mock_chain;
pub mod mock_rpc;
pub mod mock_webhook;
pub mod recording_notifier;
pub mod test_config;

pub use mock_chain::MockChain;
pub use mock_rpc::MockRpcServer;
pub use mock_webhook::MockWebhookServer;
pub use recording_notifier::RecordingNotifier;
pub use test_config::TestConfigBuilder;

use chrono::{DateTime, Duration, TimeZone, Utc};

/// Fixed clock origin plus the given number of minutes
pub fn at(minute: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() + Duration::minutes(minute)
}
