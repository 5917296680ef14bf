// File: watcher/src/config/mod.rs
pub mod manager;
use serde::{Deserialize, Serialize};
pub use manager::ConfigManager;

use crate::constants::defaults;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_rpc_timeout")]
    pub rpc_timeout_seconds: u64,
    #[serde(default)]
    pub chain: ChainConfig,
    #[serde(default)]
    pub tasks: TasksConfig,
    #[serde(default)]
    pub notification: NotificationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Label prefixed to every notification
    pub name: Option<String>,
    #[serde(default = "default_validator_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_das_endpoint")]
    pub das_endpoint: String,
    /// Bridge node watched by the liveness check on validator machines
    #[serde(default = "default_das_endpoint")]
    pub bridge_endpoint: String,
    /// Overrides the active set size reported by the node
    pub active_set: Option<u64>,
    #[serde(default = "default_block_window")]
    pub block_window: u64,
    #[serde(default = "default_threshold_notsigned")]
    pub threshold_notsigned: u64,
    #[serde(default = "default_min_peers")]
    pub min_peers: u64,
    /// systemd unit running the node binary
    pub service: Option<String>,
    /// systemd unit running the bridge node, if any
    pub bridge_service: Option<String>,
    #[serde(default = "default_das_network")]
    pub network: String,
    /// DAS admin token; fetched through the node CLI when absent
    pub auth_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksConfig {
    /// Mention appended to new-proposal alerts
    pub gov_admin: Option<String>,
    #[serde(default)]
    pub disabled: Vec<String>,
    #[serde(default = "default_tick_seconds")]
    pub tick_seconds: u64,
    #[serde(default = "default_evaluation_timeout")]
    pub evaluation_timeout_seconds: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationConfig {
    pub webhook_url: Option<String>,
    pub telegram_token: Option<String>,
    #[serde(default)]
    pub telegram_chat_ids: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_timeout_seconds: default_rpc_timeout(),
            chain: ChainConfig::default(),
            tasks: TasksConfig::default(),
            notification: NotificationConfig::default(),
        }
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            name: None,
            endpoint: default_validator_endpoint(),
            das_endpoint: default_das_endpoint(),
            bridge_endpoint: default_das_endpoint(),
            active_set: None,
            block_window: default_block_window(),
            threshold_notsigned: default_threshold_notsigned(),
            min_peers: default_min_peers(),
            service: None,
            bridge_service: None,
            network: default_das_network(),
            auth_token: None,
        }
    }
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            gov_admin: None,
            disabled: Vec::new(),
            tick_seconds: default_tick_seconds(),
            evaluation_timeout_seconds: default_evaluation_timeout(),
        }
    }
}

impl TasksConfig {
    pub fn is_disabled(&self, task_name: &str) -> bool {
        self.disabled.iter().any(|name| name == task_name)
    }
}

fn default_rpc_timeout() -> u64 {
    defaults::RPC_TIMEOUT_SECONDS
}

fn default_validator_endpoint() -> String {
    defaults::VALIDATOR_ENDPOINT.to_string()
}

fn default_das_endpoint() -> String {
    defaults::DAS_ENDPOINT.to_string()
}

fn default_block_window() -> u64 {
    defaults::BLOCK_WINDOW
}

fn default_threshold_notsigned() -> u64 {
    defaults::THRESHOLD_NOTSIGNED
}

fn default_min_peers() -> u64 {
    defaults::MIN_PEERS
}

fn default_das_network() -> String {
    defaults::DAS_NETWORK.to_string()
}

fn default_tick_seconds() -> u64 {
    defaults::TICK_SECONDS
}

fn default_evaluation_timeout() -> u64 {
    defaults::EVALUATION_TIMEOUT_SECONDS
}
