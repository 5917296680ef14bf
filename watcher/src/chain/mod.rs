//! Chain abstraction used by every check
//!
//! A node exposes a role-dependent subset of queries over the same RPC call
//! primitive. The backend is chosen once at startup by [`detect_chain`].

pub mod celestia;
pub mod das;
pub mod rpc;
pub mod service_file;

pub use celestia::CelestiaClient;
pub use das::DasClient;
pub use rpc::RpcClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::Config;
use crate::errors::{ChainError, ConfigError, WatcherError};

/// Role of the monitored node, decides which tasks are pluggable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainRole {
    Validator,
    Full,
    Light,
    Bridge,
}

impl ChainRole {
    /// Roles that run data availability sampling
    pub fn is_das(&self) -> bool {
        !matches!(self, ChainRole::Validator)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChainRole::Validator => "validator",
            ChainRole::Full => "full",
            ChainRole::Light => "light",
            ChainRole::Bridge => "bridge",
        }
    }
}

impl fmt::Display for ChainRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChainRole {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "validator" => Ok(ChainRole::Validator),
            "full" => Ok(ChainRole::Full),
            "light" => Ok(ChainRole::Light),
            "bridge" => Ok(ChainRole::Bridge),
            other => Err(ConfigError::InvalidValue {
                field: "node role".to_string(),
                reason: format!("unknown role '{}'", other),
            }),
        }
    }
}

/// One commit signature of a block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    #[serde(default)]
    pub validator_address: String,
}

/// Entry of the `validators` RPC listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatorEntry {
    pub address: String,
}

/// Governance proposal, resolved once per fetch from either field scheme
#[derive(Debug, Clone, PartialEq)]
pub enum Proposal {
    /// gov v1: `{id, messages[0].content.title}`
    Current { id: u64, title: String },
    /// gov v1beta1: `{proposal_id, content.title}`
    Legacy { proposal_id: u64, title: String },
}

impl Proposal {
    pub fn id(&self) -> u64 {
        match self {
            Proposal::Current { id, .. } => *id,
            Proposal::Legacy { proposal_id, .. } => *proposal_id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Proposal::Current { title, .. } | Proposal::Legacy { title, .. } => title,
        }
    }

    pub fn from_json(value: &Value) -> Result<Self, ChainError> {
        const METHOD: &str = "gov proposals";

        if let Some(id) = value.get("id") {
            let id = lenient_u64(id).ok_or_else(|| ChainError::missing(METHOD, "id"))?;
            let title = value
                .pointer("/messages/0/content/title")
                .or_else(|| value.get("title"))
                .and_then(Value::as_str)
                .ok_or_else(|| ChainError::missing(METHOD, "messages[0].content.title"))?;
            return Ok(Proposal::Current {
                id,
                title: title.to_string(),
            });
        }

        if let Some(proposal_id) = value.get("proposal_id") {
            let proposal_id = lenient_u64(proposal_id)
                .ok_or_else(|| ChainError::missing(METHOD, "proposal_id"))?;
            let title = value
                .pointer("/content/title")
                .and_then(Value::as_str)
                .ok_or_else(|| ChainError::missing(METHOD, "content.title"))?;
            return Ok(Proposal::Legacy {
                proposal_id,
                title: title.to_string(),
            });
        }

        Err(ChainError::missing(METHOD, "id|proposal_id"))
    }
}

/// Node-state queries the checks rely on.
///
/// Queries a role does not expose keep the default body and answer
/// [`ChainError::Unsupported`].
#[async_trait]
pub trait ChainClient: Send + Sync {
    fn role(&self) -> ChainRole;

    /// Human readable node type, e.g. "Validator node"
    fn kind(&self) -> String;

    async fn rpc_call(&self, method: &str, params: Vec<Value>) -> Result<Value, ChainError>;

    async fn get_height(&self) -> Result<u64, ChainError>;

    async fn get_network(&self) -> Result<String, ChainError>;

    async fn get_block_hash(&self) -> Result<String, ChainError>;

    async fn get_peer_count(&self) -> Result<u64, ChainError>;

    async fn is_synching(&self) -> Result<bool, ChainError>;

    async fn get_network_height(&self) -> Result<u64, ChainError> {
        Err(ChainError::unsupported("get_network_height", self.role()))
    }

    async fn get_validator_address(&self) -> Result<String, ChainError> {
        Err(ChainError::unsupported("get_validator_address", self.role()))
    }

    async fn get_signatures(&self, _height: u64) -> Result<Vec<Signature>, ChainError> {
        Err(ChainError::unsupported("get_signatures", self.role()))
    }

    async fn is_staking(&self) -> Result<bool, ChainError> {
        Err(ChainError::unsupported("is_staking", self.role()))
    }

    /// Proposals in voting period, newest first
    async fn get_latest_proposals(&self) -> Result<Vec<Proposal>, ChainError> {
        Err(ChainError::unsupported("get_latest_proposals", self.role()))
    }

    async fn get_samples_height(&self) -> Result<u64, ChainError> {
        Err(ChainError::unsupported("get_samples_height", self.role()))
    }
}

/// Query the configured endpoints and return the backend that answers.
///
/// The validator RPC is tried first, then the DAS RPC.
pub async fn detect_chain(config: &Config) -> Result<Arc<dyn ChainClient>, WatcherError> {
    let timeout = Duration::from_secs(config.rpc_timeout_seconds);

    let validator = CelestiaClient::new(
        &config.chain.endpoint,
        config.chain.service.clone(),
        timeout,
    )?;
    match validator.get_version().await {
        Ok(version) => {
            info!("Detected validator node at {} (version {})", config.chain.endpoint, version);
            return Ok(Arc::new(validator));
        }
        Err(e) => debug!("Validator RPC not answering: {}", e),
    }

    let das = match DasClient::new(
        &config.chain.das_endpoint,
        config.chain.service.as_deref(),
        &config.chain.network,
        config.chain.auth_token.clone(),
        timeout,
    )
    .await
    {
        Ok(das) => das,
        Err(e) => return Err(no_node_detected(config, e)),
    };
    match das.get_network().await {
        Ok(network) => {
            info!(
                "Detected {} at {} on network {}",
                das.kind(),
                config.chain.das_endpoint,
                network
            );
            Ok(Arc::new(das))
        }
        Err(e) => Err(no_node_detected(config, e)),
    }
}

fn no_node_detected(config: &Config, cause: impl fmt::Display) -> WatcherError {
    WatcherError::Other(format!(
        "No supported node detected (validator RPC {}, DAS RPC {}): {}",
        config.chain.endpoint, config.chain.das_endpoint, cause
    ))
}

/// Read a u64 that nodes encode either as number or as decimal string
pub(crate) fn lenient_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn json_u64(value: &Value, method: &str, pointer: &str) -> Result<u64, ChainError> {
    value
        .pointer(pointer)
        .and_then(lenient_u64)
        .ok_or_else(|| ChainError::missing(method, pointer))
}

pub(crate) fn json_str(value: &Value, method: &str, pointer: &str) -> Result<String, ChainError> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ChainError::missing(method, pointer))
}

pub(crate) fn json_bool(value: &Value, method: &str, pointer: &str) -> Result<bool, ChainError> {
    value
        .pointer(pointer)
        .and_then(Value::as_bool)
        .ok_or_else(|| ChainError::missing(method, pointer))
}
