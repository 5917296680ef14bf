//! Validator node backend (tendermint RPC + governance CLI)

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use super::rpc::RpcClient;
use super::service_file::{execute_shell_command, ServiceUnit};
use super::{json_bool, json_str, json_u64, ChainClient, ChainRole, Proposal, Signature};
use crate::errors::{ChainError, ConfigError};

const VOTING_PERIOD: &str = "PROPOSAL_STATUS_VOTING_PERIOD";

pub struct CelestiaClient {
    rpc: RpcClient,
    service: Option<String>,
}

impl CelestiaClient {
    pub fn new(
        endpoint: &str,
        service: Option<String>,
        rpc_timeout: Duration,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            rpc: RpcClient::new(endpoint, rpc_timeout)?,
            service,
        })
    }

    pub async fn get_version(&self) -> Result<String, ChainError> {
        let info = self.rpc_call("abci_info", vec![]).await?;
        json_str(&info, "abci_info", "/response/version")
    }

    async fn status(&self) -> Result<Value, ChainError> {
        self.rpc_call("status", vec![]).await
    }

    /// Resolve the node binary from the configured systemd unit
    async fn node_binary(&self) -> Result<String, ChainError> {
        let service = self.service.as_deref().ok_or_else(|| ChainError::Command {
            command: "q gov proposals".to_string(),
            reason: "No service file name specified".to_string(),
        })?;

        let unit = ServiceUnit::load(service)
            .await
            .map_err(|e| ChainError::Command {
                command: "q gov proposals".to_string(),
                reason: e.to_string(),
            })?;

        Ok(unit.binary().to_string())
    }
}

/// Keep proposals in voting period and resolve their schema
pub(crate) fn parse_proposals(listing: &Value) -> Result<Vec<Proposal>, ChainError> {
    let proposals = listing
        .get("proposals")
        .and_then(Value::as_array)
        .ok_or_else(|| ChainError::missing("gov proposals", "proposals"))?;

    proposals
        .iter()
        .filter(|p| p.get("status").and_then(Value::as_str) == Some(VOTING_PERIOD))
        .map(Proposal::from_json)
        .collect()
}

#[async_trait]
impl ChainClient for CelestiaClient {
    fn role(&self) -> ChainRole {
        ChainRole::Validator
    }

    fn kind(&self) -> String {
        "Validator node".to_string()
    }

    async fn rpc_call(&self, method: &str, params: Vec<Value>) -> Result<Value, ChainError> {
        self.rpc.call(method, params, None).await
    }

    async fn get_height(&self) -> Result<u64, ChainError> {
        let info = self.rpc_call("abci_info", vec![]).await?;
        json_u64(&info, "abci_info", "/response/last_block_height")
    }

    async fn get_network(&self) -> Result<String, ChainError> {
        let status = self.status().await?;
        json_str(&status, "status", "/node_info/network")
    }

    async fn get_block_hash(&self) -> Result<String, ChainError> {
        let status = self.status().await?;
        json_str(&status, "status", "/sync_info/latest_block_hash")
    }

    async fn get_peer_count(&self) -> Result<u64, ChainError> {
        let net_info = self.rpc_call("net_info", vec![]).await?;
        json_u64(&net_info, "net_info", "/n_peers")
    }

    async fn is_synching(&self) -> Result<bool, ChainError> {
        let status = self.status().await?;
        json_bool(&status, "status", "/sync_info/catching_up")
    }

    async fn get_validator_address(&self) -> Result<String, ChainError> {
        let status = self.status().await?;
        json_str(&status, "status", "/validator_info/address")
    }

    async fn get_signatures(&self, height: u64) -> Result<Vec<Signature>, ChainError> {
        let block = self
            .rpc_call("block", vec![json!(height.to_string())])
            .await?;
        let signatures = block
            .pointer("/block/last_commit/signatures")
            .and_then(Value::as_array)
            .ok_or_else(|| ChainError::missing("block", "/block/last_commit/signatures"))?;

        // absent votes carry an empty or null address
        Ok(signatures
            .iter()
            .map(|s| Signature {
                validator_address: s
                    .get("validator_address")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            })
            .collect())
    }

    async fn is_staking(&self) -> Result<bool, ChainError> {
        let status = self.status().await?;
        Ok(json_u64(&status, "status", "/validator_info/voting_power")? > 0)
    }

    async fn get_latest_proposals(&self) -> Result<Vec<Proposal>, ChainError> {
        let binary = self.node_binary().await?;
        let command = format!("{} q gov proposals --reverse --output json", binary);
        let output = execute_shell_command(&command).await?;

        let listing: Value = serde_json::from_str(&output).map_err(|e| ChainError::Command {
            command: command.clone(),
            reason: format!("invalid JSON output: {}", e),
        })?;

        let proposals = parse_proposals(&listing)?;
        debug!("{} proposal(s) in voting period", proposals.len());
        Ok(proposals)
    }
}
