//! Light/full/bridge node backend (DAS RPC with admin bearer token)

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::rpc::RpcClient;
use super::service_file::{execute_shell_command, ServiceUnit};
use super::{json_bool, json_str, json_u64, ChainClient, ChainRole};
use crate::errors::{ChainError, ConfigError};

pub struct DasClient {
    rpc: RpcClient,
    role: ChainRole,
    binary: Option<String>,
    network: String,
    auth_token: Mutex<Option<String>>,
}

impl DasClient {
    /// Build a client; the node role and binary come from the systemd unit
    /// when one is configured, otherwise the node is assumed to be light.
    pub async fn new(
        endpoint: &str,
        service: Option<&str>,
        network: &str,
        auth_token: Option<String>,
        rpc_timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let (binary, role) = match service {
            Some(service) => {
                let unit = ServiceUnit::load(service).await?;
                let role = unit
                    .subcommand()
                    .ok_or_else(|| ConfigError::MissingRequired {
                        field: format!("{} ExecStart node role", service),
                    })?
                    .parse::<ChainRole>()?;
                (Some(unit.binary().to_string()), role)
            }
            None => (None, ChainRole::Light),
        };

        Self::with_role(endpoint, role, binary, network, auth_token, rpc_timeout)
    }

    pub fn with_role(
        endpoint: &str,
        role: ChainRole,
        binary: Option<String>,
        network: &str,
        auth_token: Option<String>,
        rpc_timeout: Duration,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            rpc: RpcClient::new(endpoint, rpc_timeout)?,
            role,
            binary,
            network: network.to_string(),
            auth_token: Mutex::new(auth_token),
        })
    }

    /// Cached admin token, requested from the node CLI on first use
    async fn token(&self) -> Result<Option<String>, ChainError> {
        let mut token = self.auth_token.lock().await;
        if token.is_none() {
            if let Some(binary) = &self.binary {
                let command = format!(
                    "{} {} auth admin --p2p.network {}",
                    binary, self.role, self.network
                );
                let fetched = execute_shell_command(&command).await?;
                info!("Obtained admin token for {} node", self.role);
                *token = Some(fetched);
            }
        }
        Ok(token.clone())
    }

    async fn sampling_stats(&self) -> Result<Value, ChainError> {
        self.rpc_call("das.SamplingStats", vec![]).await
    }
}

#[async_trait]
impl ChainClient for DasClient {
    fn role(&self) -> ChainRole {
        self.role
    }

    fn kind(&self) -> String {
        let role = self.role.as_str();
        let mut chars = role.chars();
        match chars.next() {
            Some(first) => format!("{}{} node", first.to_uppercase(), chars.as_str()),
            None => "node".to_string(),
        }
    }

    async fn rpc_call(&self, method: &str, params: Vec<Value>) -> Result<Value, ChainError> {
        let token = self.token().await?;
        debug!("DAS RPC {} (authenticated: {})", method, token.is_some());
        self.rpc.call(method, params, token.as_deref()).await
    }

    async fn get_height(&self) -> Result<u64, ChainError> {
        let head = self.rpc_call("header.LocalHead", vec![]).await?;
        json_u64(&head, "header.LocalHead", "/header/height")
    }

    async fn get_network(&self) -> Result<String, ChainError> {
        let head = self.rpc_call("header.NetworkHead", vec![]).await?;
        json_str(&head, "header.NetworkHead", "/header/chain_id")
    }

    async fn get_block_hash(&self) -> Result<String, ChainError> {
        let head = self.rpc_call("header.NetworkHead", vec![]).await?;
        json_str(&head, "header.NetworkHead", "/header/last_block_id/hash")
    }

    async fn get_peer_count(&self) -> Result<u64, ChainError> {
        let peers = self.rpc_call("p2p.Peers", vec![]).await?;
        peers
            .as_array()
            .map(|p| p.len() as u64)
            .ok_or_else(|| ChainError::missing("p2p.Peers", "[]"))
    }

    async fn is_synching(&self) -> Result<bool, ChainError> {
        let stats = self.sampling_stats().await?;
        Ok(!json_bool(&stats, "das.SamplingStats", "/catch_up_done")?)
    }

    async fn get_network_height(&self) -> Result<u64, ChainError> {
        let head = self.rpc_call("header.NetworkHead", vec![]).await?;
        json_u64(&head, "header.NetworkHead", "/header/height")
    }

    async fn get_samples_height(&self) -> Result<u64, ChainError> {
        let stats = self.sampling_stats().await?;
        json_u64(&stats, "das.SamplingStats", "/head_of_sampled_chain")
    }
}
