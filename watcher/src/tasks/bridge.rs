//! Liveness of the bridge node running next to a validator

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::debug;

use super::{Alert, Check, Pluggable, Task, TaskContext};
use crate::chain::{ChainClient, ChainRole, DasClient};
use crate::constants::intervals;
use crate::errors::{ChainError, ConfigError};
use crate::notification::Emoji;

pub struct BridgeNotRunning {
    bridge: Arc<dyn ChainClient>,
}

impl BridgeNotRunning {
    pub fn new(bridge: Arc<dyn ChainClient>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Check for BridgeNotRunning {
    async fn run(
        &mut self,
        _chain: &dyn ChainClient,
        _now: DateTime<Utc>,
    ) -> Result<Option<Alert>, ChainError> {
        match self.bridge.get_network().await {
            Ok(network) => {
                debug!("Bridge node answering on {}", network);
                Ok(None)
            }
            Err(e) => {
                debug!("Bridge node unreachable: {}", e);
                Ok(Some(Alert::new("Bridge node is not running!", Emoji::NoLeader)))
            }
        }
    }
}

#[async_trait]
impl Pluggable for BridgeNotRunning {
    const NAME: &'static str = "BridgeNotRunning";

    fn is_pluggable(_role: ChainRole) -> bool {
        true
    }

    async fn build(ctx: &TaskContext) -> Result<Task, ConfigError> {
        let chain = &ctx.config.chain;
        let bridge = match chain.bridge_service.as_deref() {
            Some(service) => {
                DasClient::new(
                    &chain.bridge_endpoint,
                    Some(service),
                    &chain.network,
                    chain.auth_token.clone(),
                    ctx.rpc_timeout(),
                )
                .await?
            }
            None => DasClient::with_role(
                &chain.bridge_endpoint,
                ChainRole::Bridge,
                None,
                &chain.network,
                chain.auth_token.clone(),
                ctx.rpc_timeout(),
            )?,
        };

        Ok(Task::new(
            Self::NAME,
            Duration::seconds(intervals::BRIDGE_CHECK),
            Duration::seconds(intervals::BRIDGE_NOTIFY),
            Box::new(Self::new(Arc::new(bridge))),
        ))
    }
}
