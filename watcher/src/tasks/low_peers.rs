//! Peer count below the configured minimum

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use super::{Alert, Check, Pluggable, Task, TaskContext};
use crate::chain::{ChainClient, ChainRole};
use crate::constants::intervals;
use crate::errors::{ChainError, ConfigError};
use crate::notification::Emoji;

pub struct LowPeers {
    min_peers: u64,
    baseline: Option<u64>,
    low: bool,
}

impl LowPeers {
    pub fn new(min_peers: u64) -> Self {
        Self {
            min_peers,
            baseline: None,
            low: false,
        }
    }

    /// Peer count seen on the first evaluation
    pub fn baseline(&self) -> Option<u64> {
        self.baseline
    }
}

#[async_trait]
impl Check for LowPeers {
    async fn run(
        &mut self,
        chain: &dyn ChainClient,
        _now: DateTime<Utc>,
    ) -> Result<Option<Alert>, ChainError> {
        let peers = chain.get_peer_count().await?;

        if self.baseline.is_none() {
            self.baseline = Some(peers);
            return Ok(None);
        }

        if peers < self.min_peers {
            self.low = true;
            return Ok(Some(Alert::new(
                format!("low peer count: {} (minimum {})", peers, self.min_peers),
                Emoji::LowPeer,
            )));
        }

        if self.low {
            self.low = false;
            return Ok(Some(Alert::recovery(
                format!("peer count recovered: {}", peers),
                Emoji::SyncOk,
            )));
        }

        Ok(None)
    }
}

#[async_trait]
impl Pluggable for LowPeers {
    const NAME: &'static str = "LowPeers";

    fn is_pluggable(_role: ChainRole) -> bool {
        true
    }

    async fn build(ctx: &TaskContext) -> Result<Task, ConfigError> {
        Ok(Task::new(
            Self::NAME,
            Duration::seconds(intervals::LOW_PEERS_CHECK),
            Duration::seconds(intervals::LOW_PEERS_NOTIFY),
            Box::new(Self::new(ctx.config.chain.min_peers)),
        ))
    }
}
