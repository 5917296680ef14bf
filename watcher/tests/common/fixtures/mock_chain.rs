//! In-memory chain backend for exercising checks without a node

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use watcher::chain::{ChainClient, ChainRole, Proposal, Signature};
use watcher::errors::ChainError;

pub const VALIDATOR_ADDRESS: &str = "ABCDEF0123456789";

#[derive(Debug, Clone)]
pub struct ChainState {
    pub height: u64,
    pub network_height: u64,
    pub samples_height: u64,
    pub network: String,
    pub block_hash: String,
    pub peers: u64,
    pub synching: bool,
    pub staking: bool,
    pub validator_address: String,
    /// Heights whose commit does not carry our signature
    pub missed: HashSet<u64>,
    /// Validator addresses ordered by voting power
    pub validators: Vec<String>,
    pub proposals: Vec<Proposal>,
    /// Every query fails with a transport error while set
    pub failing: bool,
    /// Every query sleeps this long before answering
    pub delay: Option<Duration>,
}

impl Default for ChainState {
    fn default() -> Self {
        Self {
            height: 1_000,
            network_height: 1_000,
            samples_height: 1_000,
            network: "mocha-4".to_string(),
            block_hash: "HASH1000".to_string(),
            peers: 10,
            synching: false,
            staking: true,
            validator_address: VALIDATOR_ADDRESS.to_string(),
            missed: HashSet::new(),
            validators: Vec::new(),
            proposals: Vec::new(),
            failing: false,
            delay: None,
        }
    }
}

pub struct MockChain {
    role: ChainRole,
    state: Mutex<ChainState>,
    calls: Mutex<Vec<(String, Vec<Value>)>>,
}

impl MockChain {
    pub fn new(role: ChainRole) -> Self {
        Self::with_state(role, ChainState::default())
    }

    pub fn with_state(role: ChainRole, state: ChainState) -> Self {
        Self {
            role,
            state: Mutex::new(state),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn validator() -> Self {
        Self::new(ChainRole::Validator)
    }

    /// Mutate the scripted state between evaluations
    pub fn update<F: FnOnce(&mut ChainState)>(&self, f: F) {
        f(&mut self.state.lock().unwrap());
    }

    pub fn rpc_calls(&self) -> Vec<(String, Vec<Value>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Fill the validator set with `total` entries, ours at `rank` (1-based)
    pub fn set_validators(&self, total: usize, rank: Option<usize>) {
        self.update(|s| {
            s.validators = (1..=total).map(|i| format!("VAL{:04}", i)).collect();
            if let Some(rank) = rank {
                s.validators[rank - 1] = s.validator_address.clone();
            }
        });
    }

    async fn read(&self, method: &str) -> Result<ChainState, ChainError> {
        let state = self.state.lock().unwrap().clone();
        if let Some(delay) = state.delay {
            tokio::time::sleep(delay).await;
        }
        if state.failing {
            return Err(ChainError::Transport {
                method: method.to_string(),
                reason: "connection refused".to_string(),
            });
        }
        Ok(state)
    }

    fn validators_page(state: &ChainState, params: &[Value]) -> Value {
        let arg = |i: usize| {
            params
                .get(i)
                .and_then(Value::as_str)
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(1)
        };
        let page = arg(1);
        let per_page = arg(2);
        let start = (page - 1) * per_page;
        let entries: Vec<Value> = state
            .validators
            .iter()
            .skip(start)
            .take(per_page)
            .map(|address| json!({ "address": address, "voting_power": "1000" }))
            .collect();

        json!({
            "block_height": state.height.to_string(),
            "validators": entries,
            "count": entries.len().to_string(),
            "total": state.validators.len().to_string(),
        })
    }
}

#[async_trait]
impl ChainClient for MockChain {
    fn role(&self) -> ChainRole {
        self.role
    }

    fn kind(&self) -> String {
        format!("Mock {} node", self.role)
    }

    async fn rpc_call(&self, method: &str, params: Vec<Value>) -> Result<Value, ChainError> {
        self.calls
            .lock()
            .unwrap()
            .push((method.to_string(), params.clone()));
        let state = self.read(method).await?;

        match method {
            "validators" => Ok(Self::validators_page(&state, &params)),
            other => Err(ChainError::Rpc {
                method: other.to_string(),
                message: "Method not found".to_string(),
            }),
        }
    }

    async fn get_height(&self) -> Result<u64, ChainError> {
        Ok(self.read("get_height").await?.height)
    }

    async fn get_network(&self) -> Result<String, ChainError> {
        Ok(self.read("get_network").await?.network)
    }

    async fn get_block_hash(&self) -> Result<String, ChainError> {
        Ok(self.read("get_block_hash").await?.block_hash)
    }

    async fn get_peer_count(&self) -> Result<u64, ChainError> {
        Ok(self.read("get_peer_count").await?.peers)
    }

    async fn is_synching(&self) -> Result<bool, ChainError> {
        Ok(self.read("is_synching").await?.synching)
    }

    async fn get_network_height(&self) -> Result<u64, ChainError> {
        Ok(self.read("get_network_height").await?.network_height)
    }

    async fn get_validator_address(&self) -> Result<String, ChainError> {
        Ok(self.read("get_validator_address").await?.validator_address)
    }

    async fn get_signatures(&self, height: u64) -> Result<Vec<Signature>, ChainError> {
        let state = self.read("get_signatures").await?;
        let mut signatures = vec![Signature {
            validator_address: "OTHERVALIDATOR".to_string(),
        }];
        if !state.missed.contains(&height) {
            signatures.push(Signature {
                validator_address: state.validator_address.clone(),
            });
        }
        Ok(signatures)
    }

    async fn is_staking(&self) -> Result<bool, ChainError> {
        Ok(self.read("is_staking").await?.staking)
    }

    async fn get_latest_proposals(&self) -> Result<Vec<Proposal>, ChainError> {
        Ok(self.read("get_latest_proposals").await?.proposals)
    }

    async fn get_samples_height(&self) -> Result<u64, ChainError> {
        Ok(self.read("get_samples_height").await?.samples_height)
    }
}

/// Voting-period proposal in the current gov schema
pub fn proposal(id: u64) -> Proposal {
    Proposal::Current {
        id,
        title: format!("Proposal {}", id),
    }
}
