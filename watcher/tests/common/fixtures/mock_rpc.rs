//! Mock JSON-RPC server for testing node interactions
//!
//! Requests are routed on the JSON-RPC `method` member, so one server can
//! answer a whole backend.

use serde_json::{json, Value};
use wiremock::{
    matchers::{body_partial_json, header, method},
    Mock, MockServer, ResponseTemplate,
};

pub struct MockRpcServer {
    pub server: MockServer,
    pub base_url: String,
}

impl MockRpcServer {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let base_url = server.uri();
        Self { server, base_url }
    }

    /// Answer `rpc_method` with the given `result`
    pub async fn mock_result(&self, rpc_method: &str, result: Value) {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "method": rpc_method })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": "1",
                "result": result
            })))
            .mount(&self.server)
            .await;
    }

    /// Answer `rpc_method` only when the bearer token matches
    pub async fn mock_authenticated(&self, rpc_method: &str, token: &str, result: Value) {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "method": rpc_method })))
            .and(header("authorization", format!("Bearer {}", token).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": "1",
                "result": result
            })))
            .mount(&self.server)
            .await;
    }

    /// Answer `rpc_method` with a JSON-RPC error object
    pub async fn mock_error(&self, rpc_method: &str, code: i64, message: &str) {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "method": rpc_method })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": "1",
                "error": { "code": code, "message": message }
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock unhealthy node (HTTP failure on every call)
    pub async fn mock_unhealthy(&self) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&self.server)
            .await;
    }

    /// Validator node answering the tendermint RPC
    pub async fn mock_validator_node(&self, network: &str, height: u64, voting_power: u64) {
        self.mock_result(
            "abci_info",
            json!({
                "response": {
                    "data": "celestia-app",
                    "version": "1.3.0",
                    "last_block_height": height.to_string()
                }
            }),
        )
        .await;
        self.mock_result(
            "status",
            json!({
                "node_info": { "network": network, "moniker": "test-node" },
                "sync_info": {
                    "latest_block_hash": format!("HASH{}", height),
                    "latest_block_height": height.to_string(),
                    "catching_up": false
                },
                "validator_info": {
                    "address": "ABCDEF0123456789",
                    "voting_power": voting_power.to_string()
                }
            }),
        )
        .await;
        self.mock_result("net_info", json!({ "listening": true, "n_peers": "7" }))
            .await;
    }

    /// DAS node answering the header/das/p2p namespaces
    pub async fn mock_das_node(&self, network: &str, local: u64, network_head: u64, sampled: u64) {
        self.mock_result(
            "header.LocalHead",
            json!({ "header": { "height": local.to_string(), "chain_id": network } }),
        )
        .await;
        self.mock_result(
            "header.NetworkHead",
            json!({
                "header": {
                    "height": network_head.to_string(),
                    "chain_id": network,
                    "last_block_id": { "hash": format!("HASH{}", network_head) }
                }
            }),
        )
        .await;
        self.mock_result(
            "das.SamplingStats",
            json!({
                "head_of_sampled_chain": sampled,
                "head_of_catchup": sampled,
                "network_head_height": network_head,
                "catch_up_done": true,
                "is_running": true
            }),
        )
        .await;
        self.mock_result("p2p.Peers", json!(["peer-a", "peer-b", "peer-c"]))
            .await;
    }
}
