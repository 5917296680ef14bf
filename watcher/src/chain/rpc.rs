//! JSON-RPC call primitive shared by both node backends

use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;
use uuid::Uuid;

use crate::errors::{ChainError, ConfigError};

#[derive(Debug, Clone)]
pub struct RpcClient {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl RpcClient {
    pub fn new(endpoint: &str, rpc_timeout: Duration) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(rpc_timeout)
            .build()
            .map_err(|e| ConfigError::InvalidValue {
                field: "rpc_timeout_seconds".to_string(),
                reason: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            timeout: rpc_timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST a JSON-RPC 2.0 request and return its `result` member
    pub async fn call(
        &self,
        method: &str,
        params: Vec<Value>,
        bearer: Option<&str>,
    ) -> Result<Value, ChainError> {
        let request_body = serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": Uuid::new_v4().to_string()
        });

        let mut request = self.client.post(&self.endpoint).json(&request_body);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        debug!("RPC {} -> {}", method, self.endpoint);

        let response = timeout(self.timeout, request.send())
            .await
            .map_err(|_| ChainError::Timeout {
                method: method.to_string(),
            })?
            .map_err(|e| transport_error(method, e))?;

        if !response.status().is_success() {
            return Err(ChainError::Transport {
                method: method.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ChainError::Transport {
                method: method.to_string(),
                reason: format!("Failed to parse JSON response: {}", e),
            })?;

        into_result(method, body)
    }
}

/// Split a JSON-RPC envelope into its result or error
pub(crate) fn into_result(method: &str, mut body: Value) -> Result<Value, ChainError> {
    if let Some(error) = body.get("error").filter(|e| !e.is_null()) {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        let message = match error.get("data").and_then(Value::as_str) {
            Some(data) if !data.is_empty() => format!("{} ({})", message, data),
            _ => message,
        };
        return Err(ChainError::Rpc {
            method: method.to_string(),
            message,
        });
    }

    match body.get_mut("result") {
        Some(result) => Ok(result.take()),
        None => Err(ChainError::missing(method, "result")),
    }
}

fn transport_error(method: &str, e: reqwest::Error) -> ChainError {
    if e.is_timeout() {
        ChainError::Timeout {
            method: method.to_string(),
        }
    } else {
        ChainError::Transport {
            method: method.to_string(),
            reason: e.to_string(),
        }
    }
}
