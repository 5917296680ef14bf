//! Custom error types for the node watcher
//!
//! Chain errors are recoverable and stay inside the task that hit them.
//! Configuration errors only prevent the affected task from being registered.

use std::fmt;

/// Main error type for the watcher
#[derive(Debug)]
pub enum WatcherError {
    /// Configuration-related errors
    Config(ConfigError),

    /// Errors talking to the monitored node
    Chain(ChainError),

    /// Other errors with context
    Other(String),
}

/// Configuration error variants
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to load configuration file
    LoadFailed { path: String, reason: String },

    /// Invalid configuration value
    InvalidValue { field: String, reason: String },

    /// Missing required configuration
    MissingRequired { field: String },
}

/// Chain collaborator error variants
#[derive(Debug, Clone, PartialEq)]
pub enum ChainError {
    /// Connection to the node failed
    Transport { method: String, reason: String },

    /// Request timeout
    Timeout { method: String },

    /// Node answered with a JSON-RPC error object
    Rpc { method: String, message: String },

    /// Expected field missing or malformed in the response
    MissingField { method: String, field: String },

    /// The running node role does not expose this query
    Unsupported { method: String, role: String },

    /// Local CLI invocation failed
    Command { command: String, reason: String },
}

impl ChainError {
    pub fn missing(method: &str, field: &str) -> Self {
        ChainError::MissingField {
            method: method.to_string(),
            field: field.to_string(),
        }
    }

    pub fn unsupported(method: &str, role: impl fmt::Display) -> Self {
        ChainError::Unsupported {
            method: method.to_string(),
            role: role.to_string(),
        }
    }
}

impl fmt::Display for WatcherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatcherError::Config(e) => write!(f, "Configuration error: {}", e),
            WatcherError::Chain(e) => write!(f, "Chain error: {}", e),
            WatcherError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::LoadFailed { path, reason } => {
                write!(f, "Failed to load config from '{}': {}", path, reason)
            }
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
            ConfigError::MissingRequired { field } => {
                write!(f, "Missing required field: {}", field)
            }
        }
    }
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainError::Transport { method, reason } => {
                write!(f, "RPC call '{}' failed: {}", method, reason)
            }
            ChainError::Timeout { method } => {
                write!(f, "RPC call '{}' timed out", method)
            }
            ChainError::Rpc { method, message } => {
                write!(f, "RPC error from '{}': {}", method, message)
            }
            ChainError::MissingField { method, field } => {
                write!(f, "Field '{}' missing in '{}' response", field, method)
            }
            ChainError::Unsupported { method, role } => {
                write!(f, "'{}' is not available on a {} node", method, role)
            }
            ChainError::Command { command, reason } => {
                write!(f, "Command '{}' failed: {}", command, reason)
            }
        }
    }
}

impl std::error::Error for WatcherError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for ChainError {}

impl From<anyhow::Error> for WatcherError {
    fn from(err: anyhow::Error) -> Self {
        WatcherError::Other(err.to_string())
    }
}

impl From<ConfigError> for WatcherError {
    fn from(err: ConfigError) -> Self {
        WatcherError::Config(err)
    }
}

impl From<ChainError> for WatcherError {
    fn from(err: ChainError) -> Self {
        WatcherError::Chain(err)
    }
}
