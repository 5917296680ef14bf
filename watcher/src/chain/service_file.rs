//! systemd unit lookup and local CLI invocation
//!
//! Node binaries are located through the `ExecStart` line of the unit that
//! runs them; governance queries and DAS auth tokens go through that binary.

use std::path::{Path, PathBuf};
use tokio::process::Command as AsyncCommand;
use tracing::debug;

use crate::constants::defaults;
use crate::errors::{ChainError, ConfigError};

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceUnit {
    exec_start: Vec<String>,
}

impl ServiceUnit {
    /// Load `/etc/systemd/system/<service>`
    pub async fn load(service: &str) -> Result<Self, ConfigError> {
        Self::load_from(&unit_path(service)).await
    }

    pub async fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::LoadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        Self::parse(&content).ok_or_else(|| ConfigError::MissingRequired {
            field: format!("{} [Service] ExecStart", path.display()),
        })
    }

    /// Extract `ExecStart` from the `[Service]` section
    pub fn parse(content: &str) -> Option<Self> {
        let mut in_service = false;
        let mut exec_start: Option<String> = None;
        let mut continuing = false;

        for raw in content.lines() {
            let line = raw.trim();

            if continuing {
                if let Some(exec) = exec_start.as_mut() {
                    exec.push(' ');
                    exec.push_str(line.trim_end_matches('\\').trim());
                }
                continuing = line.ends_with('\\');
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                in_service = line.eq_ignore_ascii_case("[service]");
                continue;
            }

            if !in_service || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                if key.trim() == "ExecStart" {
                    exec_start = Some(value.trim().trim_end_matches('\\').trim().to_string());
                    continuing = value.trim_end().ends_with('\\');
                }
            }
        }

        let exec_start: Vec<String> = exec_start?
            .split_whitespace()
            .map(str::to_string)
            .collect();

        if exec_start.is_empty() {
            None
        } else {
            Some(Self { exec_start })
        }
    }

    /// Path of the executable started by the unit
    pub fn binary(&self) -> &str {
        &self.exec_start[0]
    }

    /// First argument after the binary, the node role for DAS nodes
    pub fn subcommand(&self) -> Option<&str> {
        self.exec_start.get(1).map(String::as_str)
    }
}

pub fn unit_path(service: &str) -> PathBuf {
    Path::new(defaults::SYSTEMD_DIR).join(service)
}

/// Run a shell command and return its trimmed stdout
pub async fn execute_shell_command(command: &str) -> Result<String, ChainError> {
    debug!("Executing command: {}", command);

    let output = AsyncCommand::new("sh")
        .arg("-c")
        .arg(command)
        .output()
        .await
        .map_err(|e| ChainError::Command {
            command: command.to_string(),
            reason: e.to_string(),
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

    if output.status.success() {
        Ok(stdout)
    } else {
        let reason = if !stderr.is_empty() { stderr } else { stdout };
        Err(ChainError::Command {
            command: command.to_string(),
            reason,
        })
    }
}
