// File: watcher/src/config/manager.rs
use super::Config;
use anyhow::{anyhow, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info};

pub struct ConfigManager {
    current_config: Arc<Config>,
}

impl ConfigManager {
    pub async fn new(config_path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::load_configuration(config_path.as_ref()).await?;
        Ok(Self {
            current_config: Arc::new(config),
        })
    }

    pub fn get_current_config(&self) -> Arc<Config> {
        self.current_config.clone()
    }

    async fn load_configuration(config_path: &Path) -> Result<Config> {
        debug!("Loading watcher config: {}", config_path.display());

        let content = fs::read_to_string(config_path)
            .await
            .map_err(|e| anyhow!("Failed to read config {}: {}", config_path.display(), e))?;

        let config = Self::parse(&content)?;

        info!(
            "Loaded config: rpc endpoint {}, das endpoint {}, {} notification channel(s)",
            config.chain.endpoint,
            config.chain.das_endpoint,
            Self::channel_count(&config)
        );

        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Config> {
        let config: Config =
            toml::from_str(content).map_err(|e| anyhow!("Failed to parse config: {}", e))?;

        if config.tasks.tick_seconds == 0 {
            return Err(anyhow!("tasks.tick_seconds must be greater than zero"));
        }
        if config.chain.block_window == 0 {
            return Err(anyhow!("chain.block_window must be greater than zero"));
        }

        Ok(config)
    }

    fn channel_count(config: &Config) -> usize {
        let webhook = usize::from(config.notification.webhook_url.is_some());
        let telegram = if config.notification.telegram_token.is_some() {
            config.notification.telegram_chat_ids.len()
        } else {
            0
        };
        webhook + telegram
    }
}
