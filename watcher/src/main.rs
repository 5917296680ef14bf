// File: watcher/src/main.rs
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use watcher::{
    build_tasks, detect_chain, Config, ConfigManager, Notification, Scheduler, TaskContext,
};

const CONFIG_ENV: &str = "WATCHER_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/main.toml";

#[tokio::main]
async fn main() -> Result<()> {
    let arg = std::env::args().nth(1);
    if arg.as_deref() == Some("--default-config") {
        println!("{}", toml::to_string_pretty(&Config::default())?);
        return Ok(());
    }

    let env_filter = EnvFilter::from_default_env()
        .add_directive("watcher=info".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);

    fmt().with_env_filter(env_filter).init();

    info!("Starting chain node watcher");

    let config_path = arg
        .or_else(|| std::env::var(CONFIG_ENV).ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config_manager = ConfigManager::new(&config_path).await?;
    let config = config_manager.get_current_config();

    let chain = detect_chain(&config).await?;
    let role = chain.role();

    let label = config
        .chain
        .name
        .clone()
        .unwrap_or_else(|| config.chain.network.clone());
    let prefix = format!("[{} {}]", label, chain.kind());
    info!("Watching {}", prefix);

    let notification = Notification::from_config(&config, prefix);
    if !notification.is_enabled() {
        warn!("⚠️  NOTIFICATIONS DISABLED ⚠️");
        warn!("No webhook_url or telegram_token configured in {}", config_path);
        warn!("Alerts will only be written to the log");
    }

    let ctx = TaskContext::new(Arc::clone(&config), role);
    let tasks = build_tasks(&ctx).await;
    if tasks.is_empty() {
        error!("No task could be registered for {} node, nothing to watch", role);
        return Ok(());
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                error!("Unable to listen for shutdown signal: {}", e);
                // hold the sender so the scheduler keeps running
                std::future::pending::<()>().await;
                drop(shutdown_tx);
            }
        }
    });

    let mut scheduler = Scheduler::from_config(&config, chain, notification, tasks);
    scheduler.run(shutdown_rx).await;

    Ok(())
}
