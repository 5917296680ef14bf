pub mod chain;
pub mod config;
pub mod constants;
pub mod errors;
pub mod notification;
pub mod scheduler;
pub mod tasks;

// Re-export commonly used types
pub use chain::{detect_chain, ChainClient, ChainRole};
pub use config::{Config, ConfigManager};
pub use errors::{ChainError, ConfigError, WatcherError};
pub use notification::{Notification, NotificationEvent, Notifier};
pub use scheduler::{build_tasks, Scheduler};
pub use tasks::{Task, TaskContext};
