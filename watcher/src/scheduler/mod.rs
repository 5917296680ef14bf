//! Task registry and the polling loop
//!
//! The registry turns the detected node role and the configuration into the
//! list of tasks for this process. The [`Scheduler`] then wakes up every
//! `tick_seconds`, evaluates each due task in order and forwards what survives
//! the throttle to the notification channels.
//!
//! # Configuration
//!
//! ```toml
//! [tasks]
//! tick_seconds = 10
//! evaluation_timeout_seconds = 60
//! disabled = ["LowPeers"]
//! ```

pub mod registry;
pub mod runner;

pub use registry::build_tasks;
pub use runner::Scheduler;
