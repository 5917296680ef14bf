//! Central repository for intervals, defaults and limits
//!
//! Task cadences live here so the registry and the tests agree on them.

/// Check/notify cadences for each task, in seconds
pub mod intervals {
    pub const MINUTE: i64 = 60;
    pub const HOUR: i64 = 60 * MINUTE;

    pub const BLOCK_MISSED_CHECK: i64 = MINUTE;
    pub const BLOCK_MISSED_NOTIFY: i64 = 5 * MINUTE;

    pub const POSITION_CHECK: i64 = HOUR;
    pub const POSITION_NOTIFY: i64 = 10 * HOUR;

    pub const PROPOSAL_CHECK: i64 = MINUTE;
    pub const PROPOSAL_NOTIFY: i64 = HOUR;

    pub const BRIDGE_CHECK: i64 = 5 * MINUTE;
    pub const BRIDGE_NOTIFY: i64 = HOUR;

    pub const DAS_SAMPLING_CHECK: i64 = 5 * MINUTE;
    pub const DAS_SAMPLING_NOTIFY: i64 = 5 * MINUTE;

    pub const NODE_SYNCHING_CHECK: i64 = 5 * MINUTE;
    pub const NODE_SYNCHING_NOTIFY: i64 = 5 * MINUTE;

    pub const CHAIN_STUCK_CHECK: i64 = MINUTE;
    pub const CHAIN_STUCK_NOTIFY: i64 = 15 * MINUTE;

    pub const LOW_PEERS_CHECK: i64 = 5 * MINUTE;
    pub const LOW_PEERS_NOTIFY: i64 = HOUR;
}

/// Default configuration values
pub mod defaults {
    /// Validator RPC endpoint (tendermint)
    pub const VALIDATOR_ENDPOINT: &str = "http://localhost:26657/";

    /// DAS node RPC endpoint
    pub const DAS_ENDPOINT: &str = "http://localhost:26658/";

    /// Trailing window inspected by the missed-block check
    pub const BLOCK_WINDOW: u64 = 100;

    /// Missed blocks in the window before alerting
    pub const THRESHOLD_NOTSIGNED: u64 = 5;

    /// Peer count below which the low-peers check alerts
    pub const MIN_PEERS: u64 = 2;

    /// Network used when requesting a DAS admin token
    pub const DAS_NETWORK: &str = "blockspacerace";

    /// Scheduler sleep between ticks
    pub const TICK_SECONDS: u64 = 10;

    /// Upper bound for a single task evaluation
    pub const EVALUATION_TIMEOUT_SECONDS: u64 = 60;

    /// Default RPC timeout in seconds
    pub const RPC_TIMEOUT_SECONDS: u64 = 10;

    /// Webhook/telegram request timeout
    pub const NOTIFY_TIMEOUT_SECONDS: u64 = 10;

    /// Directory holding systemd unit files
    pub const SYSTEMD_DIR: &str = "/etc/systemd/system";
}

/// Limits and constraints
pub mod limits {
    /// Maximum page size of the `validators` RPC
    pub const VALIDATORS_PAGE_SIZE: u64 = 100;

    /// Height gap that counts as "still synching"
    pub const SYNC_HEIGHT_GAP: u64 = 100;

    /// Minutes with an unchanged block hash before the chain counts as stuck
    pub const CHAIN_STUCK_MINUTES: i64 = 5;
}

/// Rank value reported when the validator is not in the active set
pub const NOT_IN_ACTIVE_SET: i64 = -1;
