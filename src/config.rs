//! Store and sweeper configuration.

use serde::{Deserialize, Serialize};

/// Default application scope when none is configured.
pub const DEFAULT_APPLICATION_NAME: &str = "/";

/// Default idle timeout for sessions, in minutes.
pub const DEFAULT_TIMEOUT_MINUTES: i32 = 20;

/// Default sweep interval in milliseconds (30 minutes).
pub const DEFAULT_SWEEP_INTERVAL_MS: u64 = 1_800_000;

/// Configuration for a session store instance and its expiry sweeper.
///
/// Connection management stays outside this struct; the store is handed an
/// already-established [`sea_orm::DatabaseConnection`].
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Application scope for all rows this store reads and writes.
    pub application_name: String,
    /// Idle timeout applied when refreshing expiry on release and touch.
    pub default_timeout_minutes: i32,
    /// Whether expired rows are garbage-collected by a background sweeper.
    pub auto_delete_expired: bool,
    /// Interval between sweep firings, in milliseconds.
    pub sweep_interval_ms: u64,
    /// Whether the sweeper notifies a registered expire callback before
    /// deleting each expired row. When false, callback registration is
    /// refused and the simple bulk delete runs instead.
    pub enable_expire_callback: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            application_name: DEFAULT_APPLICATION_NAME.to_string(),
            default_timeout_minutes: DEFAULT_TIMEOUT_MINUTES,
            auto_delete_expired: false,
            sweep_interval_ms: DEFAULT_SWEEP_INTERVAL_MS,
            enable_expire_callback: false,
        }
    }
}
