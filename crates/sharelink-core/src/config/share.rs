//! Share link configuration.

use serde::{Deserialize, Serialize};

/// Share link generation and housekeeping settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Path segment placed between the base URL and the token.
    #[serde(default = "default_link_prefix")]
    pub link_prefix: String,
    /// Minutes between expired-share purges (0 disables the task).
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_minutes: u64,
    /// How long an expired share is kept before it is purged, in hours.
    #[serde(default = "default_expired_retention")]
    pub expired_retention_hours: u64,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            link_prefix: default_link_prefix(),
            cleanup_interval_minutes: default_cleanup_interval(),
            expired_retention_hours: default_expired_retention(),
        }
    }
}

fn default_link_prefix() -> String {
    "/s/".to_string()
}

fn default_cleanup_interval() -> u64 {
    60
}

fn default_expired_retention() -> u64 {
    24 * 7
}
