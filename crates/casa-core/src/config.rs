// ── Runtime connection configuration ──
//
// Describes *how* to reach the remote. Never touches disk: the TUI
// builds a `RemoteConfig` (usually from `casa-config`) and hands it in.

use std::time::Duration;

use casa_api::ReconnectConfig;
use url::Url;

pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);

/// Connection settings for a [`Remote`](crate::Remote).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Base address of the remote, e.g. `http://localhost:3000`.
    pub endpoint: Url,
    /// First reconnect delay; doubles on every failed attempt.
    pub reconnect_initial_delay: Duration,
    pub reconnect_max_delay: Duration,
    /// `None` retries forever.
    pub reconnect_max_retries: Option<u32>,
}

impl RemoteConfig {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            reconnect_initial_delay: DEFAULT_INITIAL_DELAY,
            reconnect_max_delay: DEFAULT_MAX_DELAY,
            reconnect_max_retries: None,
        }
    }

    pub(crate) fn reconnect(&self) -> ReconnectConfig {
        ReconnectConfig {
            initial_delay: self.reconnect_initial_delay,
            max_delay: self.reconnect_max_delay,
            max_retries: self.reconnect_max_retries,
        }
    }
}
