//! Engine timing configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants;

/// Timing configuration for the session state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// How far in the future a new session's bid deadline is set.
    pub commit_window: Duration,
    /// Grace period after the deadline before decryption is attempted,
    /// absorbing oracle/clock skew.
    pub decrypt_buffer: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            commit_window: Duration::from_secs(constants::DEFAULT_COMMIT_WINDOW_SECS),
            decrypt_buffer: Duration::from_secs(constants::DEFAULT_DECRYPT_BUFFER_SECS),
        }
    }
}

impl EngineConfig {
    /// The commit window in whole seconds, as deadline arithmetic uses it.
    #[must_use]
    pub fn commit_window_secs(&self) -> i64 {
        i64::try_from(self.commit_window.as_secs()).unwrap_or(i64::MAX)
    }

    /// The decrypt buffer in whole seconds.
    #[must_use]
    pub fn decrypt_buffer_secs(&self) -> i64 {
        i64::try_from(self.decrypt_buffer.as_secs()).unwrap_or(i64::MAX)
    }
}
