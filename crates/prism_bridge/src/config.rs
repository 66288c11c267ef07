//! Handshake tuning knobs.

use std::time::Duration;

use serde::Deserialize;

/// Configuration for the frame-request handshake.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HandshakeConfig {
    /// Condition-variable wait interval in milliseconds.
    ///
    /// The wait loop re-checks the shared slot at this cadence, so a
    /// signal lost to scheduling jitter delays a frame by at most one
    /// interval instead of hanging the presenter.
    pub wait_interval_ms: u64,

    /// Consecutive timed-out wait cycles tolerated before a request is
    /// abandoned with `ProducerUnresponsive`. `None` restores the
    /// baseline protocol: wait until the producer answers.
    pub missed_cycle_limit: Option<u32>,
}

impl HandshakeConfig {
    /// The wait interval as a [`Duration`].
    #[must_use]
    pub const fn wait_interval(&self) -> Duration {
        Duration::from_millis(self.wait_interval_ms)
    }
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            wait_interval_ms: 50,
            missed_cycle_limit: None,
        }
    }
}
