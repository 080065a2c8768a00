use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Command timeout applied when a query does not override it.
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 30;

///
/// ConnectionOptions
///
/// Connection-level defaults. Deserializable from any serde source; missing
/// fields take their defaults.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct ConnectionOptions {
    /// Default command timeout in seconds; `None` defers to the driver.
    pub command_timeout_secs: Option<u64>,
}

impl ConnectionOptions {
    #[must_use]
    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs.map(Duration::from_secs)
    }

    #[must_use]
    pub const fn with_command_timeout(mut self, secs: Option<u64>) -> Self {
        self.command_timeout_secs = secs;
        self
    }
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            command_timeout_secs: Some(DEFAULT_COMMAND_TIMEOUT_SECS),
        }
    }
}
