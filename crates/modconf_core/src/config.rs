//! Store configuration.

use std::time::Duration;

/// Default idle time after which an operator session expires.
pub const DEFAULT_INTERACTION_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Configuration for constructing a configuration store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Storage address where byte 0 of the configuration is persisted.
    pub base_address: u32,

    /// How long an operator session may stay idle before it expires.
    ///
    /// The store only carries this value; operator-interface collaborators enforce it.
    pub interaction_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_address: 0,
            interaction_timeout: DEFAULT_INTERACTION_TIMEOUT,
        }
    }
}

impl StoreConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the storage base address.
    #[must_use]
    pub const fn base_address(mut self, address: u32) -> Self {
        self.base_address = address;
        self
    }

    /// Sets the operator interaction timeout.
    #[must_use]
    pub const fn interaction_timeout(mut self, timeout: Duration) -> Self {
        self.interaction_timeout = timeout;
        self
    }
}
