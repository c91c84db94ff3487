//! Error types for the configuration store.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while setting up or persisting a configuration.
///
/// Rejected writes and out-of-range reads are not errors; they are reported
/// through `bool` results and the `0xFF` sentinel.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Non-volatile storage error.
    #[error("storage error: {0}")]
    Storage(#[from] modconf_storage::StorageError),

    /// The initializer produced no bytes.
    #[error("initializer produced an empty configuration")]
    EmptyConfiguration,

    /// The configuration does not fit in the storage medium.
    #[error(
        "configuration of {size} bytes at address {base_address} exceeds storage capacity {capacity}"
    )]
    RegionExceedsStorage {
        /// Storage address of byte 0.
        base_address: u32,
        /// Size of the configuration in bytes.
        size: usize,
        /// Capacity of the medium.
        capacity: u32,
    },
}

impl CoreError {
    /// Creates a region-exceeds-storage error.
    pub fn region_exceeds_storage(base_address: u32, size: usize, capacity: u32) -> Self {
        Self::RegionExceedsStorage {
            base_address,
            size,
            capacity,
        }
    }
}
