//! Error types for storage operations.

use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Attempted to access cells beyond the end of the medium.
    #[error("access out of bounds: address {address}, len {len}, capacity {capacity}")]
    OutOfBounds {
        /// The first address of the access.
        address: u32,
        /// The number of cells accessed.
        len: usize,
        /// The capacity of the medium.
        capacity: u32,
    },

    /// An existing image does not match the requested capacity.
    #[error("capacity mismatch: expected {expected} bytes, found {actual}")]
    CapacityMismatch {
        /// The requested capacity.
        expected: u32,
        /// The size found on the medium.
        actual: u64,
    },
}

impl StorageError {
    /// Creates an out-of-bounds error.
    pub fn out_of_bounds(address: u32, len: usize, capacity: u32) -> Self {
        Self::OutOfBounds {
            address,
            len,
            capacity,
        }
    }
}
