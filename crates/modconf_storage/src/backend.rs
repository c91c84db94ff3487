//! Non-volatile storage trait definition.

use crate::error::{StorageError, StorageResult};

/// Value of a cell that has been erased or never written.
///
/// EEPROM and NOR flash erase to all bits set.
pub const ERASED_BYTE: u8 = 0xFF;

/// A byte-addressable non-volatile medium.
///
/// Backends know nothing about configuration layout. They store raw bytes
/// at addresses in `[0, capacity)` and keep them across restarts.
///
/// # Invariants
///
/// - `read` returns the last value written at that address, or
///   [`ERASED_BYTE`] for a cell that was never written
/// - accesses at or beyond `capacity()` fail with [`StorageError::OutOfBounds`]
/// - `update` performs a physical write only when the value differs
///
/// # Implementors
///
/// - [`super::InMemoryBackend`] - For testing
/// - [`super::FileBackend`] - For EEPROM images on disk
pub trait NvStorage: Send + Sync {
    /// Returns the number of addressable bytes.
    fn capacity(&self) -> u32;

    /// Reads the byte stored at `address`.
    ///
    /// # Errors
    ///
    /// Returns an error if `address` is out of bounds or an I/O error occurs.
    fn read(&self, address: u32) -> StorageResult<u8>;

    /// Writes `value` at `address` unconditionally.
    ///
    /// Every call counts as a physical write cycle. Prefer [`NvStorage::update`].
    ///
    /// # Errors
    ///
    /// Returns an error if `address` is out of bounds or an I/O error occurs.
    fn write(&mut self, address: u32, value: u8) -> StorageResult<()>;

    /// Flushes pending writes to the durable medium.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush operation fails.
    fn flush(&mut self) -> StorageResult<()>;

    /// Reads `len` consecutive bytes starting at `address`.
    ///
    /// # Errors
    ///
    /// Returns an error if the range extends beyond the medium.
    fn read_range(&self, address: u32, len: usize) -> StorageResult<Vec<u8>> {
        check_range(address, len, self.capacity())?;
        (0..len as u32).map(|i| self.read(address + i)).collect()
    }

    /// Writes `value` at `address` only if the stored byte differs.
    ///
    /// Returns `true` if a physical write took place.
    ///
    /// # Errors
    ///
    /// Returns an error if `address` is out of bounds or an I/O error occurs.
    fn update(&mut self, address: u32, value: u8) -> StorageResult<bool> {
        if self.read(address)? == value {
            return Ok(false);
        }
        self.write(address, value)?;
        Ok(true)
    }
}

/// Checks that `[address, address + len)` lies within `capacity`.
pub(crate) fn check_range(address: u32, len: usize, capacity: u32) -> StorageResult<()> {
    let end = u64::from(address).saturating_add(len as u64);
    if end > u64::from(capacity) || (len == 0 && address > capacity) {
        return Err(StorageError::out_of_bounds(address, len, capacity));
    }
    Ok(())
}
