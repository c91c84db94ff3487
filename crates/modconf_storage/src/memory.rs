//! In-memory storage backend for testing.

use crate::backend::{check_range, NvStorage, ERASED_BYTE};
use crate::error::StorageResult;
use parking_lot::RwLock;

/// An in-memory non-volatile medium.
///
/// This backend keeps all cells in RAM and is suitable for:
/// - Unit tests
/// - Host-side simulation of a device's EEPROM
///
/// It counts physical write cycles, so tests can assert that
/// write-if-changed semantics actually spare the medium.
///
/// # Example
///
/// ```rust
/// use modconf_storage::{InMemoryBackend, NvStorage};
///
/// let mut backend = InMemoryBackend::new(8);
/// backend.write(0, 7).unwrap();
/// assert_eq!(backend.read(0).unwrap(), 7);
/// assert_eq!(backend.capacity(), 8);
/// ```
#[derive(Debug)]
pub struct InMemoryBackend {
    cells: RwLock<Vec<u8>>,
    writes: RwLock<u64>,
}

impl InMemoryBackend {
    /// Creates an erased medium of `capacity` bytes.
    #[must_use]
    pub fn new(capacity: u32) -> Self {
        Self::with_data(vec![ERASED_BYTE; capacity as usize])
    }

    /// Creates a medium with pre-existing contents.
    ///
    /// The capacity is the length of `data`. Useful for testing restore paths.
    #[must_use]
    pub fn with_data(data: Vec<u8>) -> Self {
        Self {
            cells: RwLock::new(data),
            writes: RwLock::new(0),
        }
    }

    /// Returns a copy of every cell.
    #[must_use]
    pub fn data(&self) -> Vec<u8> {
        self.cells.read().clone()
    }

    /// Returns the number of physical writes performed so far.
    #[must_use]
    pub fn write_count(&self) -> u64 {
        *self.writes.read()
    }
}

impl NvStorage for InMemoryBackend {
    fn capacity(&self) -> u32 {
        self.cells.read().len() as u32
    }

    fn read(&self, address: u32) -> StorageResult<u8> {
        let cells = self.cells.read();
        check_range(address, 1, cells.len() as u32)?;
        Ok(cells[address as usize])
    }

    fn read_range(&self, address: u32, len: usize) -> StorageResult<Vec<u8>> {
        let cells = self.cells.read();
        check_range(address, len, cells.len() as u32)?;
        let start = address as usize;
        Ok(cells[start..start + len].to_vec())
    }

    fn write(&mut self, address: u32, value: u8) -> StorageResult<()> {
        let mut cells = self.cells.write();
        check_range(address, 1, cells.len() as u32)?;
        cells[address as usize] = value;
        *self.writes.write() += 1;
        Ok(())
    }

    fn flush(&mut self) -> StorageResult<()> {
        // Nothing is buffered
        Ok(())
    }
}
