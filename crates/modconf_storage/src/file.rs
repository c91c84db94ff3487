//! File-based storage backend holding an EEPROM image.

use crate::backend::{check_range, NvStorage, ERASED_BYTE};
use crate::error::{StorageError, StorageResult};
use parking_lot::RwLock;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// An EEPROM image stored in a regular file.
///
/// The file is exactly `capacity` bytes long; byte N of the file is cell N
/// of the medium. This lets a host tool inspect or prepare the persistent
/// configuration of a device.
///
/// # Durability
///
/// - `write()` goes straight to the OS
/// - `flush()` calls `File::sync_all()` to ensure data is on disk
///
/// # Example
///
/// ```no_run
/// use modconf_storage::{FileBackend, NvStorage};
/// use std::path::Path;
///
/// let mut backend = FileBackend::open(Path::new("eeprom.bin"), 1024).unwrap();
/// backend.update(0x10, 3).unwrap();
/// backend.flush().unwrap();
/// ```
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    file: RwLock<File>,
    capacity: u32,
}

impl FileBackend {
    /// Opens or creates an image of `capacity` bytes at the given path.
    ///
    /// A missing file is created and a short file is padded with
    /// [`ERASED_BYTE`] up to `capacity`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, or if it is already
    /// larger than `capacity`.
    pub fn open(path: &Path, capacity: u32) -> StorageResult<Self> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        let len = file.metadata()?.len();
        if len > u64::from(capacity) {
            return Err(StorageError::CapacityMismatch {
                expected: capacity,
                actual: len,
            });
        }
        if len < u64::from(capacity) {
            let padding = vec![ERASED_BYTE; (u64::from(capacity) - len) as usize];
            file.seek(SeekFrom::End(0))?;
            file.write_all(&padding)?;
            file.sync_all()?;
        }

        Ok(Self {
            path: path.to_path_buf(),
            file: RwLock::new(file),
            capacity,
        })
    }

    /// Opens or creates an image, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or file cannot be opened.
    pub fn open_with_create_dirs(path: &Path, capacity: u32) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::open(path, capacity)
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl NvStorage for FileBackend {
    fn capacity(&self) -> u32 {
        self.capacity
    }

    fn read(&self, address: u32) -> StorageResult<u8> {
        let mut byte = [0u8; 1];
        check_range(address, 1, self.capacity)?;

        let mut file = self.file.write();
        file.seek(SeekFrom::Start(u64::from(address)))?;
        file.read_exact(&mut byte)?;
        Ok(byte[0])
    }

    fn read_range(&self, address: u32, len: usize) -> StorageResult<Vec<u8>> {
        check_range(address, len, self.capacity)?;
        if len == 0 {
            return Ok(Vec::new());
        }

        let mut file = self.file.write();
        file.seek(SeekFrom::Start(u64::from(address)))?;
        let mut buffer = vec![0u8; len];
        file.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    fn write(&mut self, address: u32, value: u8) -> StorageResult<()> {
        check_range(address, 1, self.capacity)?;

        let mut file = self.file.write();
        file.seek(SeekFrom::Start(u64::from(address)))?;
        file.write_all(&[value])?;
        Ok(())
    }

    fn flush(&mut self) -> StorageResult<()> {
        let mut file = self.file.write();
        file.flush()?;
        file.sync_all()?;
        Ok(())
    }
}
