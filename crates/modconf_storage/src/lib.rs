//! # modconf storage
//!
//! Non-volatile storage abstraction for modconf.
//!
//! A backend models a small byte-addressable medium such as an EEPROM:
//! every cell has an address in `[0, capacity)`, and writes wear the
//! medium, so callers are expected to use [`NvStorage::update`], which
//! only touches cells whose value actually changes.
//!
//! ## Available Backends
//!
//! - [`InMemoryBackend`] - RAM-backed medium for tests and simulation
//! - [`FileBackend`] - EEPROM image file on the host file system
//!
//! ## Example
//!
//! ```rust
//! use modconf_storage::{InMemoryBackend, NvStorage, ERASED_BYTE};
//!
//! let mut eeprom = InMemoryBackend::new(64);
//! assert_eq!(eeprom.read(3).unwrap(), ERASED_BYTE);
//!
//! assert!(eeprom.update(3, 0x2a).unwrap());
//! assert!(!eeprom.update(3, 0x2a).unwrap()); // unchanged, no physical write
//! assert_eq!(eeprom.write_count(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::{NvStorage, ERASED_BYTE};
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
