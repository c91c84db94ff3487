//! The validated, persisted byte-array configuration store.

use crate::config::StoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::operator::OperatorInterfaceClient;
use crate::policy::{Initializer, Validator};
use modconf_storage::{NvStorage, ERASED_BYTE};
use std::time::Duration;
use tracing::{debug, trace};

/// Value returned by [`ModuleConfiguration::get_byte`] for an invalid index.
///
/// It is indistinguishable from a stored `0xFF`; use
/// [`ModuleConfiguration::try_get_byte`] when the difference matters.
pub const OUT_OF_RANGE_BYTE: u8 = 0xFF;

/// A module's configuration, modelled as a byte array indexed from zero.
///
/// Byte `N` is persisted at storage address `base_address + N`. Contents come
/// from the [`Initializer`] at [`setup`](Self::setup) and every later write is
/// gated by the [`Validator`]. Writes only touch memory; [`save`](Self::save)
/// and [`save_byte`](Self::save_byte) make them durable.
///
/// Until `setup` succeeds the store has no buffer and behaves as if every
/// index were out of range.
///
/// # Example
///
/// ```rust
/// use modconf_core::{Defaults, ModuleConfiguration, StoreConfig};
/// use modconf_storage::InMemoryBackend;
///
/// let even = |_index: usize, value: u8| value % 2 == 0;
/// let mut config = ModuleConfiguration::new(
///     Defaults(vec![0; 4]),
///     even,
///     InMemoryBackend::new(64),
///     StoreConfig::new().base_address(16),
/// );
/// config.setup().unwrap();
///
/// assert!(config.set_byte(2, 10));
/// assert!(!config.set_byte(2, 7));
/// assert_eq!(config.get_byte(2), 10);
///
/// config.save().unwrap();
/// ```
#[derive(Debug)]
pub struct ModuleConfiguration<I, V, S> {
    initializer: I,
    validator: V,
    storage: S,
    config: StoreConfig,
    buffer: Option<Box<[u8]>>,
}

impl<I, V, S> ModuleConfiguration<I, V, S>
where
    I: Initializer,
    V: Validator,
    S: NvStorage,
{
    /// Creates an uninitialized store.
    pub fn new(initializer: I, validator: V, storage: S, config: StoreConfig) -> Self {
        Self {
            initializer,
            validator,
            storage,
            config,
            buffer: None,
        }
    }

    /// Runs the initializer and adopts its output as the configuration.
    ///
    /// Calling it again re-initializes the store with fresh initializer output.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyConfiguration`] if the initializer yields no
    /// bytes and [`CoreError::RegionExceedsStorage`] if the configuration would
    /// not fit in storage. The store is left uninitialized in both cases.
    pub fn setup(&mut self) -> CoreResult<()> {
        self.buffer = None;

        let base = self.config.base_address;
        let capacity = self.storage.capacity();
        let available = capacity.saturating_sub(base) as usize;

        let contents = self.initializer.initialize(available);
        if contents.is_empty() {
            return Err(CoreError::EmptyConfiguration);
        }
        if contents.len() > available {
            return Err(CoreError::region_exceeds_storage(base, contents.len(), capacity));
        }

        debug!(size = contents.len(), base_address = base, "configuration initialized");
        self.buffer = Some(contents.into_boxed_slice());
        Ok(())
    }

    /// Returns `true` once `setup` has succeeded.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.buffer.is_some()
    }

    /// Returns the number of configuration bytes, or 0 before setup.
    #[must_use]
    pub fn size(&self) -> usize {
        self.buffer.as_ref().map_or(0, |buffer| buffer.len())
    }

    /// Returns the in-memory configuration (empty before setup).
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.as_deref().unwrap_or(&[])
    }

    /// Returns the storage address of byte 0.
    #[must_use]
    pub fn base_address(&self) -> u32 {
        self.config.base_address
    }

    /// Returns the operator interaction timeout.
    #[must_use]
    pub fn interaction_timeout(&self) -> Duration {
        self.config.interaction_timeout
    }

    /// Returns `true` if `index` is within `[0, size)`.
    #[must_use]
    pub fn validate_address(&self, index: usize) -> bool {
        index < self.size()
    }

    /// Returns the byte at `index`, or `None` if the index is out of range.
    #[must_use]
    pub fn try_get_byte(&self, index: usize) -> Option<u8> {
        self.buffer.as_ref()?.get(index).copied()
    }

    /// Returns the byte at `index`, or [`OUT_OF_RANGE_BYTE`] if the index is out of range.
    #[must_use]
    pub fn get_byte(&self, index: usize) -> u8 {
        self.try_get_byte(index).unwrap_or(OUT_OF_RANGE_BYTE)
    }

    /// Writes `value` at `index` if the index is valid and the validator approves.
    ///
    /// Returns `false` and leaves the configuration untouched otherwise.
    /// The change is not persisted.
    pub fn set_byte(&mut self, index: usize, value: u8) -> bool {
        let Some(slot) = self.buffer.as_mut().and_then(|buffer| buffer.get_mut(index)) else {
            trace!(index, "write outside configuration ignored");
            return false;
        };
        if !self.validator.validate(index, value) {
            trace!(index, value, "write rejected by validator");
            return false;
        }
        *slot = value;
        true
    }

    /// Persists the byte at `index` using write-if-changed semantics.
    ///
    /// Returns `true` if the medium was physically written. Indices outside
    /// the configuration are ignored and return `false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails.
    pub fn save_byte(&mut self, index: usize) -> CoreResult<bool> {
        let Some(value) = self.try_get_byte(index) else {
            trace!(index, "save outside configuration skipped");
            return Ok(false);
        };
        let written = self.storage.update(self.address_of(index), value)?;
        self.storage.flush()?;
        Ok(written)
    }

    /// Persists the whole configuration using write-if-changed semantics.
    ///
    /// Returns the number of bytes physically written.
    ///
    /// # Errors
    ///
    /// Returns an error if a storage write fails.
    pub fn save(&mut self) -> CoreResult<usize> {
        let Some(buffer) = self.buffer.as_deref() else {
            return Ok(0);
        };
        let base = self.config.base_address;

        let mut written = 0;
        for (offset, &value) in (0u32..).zip(buffer.iter()) {
            if self.storage.update(base + offset, value)? {
                written += 1;
            }
        }
        self.storage.flush()?;

        debug!(size = buffer.len(), written, "configuration saved");
        Ok(written)
    }

    /// Replaces the in-memory configuration with the persisted one.
    ///
    /// Loaded bytes are trusted and bypass the validator.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read fails; the configuration is then unchanged.
    pub fn load(&mut self) -> CoreResult<()> {
        let Some(buffer) = self.buffer.as_deref_mut() else {
            return Ok(());
        };

        let persisted = self
            .storage
            .read_range(self.config.base_address, buffer.len())?;
        buffer.copy_from_slice(&persisted);

        debug!(size = buffer.len(), "configuration loaded");
        Ok(())
    }

    /// Erases the persisted configuration region and the in-memory copy.
    ///
    /// Every byte becomes [`ERASED_BYTE`]. Cells already erased are not rewritten.
    ///
    /// # Errors
    ///
    /// Returns an error if a storage write fails.
    pub fn erase(&mut self) -> CoreResult<()> {
        let Some(buffer) = self.buffer.as_deref_mut() else {
            return Ok(());
        };
        let base = self.config.base_address;

        for offset in 0..buffer.len() as u32 {
            self.storage.update(base + offset, ERASED_BYTE)?;
        }
        self.storage.flush()?;
        buffer.fill(ERASED_BYTE);

        debug!(size = buffer.len(), "configuration erased");
        Ok(())
    }

    /// Returns the storage backend.
    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns the storage backend mutably.
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Consumes the store and returns its storage backend.
    pub fn into_storage(self) -> S {
        self.storage
    }

    // setup guarantees base_address + size fits in the u32 capacity
    fn address_of(&self, index: usize) -> u32 {
        self.config.base_address + index as u32
    }
}

impl<I, V, S> OperatorInterfaceClient for ModuleConfiguration<I, V, S>
where
    I: Initializer,
    V: Validator,
    S: NvStorage,
{
    fn validate_address(&self, index: usize) -> bool {
        ModuleConfiguration::validate_address(self, index)
    }

    fn process_value(&mut self, index: usize, value: u8) -> bool {
        self.set_byte(index, value)
    }

    fn interaction_timeout(&self) -> Duration {
        ModuleConfiguration::interaction_timeout(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{AcceptAll, Defaults};
    use modconf_storage::{InMemoryBackend, StorageError};

    type EvenValidator = fn(usize, u8) -> bool;

    fn even(_index: usize, value: u8) -> bool {
        value % 2 == 0
    }

    fn store(size: usize) -> ModuleConfiguration<Defaults, EvenValidator, InMemoryBackend> {
        ModuleConfiguration::new(
            Defaults(vec![0; size]),
            even as EvenValidator,
            InMemoryBackend::new(32),
            StoreConfig::new().base_address(8),
        )
    }

    #[test]
    fn setup_adopts_initializer_output() {
        let mut config = store(4);
        assert!(!config.is_initialized());

        config.setup().unwrap();
        assert!(config.is_initialized());
        assert_eq!(config.size(), 4);
        assert_eq!(config.as_bytes(), &[0, 0, 0, 0]);
    }

    #[test]
    fn initializer_receives_available_space() {
        let mut seen = None;
        let init = |available: usize| {
            seen = Some(available);
            vec![1u8, 2]
        };
        let mut config = ModuleConfiguration::new(
            init,
            AcceptAll,
            InMemoryBackend::new(32),
            StoreConfig::new().base_address(30),
        );
        config.setup().unwrap();
        drop(config);
        assert_eq!(seen, Some(2));
    }

    #[test]
    fn setup_rejects_empty_configuration() {
        let mut config = store(0);
        assert!(matches!(config.setup(), Err(CoreError::EmptyConfiguration)));
        assert!(!config.is_initialized());
        assert!(!config.validate_address(0));
    }

    #[test]
    fn setup_rejects_region_past_storage() {
        let mut config = store(25);
        assert!(matches!(
            config.setup(),
            Err(CoreError::RegionExceedsStorage { base_address: 8, size: 25, capacity: 32 })
        ));
        assert!(!config.is_initialized());
    }

    #[test]
    fn setup_twice_reinitializes() {
        let mut config = store(4);
        config.setup().unwrap();
        assert!(config.set_byte(1, 6));

        config.setup().unwrap();
        assert_eq!(config.get_byte(1), 0);
    }

    #[test]
    fn uninitialized_store_rejects_everything() {
        let mut config = store(4);
        assert_eq!(config.get_byte(0), OUT_OF_RANGE_BYTE);
        assert_eq!(config.try_get_byte(0), None);
        assert!(!config.set_byte(0, 2));
        assert!(!config.validate_address(0));
        assert_eq!(config.size(), 0);
        assert!(config.as_bytes().is_empty());
    }

    #[test]
    fn uninitialized_persistence_is_noop() {
        let mut config = store(4);
        assert_eq!(config.save().unwrap(), 0);
        assert!(!config.save_byte(0).unwrap());
        config.load().unwrap();
        config.erase().unwrap();
        assert_eq!(config.storage().write_count(), 0);
    }

    #[test]
    fn even_validator_scenario() {
        let mut config = store(4);
        config.setup().unwrap();

        assert!(config.set_byte(2, 10));
        assert_eq!(config.get_byte(2), 10);

        assert!(!config.set_byte(2, 7));
        assert_eq!(config.get_byte(2), 10);

        assert!(!config.set_byte(5, 10));
        assert_eq!(config.get_byte(5), 0xFF);
    }

    #[test]
    fn out_of_range_write_skips_validator() {
        let calls = std::cell::Cell::new(0);
        let counting = |_index: usize, _value: u8| {
            calls.set(calls.get() + 1);
            true
        };
        let mut config = ModuleConfiguration::new(
            Defaults(vec![0; 2]),
            counting,
            InMemoryBackend::new(8),
            StoreConfig::default(),
        );
        config.setup().unwrap();

        assert!(!config.set_byte(2, 1));
        assert_eq!(calls.get(), 0);
        assert!(config.set_byte(1, 1));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn process_value_matches_set_byte() {
        let mut config = store(4);
        config.setup().unwrap();

        assert!(OperatorInterfaceClient::validate_address(&config, 3));
        assert!(!OperatorInterfaceClient::validate_address(&config, 4));
        assert!(config.process_value(3, 4));
        assert!(!config.process_value(3, 5));
        assert!(!config.process_value(4, 4));
        assert_eq!(config.get_byte(3), 4);
        assert_eq!(
            OperatorInterfaceClient::interaction_timeout(&config),
            Duration::from_secs(30)
        );
    }

    #[test]
    fn writes_are_not_persisted_implicitly() {
        let mut config = store(4);
        config.setup().unwrap();
        assert!(config.set_byte(0, 2));
        assert_eq!(config.storage().write_count(), 0);
    }

    #[test]
    fn save_byte_writes_at_base_offset() {
        let mut config = store(4);
        config.setup().unwrap();
        assert!(config.set_byte(1, 4));

        assert!(config.save_byte(1).unwrap());
        assert_eq!(config.storage().read(9).unwrap(), 4);
        // Unchanged byte costs no write cycle
        assert!(!config.save_byte(1).unwrap());
        assert_eq!(config.storage().write_count(), 1);
    }

    #[test]
    fn save_byte_out_of_range_is_ignored() {
        let mut config = store(4);
        config.setup().unwrap();
        assert!(!config.save_byte(4).unwrap());
        assert_eq!(config.storage().data(), vec![ERASED_BYTE; 32]);
    }

    #[test]
    fn save_only_writes_changed_bytes() {
        let mut config = store(4);
        config.setup().unwrap();

        assert_eq!(config.save().unwrap(), 4);
        assert_eq!(config.save().unwrap(), 0);

        assert!(config.set_byte(3, 8));
        assert_eq!(config.save().unwrap(), 1);
        assert_eq!(config.storage().read_range(8, 4).unwrap(), vec![0, 0, 0, 8]);
        assert_eq!(config.storage().write_count(), 5);
    }

    #[test]
    fn load_bypasses_validator() {
        let mut data = vec![ERASED_BYTE; 32];
        data[8..12].copy_from_slice(&[1, 3, 5, 7]);
        let mut config = ModuleConfiguration::new(
            Defaults(vec![0; 4]),
            even as EvenValidator,
            InMemoryBackend::with_data(data),
            StoreConfig::new().base_address(8),
        );
        config.setup().unwrap();

        config.load().unwrap();
        assert_eq!(config.as_bytes(), &[1, 3, 5, 7]);
    }

    #[test]
    fn load_failure_leaves_buffer_unchanged() {
        let mut config = ModuleConfiguration::new(
            Defaults(vec![2; 4]),
            AcceptAll,
            InMemoryBackend::new(4),
            StoreConfig::default(),
        );
        config.setup().unwrap();
        // Shrink the medium underneath the store
        *config.storage_mut() = InMemoryBackend::new(2);

        assert!(matches!(
            config.load(),
            Err(CoreError::Storage(StorageError::OutOfBounds { .. }))
        ));
        assert_eq!(config.as_bytes(), &[2, 2, 2, 2]);
    }

    #[test]
    fn erase_resets_region_and_buffer() {
        let mut config = store(4);
        config.setup().unwrap();
        config.set_byte(0, 2);
        config.save().unwrap();

        config.erase().unwrap();
        assert_eq!(config.as_bytes(), &[ERASED_BYTE; 4]);
        assert_eq!(config.storage().read_range(8, 4).unwrap(), vec![ERASED_BYTE; 4]);

        config.load().unwrap();
        assert_eq!(config.as_bytes(), &[ERASED_BYTE; 4]);
    }

    #[test]
    fn erase_leaves_neighbouring_cells_alone() {
        let mut data = vec![0u8; 16];
        data[12] = 0x11;
        let mut config = ModuleConfiguration::new(
            Defaults(vec![0; 4]),
            AcceptAll,
            InMemoryBackend::with_data(data),
            StoreConfig::new().base_address(8),
        );
        config.setup().unwrap();
        config.erase().unwrap();

        let cells = config.into_storage().data();
        assert_eq!(cells[7], 0);
        assert_eq!(&cells[8..12], &[ERASED_BYTE; 4]);
        assert_eq!(cells[12], 0x11);
    }
}
