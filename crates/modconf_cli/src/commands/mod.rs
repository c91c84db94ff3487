//! CLI command implementations.

pub mod edit;
pub mod inspect;
pub mod maintenance;
pub mod shell;

use clap::Args;
use modconf_core::{Defaults, ModuleConfiguration, RangeValidator, StoreConfig};
use modconf_storage::FileBackend;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration store backed by an EEPROM image file.
pub type ImageConfiguration = ModuleConfiguration<Defaults, RangeValidator, FileBackend>;

/// Describes where and how the configuration is laid out in the image.
#[derive(Debug, Clone, Args)]
pub struct ImageArgs {
    /// Path to the EEPROM image file
    #[arg(global = true, short, long)]
    pub image: Option<PathBuf>,

    /// Size of the EEPROM in bytes
    #[arg(global = true, long, default_value = "1024", value_parser = parse_number::<u32>)]
    pub capacity: u32,

    /// EEPROM address of configuration byte 0
    #[arg(global = true, long, default_value = "0", value_parser = parse_number::<u32>)]
    pub base: u32,

    /// Number of configuration bytes
    #[arg(global = true, long, default_value = "16", value_parser = parse_number::<usize>)]
    pub size: usize,

    /// Default value of every configuration byte
    #[arg(global = true, long = "default", default_value = "0xff", value_parser = parse_number::<u8>)]
    pub default_value: u8,

    /// Smallest accepted value
    #[arg(global = true, long, default_value = "0", value_parser = parse_number::<u8>)]
    pub min: u8,

    /// Largest accepted value
    #[arg(global = true, long, default_value = "255", value_parser = parse_number::<u8>)]
    pub max: u8,

    /// Idle time in milliseconds before an interactive session expires
    #[arg(global = true, long, default_value = "30000")]
    pub timeout_ms: u64,
}

impl ImageArgs {
    /// Builds the store configuration.
    #[must_use]
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new()
            .base_address(self.base)
            .interaction_timeout(Duration::from_millis(self.timeout_ms))
    }

    /// Builds the validator applied to every configuration byte.
    #[must_use]
    pub fn validator(&self) -> RangeValidator {
        RangeValidator::new().with_fallback(self.min..=self.max)
    }
}

/// Opens the image and returns an initialized configuration holding its
/// defaults. Call `load` to pick up the persisted values.
pub fn open(args: &ImageArgs) -> Result<ImageConfiguration, Box<dyn std::error::Error>> {
    let path = args.image.as_ref().ok_or("Image path required (--image)")?;
    let backend = FileBackend::open_with_create_dirs(path, args.capacity)?;

    let mut config = ModuleConfiguration::new(
        Defaults::filled(args.size, args.default_value),
        args.validator(),
        backend,
        args.store_config(),
    );
    config.setup()?;
    Ok(config)
}

/// Opens the image and loads the persisted configuration.
pub fn open_loaded(args: &ImageArgs) -> Result<ImageConfiguration, Box<dyn std::error::Error>> {
    let mut config = open(args)?;
    config.load()?;
    Ok(config)
}

/// Parses a decimal or `0x`-prefixed hexadecimal number.
pub fn parse_number<T>(text: &str) -> Result<T, String>
where
    T: TryFrom<u64>,
{
    let trimmed = text.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => trimmed.parse::<u64>(),
    }
    .map_err(|e| format!("invalid number '{}': {}", text, e))?;

    T::try_from(parsed).map_err(|_| format!("number {} is out of range", parsed))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::ImageArgs;
    use std::path::Path;

    /// Arguments for a small image with configuration bytes at 0x10..0x18.
    pub fn image_args(path: &Path) -> ImageArgs {
        ImageArgs {
            image: Some(path.to_path_buf()),
            capacity: 64,
            base: 0x10,
            size: 8,
            default_value: 0,
            min: 0,
            max: 100,
            timeout_ms: 30_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_decimal_and_hex() {
        assert_eq!(parse_number::<u8>("42"), Ok(42));
        assert_eq!(parse_number::<u8>("0xff"), Ok(255));
        assert_eq!(parse_number::<u32>("0X100"), Ok(256));
        assert_eq!(parse_number::<usize>(" 7 "), Ok(7));
    }

    #[test]
    fn parse_rejects_garbage_and_overflow() {
        assert!(parse_number::<u8>("0x").is_err());
        assert!(parse_number::<u8>("ten").is_err());
        assert!(parse_number::<u8>("256").is_err());
    }

    #[test]
    fn open_requires_image_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = test_support::image_args(&dir.path().join("eeprom.bin"));
        args.image = None;
        assert!(open(&args).is_err());
    }

    #[test]
    fn open_fresh_image_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let args = test_support::image_args(&dir.path().join("eeprom.bin"));

        let config = open(&args).unwrap();
        assert_eq!(config.as_bytes(), &[0; 8]);

        // Nothing persisted yet, so loading yields erased cells
        let config = open_loaded(&args).unwrap();
        assert_eq!(config.as_bytes(), &[0xFF; 8]);
    }
}
