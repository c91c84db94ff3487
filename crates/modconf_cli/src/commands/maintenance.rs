//! Reset and erase commands.

use super::{open, open_loaded, ImageArgs};
use tracing::info;

/// Writes the default configuration to the image.
pub fn reset(args: &ImageArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = open(args)?;
    let written = config.save()?;
    info!(written, "defaults written");

    println!("✓ Configuration reset to defaults");
    println!("  Size: {} bytes", config.size());
    println!("  Changed: {} bytes", written);
    Ok(())
}

/// Erases the configuration region of the image.
pub fn erase(args: &ImageArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = open_loaded(args)?;
    config.erase()?;
    info!(size = config.size(), base = config.base_address(), "region erased");

    println!("✓ Configuration erased");
    println!(
        "  Region: 0x{:04x}..0x{:04x}",
        config.base_address(),
        config.base_address() as usize + config.size()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::image_args;

    #[test]
    fn reset_then_erase() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eeprom.bin");
        let args = image_args(&path);

        reset(&args).unwrap();
        assert_eq!(open_loaded(&args).unwrap().as_bytes(), &[0; 8]);

        erase(&args).unwrap();
        let config = open_loaded(&args).unwrap();
        assert_eq!(config.as_bytes(), &[0xFF; 8]);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 64);
    }
}
