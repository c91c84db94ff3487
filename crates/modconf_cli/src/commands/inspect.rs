//! Inspect command implementation.

use super::{open_loaded, ImageArgs};
use modconf_core::Validator;
use modconf_storage::{NvStorage, ERASED_BYTE};
use serde::Serialize;

/// Configuration inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Image path.
    pub path: String,
    /// EEPROM capacity in bytes.
    pub capacity: u32,
    /// EEPROM address of configuration byte 0.
    pub base_address: u32,
    /// Number of configuration bytes.
    pub size: usize,
    /// Configuration bytes that still hold the erase value.
    pub erased: usize,
    /// Configuration bytes rejected by the current validator.
    pub invalid: Vec<usize>,
    /// The configuration bytes.
    pub bytes: Vec<u8>,
}

/// Runs the inspect command.
pub fn run(args: &ImageArgs, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let result = inspect(args)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_text_output(&result);
        }
    }

    Ok(())
}

fn inspect(args: &ImageArgs) -> Result<InspectResult, Box<dyn std::error::Error>> {
    let config = open_loaded(args)?;
    let validator = args.validator();
    let bytes = config.as_bytes().to_vec();

    let invalid = bytes
        .iter()
        .enumerate()
        .filter(|(index, value)| !validator.validate(*index, **value))
        .map(|(index, _)| index)
        .collect();

    Ok(InspectResult {
        path: args
            .image
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default(),
        capacity: config.storage().capacity(),
        base_address: config.base_address(),
        size: config.size(),
        erased: bytes
            .iter()
            .filter(|&&b| b == ERASED_BYTE)
            .count(),
        invalid,
        bytes,
    })
}

fn print_text_output(result: &InspectResult) {
    println!("Module Configuration");
    println!("====================");
    println!();
    println!("Image: {}", result.path);
    println!();
    println!("Layout:");
    println!("  Capacity:     {} bytes", result.capacity);
    println!("  Base address: 0x{:04x}", result.base_address);
    println!("  Size:         {} bytes", result.size);
    println!();
    println!("Contents:");
    for (row, chunk) in result.bytes.chunks(16).enumerate() {
        let hex: Vec<String> = chunk.iter().map(|b| format!("{:02x}", b)).collect();
        println!("  {:04x}: {}", row * 16, hex.join(" "));
    }
    println!();
    println!("  Erased bytes:  {}", result.erased);
    if result.invalid.is_empty() {
        println!("  Invalid bytes: none");
    } else {
        let indices: Vec<String> = result.invalid.iter().map(ToString::to_string).collect();
        println!("  Invalid bytes: {}", indices.join(", "));
    }
}
