//! Single-byte get and set commands.

use super::{open_loaded, ImageArgs};
use modconf_core::{OperatorSession, SubmitOutcome};
use std::time::Instant;
use tracing::info;

/// Prints the configuration byte at `index`.
pub fn get(args: &ImageArgs, index: usize) -> Result<(), Box<dyn std::error::Error>> {
    let config = open_loaded(args)?;
    let value = config
        .try_get_byte(index)
        .ok_or_else(|| format!("Index {} is outside the configuration (size {})", index, config.size()))?;

    println!("[{}] = {} (0x{:02x})", index, value, value);
    Ok(())
}

/// Validates `value` for `index` and persists it.
pub fn set(args: &ImageArgs, index: usize, value: u8) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = open_loaded(args)?;

    let mut session = OperatorSession::open(&mut config, Instant::now());
    match session.submit(Instant::now(), index, value) {
        SubmitOutcome::Applied => {}
        SubmitOutcome::InvalidAddress => {
            return Err(format!("Index {} is outside the configuration", index).into());
        }
        SubmitOutcome::Rejected => {
            return Err(format!("Value {} rejected for index {}", value, index).into());
        }
        SubmitOutcome::Expired => return Err("Operator session expired".into()),
    }

    let config = session.close();
    let written = config.save_byte(index)?;
    info!(index, value, written, "configuration byte stored");

    println!("✓ [{}] = {}", index, value);
    Ok(())
}
