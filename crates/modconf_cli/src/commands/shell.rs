//! Interactive shell command.
//!
//! Each input line is `<index> <value>`. An empty line, `q` or end of input
//! ends the session, as does staying idle past the interaction timeout.

use super::{open_loaded, parse_number, ImageArgs};
use modconf_core::{OperatorSession, SubmitOutcome};
use std::io::{BufRead, Write};
use std::time::Instant;
use tracing::{debug, info};

/// Runs the shell, reading commands from `input` and replying on `output`.
pub fn run<R: BufRead, W: Write>(
    args: &ImageArgs,
    input: R,
    mut output: W,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = open_loaded(args)?;
    let mut session = OperatorSession::open(&mut config, Instant::now());
    let mut applied = 0usize;

    writeln!(output, "Enter <index> <value>, empty line to quit")?;
    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line == "q" {
            break;
        }

        let Some((index, value)) = parse_line(line) else {
            writeln!(output, "? expected <index> <value>")?;
            continue;
        };

        match session.submit(Instant::now(), index, value) {
            SubmitOutcome::Applied => {
                session.client_mut().save_byte(index)?;
                applied += 1;
                writeln!(output, "ok [{}] = {}", index, value)?;
            }
            SubmitOutcome::InvalidAddress => writeln!(output, "invalid address {}", index)?,
            SubmitOutcome::Rejected => writeln!(output, "value {} rejected", value)?,
            SubmitOutcome::Expired => {
                debug!("operator session idle past timeout");
                writeln!(output, "session expired")?;
                break;
            }
        }
    }

    info!(applied, "shell session closed");
    Ok(())
}

fn parse_line(line: &str) -> Option<(usize, u8)> {
    let mut parts = line.split_whitespace();
    let index = parse_number(parts.next()?).ok()?;
    let value = parse_number(parts.next()?).ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((index, value))
}
