//! modconf CLI
//!
//! Operator tool for the persistent configuration of a firmware module,
//! working on an EEPROM image file.
//!
//! # Commands
//!
//! - `inspect` - Display the stored configuration
//! - `get` / `set` - Read or change a single configuration byte
//! - `shell` - Change bytes interactively from stdin
//! - `reset` - Write default values to the image
//! - `erase` - Erase the configuration region

mod commands;

use clap::{Parser, Subcommand};
use commands::ImageArgs;
use tracing_subscriber::EnvFilter;

/// Inspect and edit a module configuration stored in an EEPROM image.
#[derive(Parser)]
#[command(name = "modconf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    image: ImageArgs,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display the stored configuration
    Inspect {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Print a single configuration byte
    Get {
        /// Configuration index
        #[arg(value_parser = commands::parse_number::<usize>)]
        index: usize,
    },

    /// Validate and persist a single configuration byte
    Set {
        /// Configuration index
        #[arg(value_parser = commands::parse_number::<usize>)]
        index: usize,

        /// New value
        #[arg(value_parser = commands::parse_number::<u8>)]
        value: u8,
    },

    /// Read `<index> <value>` lines from stdin and apply them
    Shell,

    /// Overwrite the stored configuration with default values
    Reset,

    /// Erase the configuration region of the image
    Erase,

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Inspect { format } => commands::inspect::run(&cli.image, &format)?,
        Commands::Get { index } => commands::edit::get(&cli.image, index)?,
        Commands::Set { index, value } => commands::edit::set(&cli.image, index, value)?,
        Commands::Shell => {
            let stdin = std::io::stdin();
            commands::shell::run(&cli.image, stdin.lock(), std::io::stdout())?;
        }
        Commands::Reset => commands::maintenance::reset(&cli.image)?,
        Commands::Erase => commands::maintenance::erase(&cli.image)?,
        Commands::Version => {
            println!("modconf CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("modconf core v{}", modconf_core::VERSION);
        }
    }

    Ok(())
}
