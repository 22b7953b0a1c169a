//! Log output for the CLI
//!
//! The library logs through the `log` facade; the fmt subscriber bridges
//! those records and writes them to stderr so stdout stays clean for basis
//! output.

use anyhow::{anyhow, Result};
use tracing_subscriber::filter::LevelFilter;

/// Install the subscriber; `verbosity` is the number of `-v` flags
pub fn init(verbosity: u8) -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(level_for(verbosity))
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow!("failed to install logger: {}", e))
}

fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}
