/// Tracing setup. The terminal belongs to the game, so log lines go to a
/// file in the system temp directory instead of stderr.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

pub const LOG_FILE: &str = "car_dodge.log";

/// Install the global subscriber. `RUST_LOG` overrides the default `info`
/// filter. Returns the log file path.
pub fn init() -> Result<PathBuf> {
    let path = std::env::temp_dir().join(LOG_FILE);
    let file = File::create(&path)
        .with_context(|| format!("could not create log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("tracing subscriber already set");
    }
    Ok(path)
}
