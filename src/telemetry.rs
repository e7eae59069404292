use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Where log output goes
pub enum LogTarget<'a> {
    /// Terminal UI without a log file: the screen belongs to the UI
    Discard,
    Stderr,
    File(&'a Path),
}

/// Install the global subscriber. `RUST_LOG` controls the level (default `info`).
pub fn init(target: LogTarget<'_>) -> Result<()> {
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = match target {
        LogTarget::Discard => return Ok(()),
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .try_init(),
        LogTarget::File(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };

    // Already installed (tests, embedding) is fine
    if let Err(e) = installed {
        tracing::debug!("tracing subscriber not installed: {e}");
    }
    Ok(())
}
