use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Initialise the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set. Otherwise `log_level` is used as the filter
/// directive, falling back to `"info"` if it does not parse. Output goes to
/// stderr so it never mixes with the terminal UI.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()?;

    Ok(())
}

// ── Data-path discovery ────────────────────────────────────────────────────────

/// Directories searched for source files, relative to the working directory.
pub const DATA_DIR_CANDIDATES: [&str; 2] = ["data", "."];

/// Locate the directory holding the source CSV files under `base`.
///
/// Checks `base/data` then `base` and returns the first that is a
/// directory, or `None` when neither is.
pub fn discover_data_path(base: &Path) -> Option<PathBuf> {
    DATA_DIR_CANDIDATES
        .iter()
        .map(|c| base.join(c))
        .find(|p| p.is_dir())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
