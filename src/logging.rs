//! Logging bootstrap.
//!
//! Runs log to `~/.local/state/gtfs-fetch/gtfs-fetch.log`; stdout stays
//! reserved for the CLI's result lines. If the state directory cannot be
//! used (read-only home, sandboxed run), logging degrades to stderr
//! instead of aborting the run.

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "gtfs-fetch.log";
const DEFAULT_FILTER: &str = "info,gtfs_fetch=debug";

/// Absolute path of the log file under the XDG state directory.
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("gtfs-fetch")?;
    Ok(xdg_dirs.get_state_home().join(LOG_FILE_NAME))
}

/// Initialize structured logging. Filter defaults to
/// `info,gtfs_fetch=debug`, overridable via `RUST_LOG`.
pub fn init_logging() -> Result<()> {
    let (writer, target) = match open_log_file() {
        Ok((file, path)) => (BoxMakeWriter::new(AppendWriter(file)), Some(path)),
        Err(err) => {
            eprintln!("gtfs-fetch: cannot open log file ({err:#}); logging to stderr");
            (BoxMakeWriter::new(std::io::stderr), None)
        }
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    if let Some(path) = target {
        tracing::info!("gtfs-fetch logging initialized at {}", path.display());
    }

    Ok(())
}

fn open_log_file() -> Result<(fs::File, PathBuf)> {
    let path = log_file_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;
    Ok((file, path))
}

/// Hands out clones of the same appending file handle.
struct AppendWriter(fs::File);

impl<'a> MakeWriter<'a> for AppendWriter {
    type Writer = fs::File;

    fn make_writer(&'a self) -> Self::Writer {
        self.0.try_clone().expect("failed to clone log file handle")
    }
}
