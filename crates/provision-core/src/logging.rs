//! Tracing setup for the `provision` binary.
//!
//! Events go to `$XDG_STATE_HOME/provision/provision.log`; when that file
//! cannot be opened the caller falls back to [`init_logging_stderr`].
//! `RUST_LOG` overrides the default filter in both cases.

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,provision=debug,provision_core=debug";

pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("provision")?;
    Ok(xdg_dirs.get_state_home().join("provision.log"))
}

fn install<W>(writer: W) -> Result<()>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("install tracing subscriber: {}", e))
}

/// Appends structured logs to [`log_file_path`].
pub fn init_logging() -> Result<()> {
    let path = log_file_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create log dir {}", dir.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file {}", path.display()))?;

    install(Mutex::new(file))?;
    tracing::info!("provision logging initialized at {}", path.display());
    Ok(())
}

pub fn init_logging_stderr() {
    let _ = install(std::io::stderr);
}
