//! End-to-end setup of an installation directory.
//!
//! Order is fixed: placeholder substitution in the server config, then every
//! configured source set in turn. Any failure aborts the run.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::{ProvisionConfig, SourceSet};
use crate::fetch::{FetchReport, Fetcher};
use crate::patch;

/// Resolves a possibly relative path against the install directory.
pub fn resolve_in(install_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        install_dir.join(path)
    }
}

/// Canonical install directory: `requested` if given, else the current directory.
pub fn resolve_install_dir(requested: Option<&Path>) -> Result<PathBuf> {
    let dir = match requested {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir().context("resolve current directory")?,
    };
    dir.canonicalize()
        .with_context(|| format!("install dir {}", dir.display()))
}

/// Substitutes `<BASE_DIR>`/`<DSET_DIR>` in the configured server config file.
pub fn patch_placeholders(cfg: &ProvisionConfig, install_dir: &Path) -> Result<usize> {
    let config_file = resolve_in(install_dir, &cfg.config_file);
    patch::prepare_config(install_dir, &config_file, cfg.dataset_dir.as_deref())
        .with_context(|| format!("patch placeholders in {}", config_file.display()))
}

/// Fetches one source set into its target under `install_dir`.
pub fn fetch_source(fetcher: &Fetcher, set: &SourceSet, install_dir: &Path) -> Result<FetchReport> {
    let target = resolve_in(install_dir, &set.target);
    tracing::debug!(set = %set.name, target = %target.display(), "fetching source set");
    fetcher.fetch_set(set, &target)
}

/// Runs the whole pipeline and returns one report per source set.
pub fn run_setup(
    cfg: &ProvisionConfig,
    install_dir: &Path,
    fetcher: &Fetcher,
) -> Result<Vec<FetchReport>> {
    tracing::info!(install_dir = %install_dir.display(), "setup started");
    patch_placeholders(cfg, install_dir)?;

    let mut reports = Vec::with_capacity(cfg.sources.len());
    for set in &cfg.sources {
        reports.push(fetch_source(fetcher, set, install_dir)?);
    }
    tracing::info!(sets = reports.len(), "setup finished");
    Ok(reports)
}
