//! Scratch directory that stages one batch of downloads.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary directory removed by [`ScratchDir::release`], or on drop when a
/// batch bails out early.
pub struct ScratchDir {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl ScratchDir {
    /// Creates a fresh directory under `root`, or under the system temp dir when `None`.
    pub fn acquire(root: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("provision-");
        let dir = match root {
            Some(root) => builder
                .tempdir_in(root)
                .with_context(|| format!("create scratch dir in {}", root.display()))?,
            None => builder.tempdir().context("create scratch dir")?,
        };
        let path = dir.path().to_path_buf();
        tracing::debug!(path = %path.display(), "scratch dir acquired");
        Ok(Self {
            dir: Some(dir),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes the directory and everything in it, reporting failures.
    pub fn release(mut self) -> Result<()> {
        if let Some(dir) = self.dir.take() {
            dir.close()
                .with_context(|| format!("remove scratch dir {}", self.path.display()))?;
            tracing::debug!(path = %self.path.display(), "scratch dir released");
        }
        Ok(())
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            match dir.close() {
                Ok(()) => tracing::debug!(path = %self.path.display(), "scratch dir released on unwind"),
                Err(e) => tracing::warn!(path = %self.path.display(), "failed to remove scratch dir: {}", e),
            }
        }
    }
}
