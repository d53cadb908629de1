//! Source-set fetcher.
//!
//! Downloads every URL of a [`SourceSet`] into a scratch directory, then
//! extracts or copies each staged file into the target directory. The scratch
//! directory is removed whether the batch succeeds or fails; files already
//! materialized into the target stay when a later entry fails.

mod download;
mod materialize;
mod scratch;

pub use download::download_to_file;
pub use materialize::{
    copy_into, extract_archive, should_extract, sniff, ArtifactKind, Materialized,
};
pub use scratch::ScratchDir;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{HttpConfig, SourceSet, UrlEntry};
use crate::url_model::entry_file_name;

/// Progress notifications, emitted in order as a set is processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchEvent {
    Downloading { name: String, url: String },
    Extracting { name: String, file: PathBuf },
    Copying { name: String, file: PathBuf },
}

/// One URL entry after it reached the target directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializedFile {
    pub name: String,
    pub file_name: String,
    pub bytes: u64,
    pub outcome: Materialized,
}

/// Summary of a completed source set.
#[derive(Debug, Clone)]
pub struct FetchReport {
    pub set: String,
    pub target: PathBuf,
    pub files: Vec<MaterializedFile>,
}

impl FetchReport {
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.bytes).sum()
    }
}

struct Staged<'a> {
    entry: &'a UrlEntry,
    file_name: String,
    path: PathBuf,
    bytes: u64,
}

/// Blocking, sequential fetcher for source sets.
pub struct Fetcher {
    http: HttpConfig,
    scratch_root: Option<PathBuf>,
    observer: Option<Box<dyn Fn(&FetchEvent)>>,
}

impl Fetcher {
    pub fn new(http: HttpConfig) -> Self {
        Self {
            http,
            scratch_root: None,
            observer: None,
        }
    }

    /// Stage downloads under `root` instead of the system temp dir.
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    /// Called for every [`FetchEvent`] (e.g. to print progress).
    pub fn with_observer(mut self, observer: impl Fn(&FetchEvent) + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    fn emit(&self, event: FetchEvent) {
        tracing::info!("{:?}", event);
        if let Some(observer) = &self.observer {
            observer(&event);
        }
    }

    /// Downloads and materializes every entry of `set` into `target_dir`,
    /// creating it (and its parents) if needed.
    pub fn fetch_set(&self, set: &SourceSet, target_dir: &Path) -> Result<FetchReport> {
        fs::create_dir_all(target_dir)
            .with_context(|| format!("create target dir {}", target_dir.display()))?;

        let scratch = ScratchDir::acquire(self.scratch_root.as_deref())?;
        let files = self
            .stage_and_materialize(set, target_dir, scratch.path())
            .with_context(|| format!("source set '{}'", set.name))?;
        scratch.release()?;

        let report = FetchReport {
            set: set.name.clone(),
            target: target_dir.to_path_buf(),
            files,
        };
        tracing::info!(
            set = %report.set,
            files = report.files.len(),
            bytes = report.total_bytes(),
            "source set complete"
        );
        Ok(report)
    }

    fn stage_and_materialize(
        &self,
        set: &SourceSet,
        target_dir: &Path,
        scratch: &Path,
    ) -> Result<Vec<MaterializedFile>> {
        let mut staged = Vec::with_capacity(set.urls.len());
        for (index, entry) in set.urls.iter().enumerate() {
            let file_name = entry_file_name(entry);
            let path = scratch.join(format!("{:02}-{}", index, file_name));
            self.emit(FetchEvent::Downloading {
                name: entry.name.clone(),
                url: entry.url.clone(),
            });
            let bytes = download_to_file(&entry.url, &path, &self.http)
                .with_context(|| format!("download '{}' from {}", entry.name, entry.url))?;
            staged.push(Staged {
                entry,
                file_name,
                path,
                bytes,
            });
        }

        let mut files = Vec::with_capacity(staged.len());
        for s in staged {
            let extract = should_extract(set.mode, &s.path)?;
            let name = s.entry.name.clone();
            let file = s.path.clone();
            let outcome = if extract {
                self.emit(FetchEvent::Extracting { name, file });
                Materialized::Extracted(extract_archive(&s.path, target_dir)?)
            } else {
                self.emit(FetchEvent::Copying { name, file });
                Materialized::Copied(copy_into(&s.path, target_dir, &s.file_name)?)
            };
            files.push(MaterializedFile {
                name: s.entry.name.clone(),
                file_name: s.file_name,
                bytes: s.bytes,
                outcome,
            });
        }
        Ok(files)
    }
}
