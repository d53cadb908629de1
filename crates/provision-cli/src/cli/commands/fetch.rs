//! `provision fetch <set>` – run one source set.

use anyhow::Result;
use provision_core::config::ProvisionConfig;
use provision_core::setup;
use std::path::Path;

pub fn run_fetch(cfg: &ProvisionConfig, install_dir: &Path, name: &str) -> Result<()> {
    let set = cfg.source(name).ok_or_else(|| {
        let known: Vec<_> = cfg.sources.iter().map(|s| s.name.as_str()).collect();
        anyhow::anyhow!("unknown source set '{}' (known: {})", name, known.join(", "))
    })?;
    let report = setup::fetch_source(&super::fetcher(cfg), set, install_dir)?;
    super::print_report(&report);
    Ok(())
}
