//! `provision patch` – placeholder substitution only.

use anyhow::Result;
use provision_core::config::ProvisionConfig;
use provision_core::setup;
use std::path::Path;

pub fn run_patch(cfg: &ProvisionConfig, install_dir: &Path) -> Result<()> {
    let changed = setup::patch_placeholders(cfg, install_dir)?;
    println!(
        "Patched {} line(s) in {}",
        changed,
        setup::resolve_in(install_dir, &cfg.config_file).display()
    );
    Ok(())
}
