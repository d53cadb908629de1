//! `provision` (no subcommand) – full setup.

use anyhow::Result;
use provision_core::config::ProvisionConfig;
use provision_core::setup;
use std::path::Path;

pub fn run_setup(cfg: &ProvisionConfig, install_dir: &Path) -> Result<()> {
    println!("Setting up {}", install_dir.display());
    let reports = setup::run_setup(cfg, install_dir, &super::fetcher(cfg))?;
    for report in &reports {
        super::print_report(report);
    }
    Ok(())
}
