//! `provision sources` – list configured source sets.

use anyhow::Result;
use provision_core::config::ProvisionConfig;
use provision_core::url_model::entry_file_name;

pub fn run_sources(cfg: &ProvisionConfig) -> Result<()> {
    for set in &cfg.sources {
        println!("{} ({:?}) -> {}", set.name, set.mode, set.target.display());
        for entry in &set.urls {
            println!("  {:<12} {} [{}]", entry.name, entry.url, entry_file_name(entry));
        }
    }
    Ok(())
}
