//! `provision get|set|fields` – single-field access to the server config.

use anyhow::Result;
use provision_core::patch;
use std::path::Path;

pub fn run_get(config_file: &Path, field: &str) -> Result<()> {
    let value = patch::get_config_field(config_file, field)?;
    println!("{}", value);
    Ok(())
}

pub fn run_set(config_file: &Path, field: &str, value: &str) -> Result<()> {
    patch::set_config_field(config_file, field, value)?;
    let stored = patch::get_config_field(config_file, field)?;
    println!("{} = {}", field, stored);
    Ok(())
}

pub fn run_fields(config_file: &Path) -> Result<()> {
    for (path, value) in patch::list_config_fields(config_file)? {
        println!("{}: {}", path, value);
    }
    Ok(())
}
