//! CLI for provision.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use provision_core::config::{self, ProvisionConfig};
use provision_core::setup;
use std::path::{Path, PathBuf};

use commands::{run_fetch, run_fields, run_get, run_patch, run_set, run_setup, run_sources};

/// Top-level CLI. Without a subcommand, runs the full setup.
#[derive(Debug, Parser)]
#[command(name = "provision")]
#[command(about = "Download datasets and models and patch the server config", long_about = None)]
pub struct Cli {
    /// Installation directory (default: current directory).
    #[arg(long, global = true, value_name = "DIR")]
    pub install_dir: Option<PathBuf>,

    /// Config file to use instead of ~/.config/provision/config.toml.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Substitute <BASE_DIR>/<DSET_DIR> in the server config only.
    Patch,

    /// Download and materialize a single source set.
    Fetch {
        /// Source set name (see `provision sources`).
        set: String,
    },

    /// Print the value of a config field.
    Get {
        /// Dotted field path, e.g. `preproc_config.net_config.model_file`.
        field: String,
    },

    /// Set the value of a config field, keeping its quoting.
    Set {
        /// Dotted field path.
        field: String,
        /// New value (single line). Leading `-` is allowed, e.g. `-1`.
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// List every field in the server config with its value.
    Fields,

    /// List configured source sets and their URLs.
    Sources,
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = load_config(&cli)?;
        tracing::debug!("loaded config: {:?}", cfg);

        // `sources` must work outside an install dir, so resolve it lazily.
        let install_dir = || setup::resolve_install_dir(cli.install_dir.as_deref());
        let config_file = |dir: &Path| setup::resolve_in(dir, &cfg.config_file);

        match &cli.command {
            None => run_setup(&cfg, &install_dir()?)?,
            Some(CliCommand::Patch) => run_patch(&cfg, &install_dir()?)?,
            Some(CliCommand::Fetch { set }) => run_fetch(&cfg, &install_dir()?, set)?,
            Some(CliCommand::Get { field }) => run_get(&config_file(&install_dir()?), field)?,
            Some(CliCommand::Set { field, value }) => {
                run_set(&config_file(&install_dir()?), field, value)?
            }
            Some(CliCommand::Fields) => run_fields(&config_file(&install_dir()?))?,
            Some(CliCommand::Sources) => run_sources(&cfg)?,
        }

        Ok(())
    }
}

fn load_config(cli: &Cli) -> Result<ProvisionConfig> {
    match &cli.config {
        Some(path) => config::load_from_path(path),
        None => config::load_or_init(),
    }
}
