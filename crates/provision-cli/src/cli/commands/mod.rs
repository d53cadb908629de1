//! CLI command handlers, one per file.

mod fetch;
mod field;
mod patch;
mod setup;
mod sources;

pub use fetch::run_fetch;
pub use field::{run_fields, run_get, run_set};
pub use patch::run_patch;
pub use setup::run_setup;
pub use sources::run_sources;

use provision_core::config::ProvisionConfig;
use provision_core::fetch::{FetchEvent, FetchReport, Fetcher};

/// Prints one progress line per fetch step.
fn print_progress(event: &FetchEvent) {
    match event {
        FetchEvent::Downloading { name, url } => println!("Downloading {}: {}...", name, url),
        FetchEvent::Extracting { name, file } => {
            println!("Extracting {}: {}...", name, file.display())
        }
        FetchEvent::Copying { name, file } => println!("Copying {}: {}...", name, file.display()),
    }
}

fn fetcher(cfg: &ProvisionConfig) -> Fetcher {
    Fetcher::new(cfg.http.clone()).with_observer(print_progress)
}

fn print_report(report: &FetchReport) {
    println!(
        "{}: {} file(s), {} bytes -> {}",
        report.set,
        report.files.len(),
        report.total_bytes(),
        report.target.display()
    );
}
