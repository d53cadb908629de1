//! Local filenames for downloaded artifacts.

mod path;
mod sanitize;

pub use path::filename_from_url_path;
pub use sanitize::sanitize_file_name;

use crate::config::UrlEntry;

/// Filename a URL entry is staged and copied under.
///
/// Prefers the entry's explicit `file_name`, then the last URL path segment,
/// then `<entry name>.bin`, falling back to `download.bin` when everything
/// sanitizes to nothing.
pub fn entry_file_name(entry: &UrlEntry) -> String {
    let from_name = Some(sanitize_file_name(&entry.name))
        .filter(|n| !n.is_empty())
        .map(|n| format!("{}.bin", n));
    [entry.file_name.clone(), filename_from_url_path(&entry.url), from_name]
        .into_iter()
        .flatten()
        .map(|c| sanitize_file_name(&c))
        .find(|c| !c.is_empty())
        .unwrap_or_else(|| "download.bin".to_string())
}
