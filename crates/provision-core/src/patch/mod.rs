//! Config patching: placeholder substitution and single-field edits.
//!
//! Every operation reads the file from disk, transforms it in memory, writes
//! the result to a sibling `<name>.new` file and renames it over the original.

mod error;
mod field;
mod placeholder;

pub use error::PatchError;
pub use field::{get_config_field, list_config_fields, set_config_field};
pub use placeholder::{prepare_config, substitute_line, DatasetDir, BASE_DIR_TOKEN, DSET_DIR_TOKEN};

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Sibling path used to stage a rewrite of `file`.
pub(crate) fn staging_path(file: &Path) -> PathBuf {
    let mut name = file
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("config"));
    name.push(".new");
    file.with_file_name(name)
}

/// Moves a fully written staging file over `file`.
pub(crate) fn replace_with(staged: &Path, file: &Path) -> Result<(), PatchError> {
    fs::rename(staged, file).map_err(|e| PatchError::io("replace", file, e))
}

/// Runs `write` against the staging sibling of `file`, then replaces `file`
/// with it. The staging file is removed if any step fails.
pub(crate) fn stage_and_replace<T>(
    file: &Path,
    write: impl FnOnce(&Path) -> Result<T, PatchError>,
) -> Result<T, PatchError> {
    let staged = staging_path(file);
    let result = write(&staged).and_then(|out| replace_with(&staged, file).map(|()| out));
    if result.is_err() {
        if let Err(e) = fs::remove_file(&staged) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!(path = %staged.display(), "could not remove staging file: {}", e);
            }
        }
    }
    result
}

/// Writes `contents` to the staging sibling of `file`, then replaces `file` with it.
pub(crate) fn write_replacing(file: &Path, contents: &str) -> Result<(), PatchError> {
    stage_and_replace(file, |staged| {
        fs::write(staged, contents).map_err(|e| PatchError::io("write", staged, e))
    })
}
