//! `<BASE_DIR>` / `<DSET_DIR>` substitution.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use super::{stage_and_replace, PatchError};

pub const BASE_DIR_TOKEN: &str = "<BASE_DIR>";
pub const DSET_DIR_TOKEN: &str = "<DSET_DIR>";

/// Dataset directory as it is substituted for [`DSET_DIR_TOKEN`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetDir {
    /// Absolute path: every bare token is replaced with it.
    Absolute(String),
    /// Relative path, already joined onto the base directory: the quoted
    /// string holding the token is replaced with this path, quoted.
    Relative(String),
}

impl DatasetDir {
    pub fn resolve(base_path: &Path, dset_dir: &Path) -> Self {
        if dset_dir.is_absolute() {
            DatasetDir::Absolute(dset_dir.display().to_string())
        } else {
            DatasetDir::Relative(base_path.join(dset_dir).display().to_string())
        }
    }
}

/// Applies placeholder substitution to a single line.
pub fn substitute_line(line: &str, base: &str, dset: Option<&DatasetDir>) -> String {
    let out = line.replace(BASE_DIR_TOKEN, base);
    match dset {
        Some(DatasetDir::Absolute(dir)) => out.replace(DSET_DIR_TOKEN, dir),
        Some(DatasetDir::Relative(dir)) => replace_quoted_token(&out, dir),
        None => out,
    }
}

/// Replaces `"...<DSET_DIR>..."` (first quote before the token through the
/// last quote after it) with `"dir"`. Lines without that shape are unchanged.
fn replace_quoted_token(line: &str, dir: &str) -> String {
    let Some(token) = line.find(DSET_DIR_TOKEN) else {
        return line.to_string();
    };
    let Some(open) = line[..token].find('"') else {
        return line.to_string();
    };
    let after = token + DSET_DIR_TOKEN.len();
    let Some(close) = line[after..].rfind('"').map(|i| after + i) else {
        return line.to_string();
    };
    format!("{}\"{}\"{}", &line[..open], dir, &line[close + 1..])
}

/// Rewrites `config_file`, replacing [`BASE_DIR_TOKEN`] with `base_path` on
/// every line and, when `dset_dir` is given, [`DSET_DIR_TOKEN`] with the
/// dataset directory (see [`DatasetDir`]).
///
/// Returns the number of lines that changed.
pub fn prepare_config(
    base_path: &Path,
    config_file: &Path,
    dset_dir: Option<&Path>,
) -> Result<usize, PatchError> {
    let base = base_path.display().to_string();
    let dset = dset_dir.map(|d| DatasetDir::resolve(base_path, d));
    tracing::debug!(base = %base, dset = ?dset, file = %config_file.display(), "substituting placeholders");

    let mut reader = BufReader::new(
        File::open(config_file).map_err(|e| PatchError::io("read", config_file, e))?,
    );
    let changed = stage_and_replace(config_file, |staged| {
        let mut writer = BufWriter::new(
            File::create(staged).map_err(|e| PatchError::io("write", staged, e))?,
        );

        // read_line keeps terminators, so untouched lines are copied byte for byte
        let mut changed = 0;
        let mut line = String::new();
        loop {
            line.clear();
            let n = reader
                .read_line(&mut line)
                .map_err(|e| PatchError::io("read", config_file, e))?;
            if n == 0 {
                break;
            }
            let patched = substitute_line(&line, &base, dset.as_ref());
            if patched != line {
                changed += 1;
            }
            writer
                .write_all(patched.as_bytes())
                .map_err(|e| PatchError::io("write", staged, e))?;
        }
        writer
            .flush()
            .map_err(|e| PatchError::io("write", staged, e))?;
        Ok(changed)
    })?;
    tracing::info!(file = %config_file.display(), lines = changed, "placeholders substituted");
    Ok(changed)
}
