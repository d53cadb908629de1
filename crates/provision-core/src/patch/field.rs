//! Get/set of single fields in a config file on disk.

use std::fs;
use std::path::Path;

use super::{write_replacing, PatchError};
use crate::prototxt::{ConfigDocument, FieldPath};

fn load(config_file: &Path) -> Result<ConfigDocument, PatchError> {
    let text =
        fs::read_to_string(config_file).map_err(|e| PatchError::io("read", config_file, e))?;
    ConfigDocument::parse(text)
}

/// Returns the value text of `field` (a dotted path), quotes included.
pub fn get_config_field(config_file: &Path, field: &str) -> Result<String, PatchError> {
    let path: FieldPath = field.parse()?;
    let doc = load(config_file)?;
    doc.get(&path).map(str::to_string)
}

/// Sets `field` to `new_value`, keeping the existing quoting convention, and
/// rewrites the file.
pub fn set_config_field(
    config_file: &Path,
    field: &str,
    new_value: &str,
) -> Result<(), PatchError> {
    let path: FieldPath = field.parse()?;
    let mut doc = load(config_file)?;
    doc.set(&path, new_value)?;
    write_replacing(config_file, doc.text())?;
    tracing::info!(
        field = %path,
        file = %config_file.display(),
        "config field updated"
    );
    Ok(())
}

/// Every leaf field as `(dotted path, value)`, in document order.
pub fn list_config_fields(config_file: &Path) -> Result<Vec<(String, String)>, PatchError> {
    let doc = load(config_file)?;
    Ok(doc
        .fields()
        .iter()
        .map(|f| (f.dotted_path(), doc.value_of(f).to_string()))
        .collect())
}
