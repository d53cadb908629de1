//! Errors raised while reading, parsing or rewriting a prototxt config.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    #[error("{action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("invalid field path '{0}'")]
    InvalidPath(String),

    #[error("value for field '{field}' cannot be stored on a single line")]
    InvalidValue { field: String },

    #[error("Could not locate field {field} in config file")]
    FieldNotFound { field: String },
}

impl PatchError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PatchError::Io {
            action,
            path: path.into(),
            source,
        }
    }
}
