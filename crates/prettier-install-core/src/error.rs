// Typed failures surfaced by the patch engines

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type PatchResult<T> = std::result::Result<T, PatchError>;

#[derive(Debug, Error)]
pub enum PatchError {
    /// File is absent where the caller requires it to exist
    #[error("{} not found", path.display())]
    NotFound { path: PathBuf },

    #[error("permission denied: {}", path.display())]
    Permission { path: PathBuf },

    /// Existing JSON or YAML content could not be decoded
    #[error("failed to parse {}: {message}", path.display())]
    MalformedDocument { path: PathBuf, message: String },

    #[error("ESLint configuration in file {file} is not supported")]
    UnsupportedConfigFormat { file: String },

    /// A location holds a shape that cannot be coerced to the required container
    #[error("expected {expected} at `{path}`, found {found}")]
    SchemaMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    /// `.eslintrc.js` source could not be parsed
    #[error("syntax error at {line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PatchError {
    /// Classify an I/O error against the file it happened on
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound => PatchError::NotFound { path },
            io::ErrorKind::PermissionDenied => PatchError::Permission { path },
            _ => PatchError::Io { path, source: err },
        }
    }

    pub fn malformed(path: &Path, message: impl Into<String>) -> Self {
        PatchError::MalformedDocument {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// Attach a file path to a malformed-document error raised without one
    pub(crate) fn at_path(self, path: &Path) -> Self {
        match self {
            PatchError::MalformedDocument { message, .. } => PatchError::MalformedDocument {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        }
    }
}
