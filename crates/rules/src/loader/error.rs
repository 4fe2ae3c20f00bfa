//! Error types for module resolution and loading.

use std::path::PathBuf;

use crate::module::PackageKind;

/// Errors that can occur while resolving, loading or registering modules.
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// No package matched any candidate name.
    #[error("Failed to load textlint's {kind} module: \"{name}\" is not found (searched: {})", searched.join(", "))]
    NotFound {
        kind: PackageKind,
        name: String,
        searched: Vec<String>,
    },

    /// Filesystem I/O error.
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Manifest parse/deserialization error.
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The module was found but its contents make no sense (e.g. empty term list).
    #[error("Invalid module \"{package}\": {reason}")]
    InvalidModule { package: String, reason: String },

    /// The module does not export what the reference asked for
    /// (a preset without `rules`, a bundle referenced as a single rule).
    #[error("Module \"{package}\" does not export {expected}")]
    UnexpectedExport {
        package: String,
        expected: &'static str,
    },

    /// Filesystem watcher error.
    #[error("Notify watcher error: {0}")]
    Notify(#[from] notify::Error),

    /// A listener refused an event.
    #[error("Rejected: {0}")]
    Rejected(String),
}

impl LoaderError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoaderError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for "the package does not exist" as opposed to "it exists but is broken".
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoaderError::NotFound { .. })
    }
}

/// Result alias for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;
