//! Error types for csproj-core

use std::path::PathBuf;

/// Result type for csproj-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in csproj-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Assembly-definition marker file could not be read as a scope declaration
    #[error("Invalid assembly definition at {path}: {message}")]
    MarkerParse { path: PathBuf, message: String },

    /// A rename referenced an entry the manifest does not hold
    #[error("Entry {entry} not found in {manifest}")]
    EntryNotFound { entry: String, manifest: PathBuf },

    /// Event path does not lie below the workspace root
    #[error("{path} is outside the workspace root {root}")]
    OutsideWorkspace { path: PathBuf, root: PathBuf },

    /// Engine was asked to handle an event while stopped
    #[error("Sync engine is not running")]
    NotRunning,

    /// Workspace configuration could not be merged or deserialized
    #[error("Invalid configuration at {path}: {message}")]
    Config { path: PathBuf, message: String },

    // Transparent wrappers for underlying crate errors
    /// Manifest document error from csproj-document
    #[error(transparent)]
    Document(#[from] csproj_document::Error),

    /// Filesystem error from csproj-fs
    #[error(transparent)]
    Fs(#[from] csproj_fs::Error),
}

impl Error {
    pub fn marker_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::MarkerParse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether the error concerns a manifest that does not exist yet.
    pub fn is_manifest_missing(&self) -> bool {
        matches!(
            self,
            Self::Document(csproj_document::Error::ManifestNotFound { .. })
        )
    }
}
