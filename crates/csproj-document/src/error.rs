//! Error types for csproj-document

use std::path::PathBuf;

/// Result type for csproj-document operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in csproj-document operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Manifest not found at {path}")]
    ManifestNotFound { path: PathBuf },

    #[error("Failed to parse manifest: {reason}")]
    Parse { reason: String },

    #[error(transparent)]
    Fs(#[from] csproj_fs::Error),
}

impl Error {
    pub fn parse(reason: impl Into<String>) -> Self {
        Self::Parse {
            reason: reason.into(),
        }
    }
}
