//! File events delivered by a watcher

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A change to a source file, carrying absolute paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FileEvent {
    Created { path: PathBuf },
    Deleted { path: PathBuf },
    Renamed { old_path: PathBuf, new_path: PathBuf },
}

impl FileEvent {
    pub fn created(path: impl Into<PathBuf>) -> Self {
        Self::Created { path: path.into() }
    }

    pub fn deleted(path: impl Into<PathBuf>) -> Self {
        Self::Deleted { path: path.into() }
    }

    pub fn renamed(old_path: impl Into<PathBuf>, new_path: impl Into<PathBuf>) -> Self {
        Self::Renamed {
            old_path: old_path.into(),
            new_path: new_path.into(),
        }
    }
}

impl fmt::Display for FileEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created { path } => write!(f, "created {}", path.display()),
            Self::Deleted { path } => write!(f, "deleted {}", path.display()),
            Self::Renamed { old_path, new_path } => {
                write!(f, "renamed {} -> {}", old_path.display(), new_path.display())
            }
        }
    }
}
