//! Outcome of handling one file event

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single effect (or deliberate non-effect) on a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SyncAction {
    Added { entry: String, manifest: String },
    /// Insert skipped, the entry was registered already
    AlreadyPresent { entry: String, manifest: String },
    Removed { entry: String, manifest: String },
    /// Removal skipped, the entry was never registered
    NotRegistered { entry: String, manifest: String },
    Renamed {
        from: String,
        to: String,
        manifest: String,
    },
}

impl SyncAction {
    /// Whether the action changed manifest content.
    pub fn is_change(&self) -> bool {
        matches!(
            self,
            Self::Added { .. } | Self::Removed { .. } | Self::Renamed { .. }
        )
    }
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added { entry, manifest } => write!(f, "Added {entry} to {manifest}"),
            Self::AlreadyPresent { entry, manifest } => {
                write!(f, "{entry} is already in {manifest}")
            }
            Self::Removed { entry, manifest } => write!(f, "Removed {entry} from {manifest}"),
            Self::NotRegistered { entry, manifest } => {
                write!(f, "{entry} was not registered in {manifest}")
            }
            Self::Renamed { from, to, manifest } => {
                write!(f, "Renamed {from} to {to} in {manifest}")
            }
        }
    }
}

/// Report from handling a file event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Whether every part of the event was applied
    pub success: bool,
    /// Whether changes were only previewed
    pub dry_run: bool,
    pub actions: Vec<SyncAction>,
    /// Failures of independent halves of a cross-manifest rename
    pub errors: Vec<String>,
    /// Unified diffs of manifests that would change (dry run only)
    pub previews: Vec<String>,
}

impl SyncReport {
    /// Create a successful, empty report
    pub fn success(dry_run: bool) -> Self {
        Self {
            success: true,
            dry_run,
            ..Self::default()
        }
    }

    /// Add an action to the report
    pub fn with_action(mut self, action: SyncAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Record a failure; the report is no longer successful
    pub fn push_error(&mut self, error: impl Into<String>) {
        self.success = false;
        self.errors.push(error.into());
    }

    /// Whether any manifest content changed (or would change)
    pub fn changed(&self) -> bool {
        self.actions.iter().any(SyncAction::is_change)
    }
}
