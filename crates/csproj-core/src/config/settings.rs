//! Sync settings with layered TOML overrides

use std::path::Path;

use csproj_fs::{ConfigStore, NormalizedPath, PathStyle, WellKnown};
use serde::{Deserialize, Serialize};
use toml::Value;
use tracing::debug;

use crate::{Error, Result};

/// Naming conventions and fallbacks of one workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Extension of manifest files, including the dot
    pub manifest_extension: String,
    /// Extension of assembly-definition marker files
    pub marker_extension: String,
    /// Extension of source files the watcher forwards
    pub source_extension: String,
    /// Directory segment that routes marker-less files to `editor_scope`
    pub editor_directory: String,
    pub default_scope: String,
    pub editor_scope: String,
    /// Separator used for compile entry paths
    pub path_style: PathStyle,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            manifest_extension: WellKnown::ManifestExtension.to_string(),
            marker_extension: WellKnown::MarkerExtension.to_string(),
            source_extension: WellKnown::SourceExtension.to_string(),
            editor_directory: WellKnown::EditorDirectory.to_string(),
            default_scope: WellKnown::DefaultScope.to_string(),
            editor_scope: WellKnown::EditorScope.to_string(),
            path_style: PathStyle::default(),
        }
    }
}

impl SyncConfig {
    /// Resolve the configuration for the workspace at `root`.
    ///
    /// Layers, later ones overriding earlier ones field by field:
    /// 1. Built-in defaults
    /// 2. `<root>/csproj-sync.toml`
    /// 3. `<root>/csproj-sync.local.toml`
    ///
    /// Missing layers are skipped. Invalid TOML in any layer is an error.
    pub fn load(root: &Path) -> Result<Self> {
        let store = ConfigStore::new();
        let mut merged = Value::Table(Default::default());
        let mut last_path = None;

        for name in [WellKnown::ConfigFile, WellKnown::LocalConfigFile] {
            let path = root.join(name);
            if !path.is_file() {
                debug!(?path, "no config layer, skipping");
                continue;
            }
            debug!(?path, "loading config layer");
            let layer: Value = store.load(&NormalizedPath::new(&path))?;
            merge_toml(&mut merged, &layer);
            last_path = Some(path);
        }

        let Some(path) = last_path else {
            return Ok(Self::default());
        };
        merged.try_into().map_err(|e: toml::de::Error| Error::Config {
            path,
            message: e.to_string(),
        })
    }

    /// Whether `path` names a file this workspace compiles.
    pub fn is_source_file(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| {
                n.len() > self.source_extension.len() && n.ends_with(&self.source_extension)
            })
    }

    /// Whether `path` names an assembly-definition marker.
    pub fn is_marker_file(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(&self.marker_extension))
    }

    /// File name of the manifest for `scope`.
    pub fn manifest_file_name(&self, scope: &str) -> String {
        format!("{scope}{}", self.manifest_extension)
    }
}

/// Deep merge two TOML values.
///
/// Tables merge recursively with `other` taking precedence; any other value in
/// `other` replaces the one in `base`.
pub fn merge_toml(base: &mut Value, other: &Value) {
    match (base, other) {
        (Value::Table(base_table), Value::Table(other_table)) => {
            for (key, other_val) in other_table {
                if let Some(base_val) = base_table.get_mut(key) {
                    merge_toml(base_val, other_val);
                } else {
                    base_table.insert(key.clone(), other_val.clone());
                }
            }
        }
        (base, other) => {
            *base = other.clone();
        }
    }
}
