//! Assembly resolution
//!
//! Maps a source file to the manifest that compiles it. The nearest
//! assembly-definition marker on the file's ancestor chain declares the
//! scope; without one the file belongs to the editor or default scope,
//! depending on whether it sits below an editor directory.
//!
//! Resolution is recomputed for every event. Files move between directories
//! and markers come and go independently of the files they govern.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use csproj_fs::{
    ConfigFormat, ConfigStore, NormalizedPath, PathStyle, ancestors_within, is_under_directory,
    relativize,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SyncConfig;
use crate::{Error, Result};

/// The manifest a source file belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyScope {
    pub manifest_path: PathBuf,
    pub scope_name: String,
    /// Marker file that declared the scope; `None` for the fallback scopes
    pub marker: Option<PathBuf>,
}

impl AssemblyScope {
    /// File name of the manifest, for messages.
    pub fn manifest_name(&self) -> String {
        manifest_label(&self.manifest_path)
    }
}

/// Display label of a manifest path.
pub(crate) fn manifest_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Fields of an assembly-definition marker the resolver reads.
#[derive(Debug, Deserialize)]
struct MarkerFile {
    name: String,
}

#[derive(Debug)]
pub struct AssemblyResolver {
    config: SyncConfig,
    store: ConfigStore,
}

impl AssemblyResolver {
    pub fn new(config: SyncConfig) -> Self {
        Self {
            config,
            store: ConfigStore::new(),
        }
    }

    /// Resolve the scope of `source`, a file below `root`.
    ///
    /// # Errors
    ///
    /// - `Error::OutsideWorkspace` if `source` does not lie below `root`
    /// - `Error::MarkerParse` if the nearest marker is unreadable or declares
    ///   no name
    pub fn resolve(&self, source: &Path, root: &Path) -> Result<AssemblyScope> {
        let relative = relativize(root, source, PathStyle::Slash).ok_or_else(|| {
            Error::OutsideWorkspace {
                path: source.to_path_buf(),
                root: root.to_path_buf(),
            }
        })?;

        let start = source.parent().unwrap_or(root);
        for dir in ancestors_within(start, root) {
            if let Some(marker) = self.find_marker(dir)? {
                let scope_name = self.read_marker(&marker)?;
                debug!(
                    source = %source.display(),
                    marker = %marker.display(),
                    scope = %scope_name,
                    "resolved by marker"
                );
                return Ok(AssemblyScope {
                    manifest_path: root.join(self.config.manifest_file_name(&scope_name)),
                    scope_name,
                    marker: Some(marker),
                });
            }
        }

        let in_editor = is_under_directory(Path::new(&relative), &self.config.editor_directory);
        let scope_name = if in_editor {
            self.config.editor_scope.clone()
        } else {
            self.config.default_scope.clone()
        };
        debug!(
            source = %source.display(),
            scope = %scope_name,
            "no marker on ancestor chain, using fallback scope"
        );
        Ok(AssemblyScope {
            manifest_path: root.join(self.config.manifest_file_name(&scope_name)),
            scope_name,
            marker: None,
        })
    }

    /// The marker file directly inside `dir`, if any.
    ///
    /// Several markers in one directory is a broken workspace; the first by
    /// name wins so the choice is at least stable.
    fn find_marker(&self, dir: &Path) -> Result<Option<PathBuf>> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(dir = %dir.display(), "directory is gone, continuing upward");
                return Ok(None);
            }
            Err(e) => return Err(csproj_fs::Error::io(dir, e).into()),
        };

        let mut markers = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| csproj_fs::Error::io(dir, e))?.path();
            if self.config.is_marker_file(&path) && path.is_file() {
                markers.push(path);
            }
        }
        markers.sort();
        Ok(markers.into_iter().next())
    }

    fn read_marker(&self, path: &Path) -> Result<String> {
        let marker: MarkerFile = self
            .store
            .load_as(&NormalizedPath::new(path), ConfigFormat::Json)
            .map_err(|e| match e {
                csproj_fs::Error::ConfigParse { message, .. } => Error::marker_parse(path, message),
                other => other.into(),
            })?;

        let name = marker.name.trim();
        if name.is_empty() {
            return Err(Error::marker_parse(path, "assembly name is empty"));
        }
        // The name becomes a file name at the workspace root
        if name.contains(['/', '\\', ':']) || name.contains("..") {
            return Err(Error::marker_parse(
                path,
                format!("assembly name `{name}` is not a plain file name"),
            ));
        }
        Ok(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn nearest_marker_wins() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "Assets/Game.asmdef", r#"{"name": "Game"}"#);
        write(root, "Assets/Tools/Tools.asmdef", r#"{"name": "Game.Tools"}"#);
        let source = write(root, "Assets/Tools/Deep/Brush.cs", "");

        let scope = AssemblyResolver::new(SyncConfig::default())
            .resolve(&source, root)
            .unwrap();
        assert_eq!(scope.scope_name, "Game.Tools");
        assert_eq!(scope.manifest_path, root.join("Game.Tools.csproj"));
        assert_eq!(scope.marker, Some(root.join("Assets/Tools/Tools.asmdef")));
    }

    #[test]
    fn first_marker_by_name_wins_within_directory() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "Assets/B.asmdef", r#"{"name": "Bravo"}"#);
        write(root, "Assets/A.asmdef", r#"{"name": "Alpha"}"#);
        let source = write(root, "Assets/Player.cs", "");

        let scope = AssemblyResolver::new(SyncConfig::default())
            .resolve(&source, root)
            .unwrap();
        assert_eq!(scope.scope_name, "Alpha");
    }

    #[test]
    fn missing_directories_are_skipped() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "Assets/Game.asmdef", r#"{"name": "Game"}"#);
        let source = root.join("Assets/Removed/Sub/Gone.cs");

        let scope = AssemblyResolver::new(SyncConfig::default())
            .resolve(&source, root)
            .unwrap();
        assert_eq!(scope.scope_name, "Game");
    }

    #[test]
    fn empty_marker_name_is_rejected() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "Assets/Bad.asmdef", r#"{"name": "  "}"#);
        let source = write(root, "Assets/Player.cs", "");

        let err = AssemblyResolver::new(SyncConfig::default())
            .resolve(&source, root)
            .unwrap_err();
        assert!(matches!(err, Error::MarkerParse { .. }), "got {err}");
    }

    #[rstest]
    #[case::parent("../../Escaped")]
    #[case::nested("Sub/Game")]
    #[case::backslash("Sub\\\\Game")]
    fn path_like_marker_name_is_rejected(#[case] name: &str) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("Game");
        write(&root, "Assets/Bad.asmdef", &format!(r#"{{"name": "{name}"}}"#));
        let source = write(&root, "Assets/Player.cs", "");

        let err = AssemblyResolver::new(SyncConfig::default())
            .resolve(&source, &root)
            .unwrap_err();
        assert!(matches!(err, Error::MarkerParse { .. }), "got {err}");
    }

    #[test]
    fn editor_segment_above_root_is_ignored() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("Editor").join("Game");
        let source = write(&root, "Assets/Player.cs", "");

        let scope = AssemblyResolver::new(SyncConfig::default())
            .resolve(&source, &root)
            .unwrap();
        assert_eq!(scope.scope_name, "Assembly-CSharp");
        assert_eq!(scope.marker, None);
    }

    #[test]
    fn outside_root_is_rejected() {
        let dir = TempDir::new().unwrap();
        let err = AssemblyResolver::new(SyncConfig::default())
            .resolve(Path::new("/elsewhere/Player.cs"), dir.path())
            .unwrap_err();
        assert!(matches!(err, Error::OutsideWorkspace { .. }));
    }
}
