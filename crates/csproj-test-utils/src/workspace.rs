//! [`TestWorkspace`] builder for synchronization scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A manifest with one analyzer group followed by an empty compile group, so
/// new entries land in the second group.
pub const MANIFEST_WITH_ANALYZER: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Project ToolsVersion="4.0" DefaultTargets="Build" xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
  <PropertyGroup>
    <LangVersion>9.0</LangVersion>
  </PropertyGroup>
  <ItemGroup>
    <Analyzer Include="Library\PackageCache\Unity.Analyzers.dll" />
  </ItemGroup>
  <ItemGroup>
  </ItemGroup>
  <Import Project="$(MSBuildToolsPath)\Microsoft.CSharp.targets" />
</Project>
"#;

/// A temporary Unity-style workspace with helpers for setup and assertions.
///
/// # Example
///
/// ```rust,no_run
/// use csproj_test_utils::TestWorkspace;
///
/// let ws = TestWorkspace::new();
/// ws.manifest("Assembly-CSharp");
/// ws.marker("Assets/Game", "Game");
/// let player = ws.source("Assets/Game/Player.cs");
/// ws.assert_not_registered("Game", r"Assets\Game\Player.cs");
/// ```
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    /// Create an empty temporary workspace.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the workspace root.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `relative` inside the workspace; nothing is created.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Path of the manifest for `scope`.
    pub fn manifest_path(&self, scope: &str) -> PathBuf {
        self.root().join(format!("{scope}.csproj"))
    }

    /// Write the manifest for `scope` with [`MANIFEST_WITH_ANALYZER`].
    pub fn manifest(&self, scope: &str) -> PathBuf {
        self.manifest_with(scope, MANIFEST_WITH_ANALYZER)
    }

    /// Write the manifest for `scope` with the given content.
    pub fn manifest_with(&self, scope: &str, content: &str) -> PathBuf {
        let path = self.manifest_path(scope);
        fs::write(&path, content).unwrap();
        path
    }

    /// Write an assembly-definition marker declaring `name` in `dir`.
    pub fn marker(&self, dir: &str, name: &str) -> PathBuf {
        self.file(
            &format!("{dir}/{name}.asmdef"),
            &format!("{{\n    \"name\": \"{name}\",\n    \"references\": []\n}}\n"),
        )
    }

    /// Create a source file holding a placeholder class.
    pub fn source(&self, relative: &str) -> PathBuf {
        self.file(relative, "public class Placeholder {}\n")
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Current text of the manifest for `scope`.
    pub fn read_manifest(&self, scope: &str) -> String {
        let path = self.manifest_path(scope);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read manifest: {}", path.display()))
    }

    /// How many compile entries for `entry` the manifest for `scope` holds.
    pub fn entry_count(&self, scope: &str, entry: &str) -> usize {
        self.read_manifest(scope)
            .matches(&format!("<Compile Include=\"{entry}\" />"))
            .count()
    }

    /// Assert that the manifest for `scope` registers `entry` exactly once.
    ///
    /// # Panics
    /// Panics with the manifest text if the entry is missing or duplicated.
    pub fn assert_registered(&self, scope: &str, entry: &str) {
        let count = self.entry_count(scope, entry);
        assert_eq!(
            count,
            1,
            "Expected {entry} once in {scope}.csproj, found {count}.\n{}",
            self.read_manifest(scope)
        );
    }

    /// Assert that the manifest for `scope` does not register `entry`.
    ///
    /// # Panics
    /// Panics with the manifest text if the entry is present.
    pub fn assert_not_registered(&self, scope: &str, entry: &str) {
        let count = self.entry_count(scope, entry);
        assert_eq!(
            count,
            0,
            "Expected no {entry} in {scope}.csproj.\n{}",
            self.read_manifest(scope)
        );
    }
}
