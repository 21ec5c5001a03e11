//! Well-known names in a Unity-style workspace.

use std::path::Path;

/// File and directory names the synchronizer looks for by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WellKnown {
    /// Extension of generated project manifests
    ManifestExtension,
    /// Extension of assembly-definition marker files
    MarkerExtension,
    /// Extension of compiled source files
    SourceExtension,
    /// Directory segment that routes marker-less scripts to the editor scope
    EditorDirectory,
    /// Scope for marker-less runtime scripts
    DefaultScope,
    /// Scope for marker-less scripts below an editor directory
    EditorScope,
    /// Workspace configuration file
    ConfigFile,
    /// Git-ignored configuration overrides
    LocalConfigFile,
}

impl WellKnown {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ManifestExtension => ".csproj",
            Self::MarkerExtension => ".asmdef",
            Self::SourceExtension => ".cs",
            Self::EditorDirectory => "Editor",
            Self::DefaultScope => "Assembly-CSharp",
            Self::EditorScope => "Assembly-CSharp-Editor",
            Self::ConfigFile => "csproj-sync.toml",
            Self::LocalConfigFile => "csproj-sync.local.toml",
        }
    }
}

impl AsRef<Path> for WellKnown {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for WellKnown {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for WellKnown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
