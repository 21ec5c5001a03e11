//! Path handling: normalized paths and workspace scoping
//!
//! Manifests store source paths relative to the workspace root using a fixed
//! separator convention, independent of the host platform. The free functions
//! here compute those relative paths and walk ancestor directories without
//! touching the filesystem.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A path with forward slashes, converted back to a native path at I/O
/// boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        let normalized = path_str.replace('\\', "/");
        Self { inner: normalized }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 {
                None
            } else {
                Some(&name[idx + 1..])
            }
        })
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

/// Separator convention used for paths stored inside a manifest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathStyle {
    /// `Assets\Scripts\Player.cs`
    #[default]
    Backslash,
    /// `Assets/Scripts/Player.cs`
    Slash,
}

impl PathStyle {
    /// The separator string for this style.
    pub fn separator(&self) -> &'static str {
        match self {
            Self::Backslash => "\\",
            Self::Slash => "/",
        }
    }

    /// Rewrite every separator in `path` to this style.
    pub fn apply(&self, path: &str) -> String {
        match self {
            Self::Backslash => path.replace('/', "\\"),
            Self::Slash => path.replace('\\', "/"),
        }
    }
}

/// Compute the path of `path` relative to `root`, joined with the separator
/// of `style`.
///
/// `.` and `..` segments are resolved lexically. Returns `None` when `path`
/// does not lie strictly below `root`.
///
/// # Examples
///
/// ```
/// use csproj_fs::{PathStyle, relativize};
/// use std::path::Path;
///
/// let rel = relativize(
///     Path::new("/work/game"),
///     Path::new("/work/game/Assets/Player.cs"),
///     PathStyle::Backslash,
/// );
/// assert_eq!(rel.as_deref(), Some("Assets\\Player.cs"));
/// ```
pub fn relativize(root: &Path, path: &Path, style: PathStyle) -> Option<String> {
    let root = dunce::simplified(root);
    let path = dunce::simplified(path);
    let relative = path.strip_prefix(root).ok()?;

    let mut segments: Vec<String> = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(segment) => segments.push(segment.to_string_lossy().into_owned()),
            Component::CurDir => {}
            Component::ParentDir => {
                segments.pop()?;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    if segments.is_empty() {
        return None;
    }
    Some(segments.join(style.separator()))
}

/// Whether any directory segment of `path` is exactly `segment`.
///
/// Only the directories leading to the final component are inspected, so a
/// file that happens to be named like the segment does not count.
pub fn is_under_directory(path: &Path, segment: &str) -> bool {
    path.parent().is_some_and(|dir| {
        dir.components()
            .any(|c| matches!(c, Component::Normal(name) if name == segment))
    })
}

/// Walk `start` and its ancestors, stopping once a directory is no longer
/// inside `root`. `root` itself is the last directory yielded.
pub fn ancestors_within<'a>(start: &'a Path, root: &'a Path) -> impl Iterator<Item = &'a Path> {
    start.ancestors().take_while(move |dir| dir.starts_with(root))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relativize_resolves_dot_segments() {
        let rel = relativize(
            Path::new("/work"),
            Path::new("/work/Assets/./Old/../Player.cs"),
            PathStyle::Slash,
        );
        assert_eq!(rel.as_deref(), Some("Assets/Player.cs"));
    }

    #[test]
    fn relativize_rejects_escape_above_root() {
        let rel = relativize(
            Path::new("/work"),
            Path::new("/work/../elsewhere/Player.cs"),
            PathStyle::Slash,
        );
        assert_eq!(rel, None);
    }

    #[test]
    fn relativize_rejects_root_itself() {
        assert_eq!(
            relativize(Path::new("/work"), Path::new("/work"), PathStyle::Slash),
            None
        );
    }

    #[test]
    fn style_apply_rewrites_all_separators() {
        assert_eq!(PathStyle::Backslash.apply("a/b\\c"), "a\\b\\c");
        assert_eq!(PathStyle::Slash.apply("a/b\\c"), "a/b/c");
    }

    #[test]
    fn ancestors_stop_at_root() {
        let dirs: Vec<_> =
            ancestors_within(Path::new("/work/Assets/Scripts"), Path::new("/work")).collect();
        assert_eq!(
            dirs,
            vec![
                Path::new("/work/Assets/Scripts"),
                Path::new("/work/Assets"),
                Path::new("/work"),
            ]
        );
    }

    #[test]
    fn ancestors_outside_root_is_empty() {
        let dirs: Vec<_> = ancestors_within(Path::new("/other/dir"), Path::new("/work")).collect();
        assert!(dirs.is_empty());
    }
}
