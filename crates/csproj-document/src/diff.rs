//! Unified diff rendering for dry-run previews

use similar::TextDiff;

/// Render a unified diff between two versions of a manifest.
///
/// Returns an empty string when the texts are identical.
pub fn unified_diff(old: &str, new: &str, label: &str) -> String {
    if old == new {
        return String::new();
    }
    let diff = TextDiff::from_lines(old, new);
    diff.unified_diff()
        .context_radius(2)
        .header(&format!("a/{label}"), &format!("b/{label}"))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_text_has_empty_diff() {
        assert_eq!(unified_diff("<Project />\n", "<Project />\n", "A.csproj"), "");
    }

    #[test]
    fn added_line_is_marked() {
        let old = "<ItemGroup>\n</ItemGroup>\n";
        let new = "<ItemGroup>\n  <Compile Include=\"A.cs\" />\n</ItemGroup>\n";

        let diff = unified_diff(old, new, "Game.csproj");
        assert!(diff.starts_with("--- a/Game.csproj\n+++ b/Game.csproj\n"));
        assert!(diff.contains("+  <Compile Include=\"A.cs\" />\n"));
    }
}
