//! Formatting conventions inferred from an existing manifest

use crate::tree::Tree;

const DEFAULT_INDENT: &str = "  ";

/// Line ending and indentation unit used when generating new markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub newline: &'static str,
    /// One level of indentation
    pub indent: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            newline: "\n",
            indent: DEFAULT_INDENT.to_string(),
        }
    }
}

impl Layout {
    /// Infer the layout of `source`.
    ///
    /// The indentation unit is the difference between the root's indentation
    /// and that of its first child line. Documents that keep everything on one
    /// line fall back to two spaces.
    pub(crate) fn detect(source: &str, tree: &Tree) -> Self {
        let newline = if source.contains("\r\n") { "\r\n" } else { "\n" };

        let root_indent = line_indent(source, tree.root.span.start).unwrap_or("");
        let indent = tree
            .root
            .first_child
            .and_then(|pos| line_indent(source, pos))
            .and_then(|child| child.strip_prefix(root_indent))
            .filter(|unit| !unit.is_empty())
            .unwrap_or(DEFAULT_INDENT)
            .to_string();

        Self { newline, indent }
    }
}

/// The whitespace between the start of the line containing `pos` and `pos`,
/// or `None` if anything other than spaces and tabs precedes `pos` on that
/// line.
pub(crate) fn line_indent(source: &str, pos: usize) -> Option<&str> {
    let line_start = source[..pos].rfind('\n').map_or(0, |i| i + 1);
    let prefix = &source[line_start..pos];
    prefix
        .chars()
        .all(|c| c == ' ' || c == '\t')
        .then_some(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::parse_tree;

    fn layout_of(source: &str) -> Layout {
        let tree = parse_tree(source).unwrap();
        Layout::detect(source, &tree)
    }

    #[test]
    fn detects_four_space_indent() {
        let layout = layout_of("<Project>\n    <ItemGroup />\n</Project>\n");
        assert_eq!(layout.indent, "    ");
        assert_eq!(layout.newline, "\n");
    }

    #[test]
    fn detects_tabs_and_crlf() {
        let layout = layout_of("<Project>\r\n\t<PropertyGroup />\r\n</Project>\r\n");
        assert_eq!(layout.indent, "\t");
        assert_eq!(layout.newline, "\r\n");
    }

    #[test]
    fn single_line_document_uses_default() {
        assert_eq!(layout_of("<Project><ItemGroup /></Project>"), Layout::default());
    }

    #[test]
    fn line_indent_rejects_inline_positions() {
        let source = "  <a><b/>";
        assert_eq!(line_indent(source, 2), Some("  "));
        assert_eq!(line_indent(source, 5), None);
    }
}
