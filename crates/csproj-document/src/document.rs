//! The manifest document

use std::ops::Range;
use std::path::Path;

use csproj_fs::{NormalizedPath, io};
use quick_xml::escape::escape;
use tracing::debug;

use crate::diff::unified_diff;
use crate::edit::Edit;
use crate::error::{Error, Result};
use crate::format::{Layout, line_indent};
use crate::tree::{ITEM_GROUP_ELEMENT, ItemGroup, ROOT_ELEMENT, Tree, parse_tree};

/// An editable project manifest.
///
/// The document owns the manifest text and a span tree over it. Queries read
/// the tree; mutations splice the text and re-parse, so bytes outside an edit
/// are never rewritten.
#[derive(Debug, Clone)]
pub struct ManifestDocument {
    /// Text as loaded or parsed (for is_modified tracking)
    original_source: String,
    /// Current text
    source: String,
    tree: Tree,
    layout: Layout,
}

impl ManifestDocument {
    /// Parse manifest text.
    ///
    /// # Errors
    ///
    /// Returns `Error::Parse` if the markup is malformed or its root element
    /// is not a `<Project>`.
    pub fn parse(source: &str) -> Result<Self> {
        let tree = parse_tree(source)?;
        let layout = Layout::detect(source, &tree);
        Ok(Self {
            original_source: source.to_string(),
            source: source.to_string(),
            tree,
            layout,
        })
    }

    /// Read and parse the manifest at `path`.
    ///
    /// # Errors
    ///
    /// Returns `Error::ManifestNotFound` if no file exists at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match io::read_text(&NormalizedPath::new(path)) {
            Ok(content) => content,
            Err(e) if e.is_not_found() => {
                return Err(Error::ManifestNotFound {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        Self::parse(&content)
    }

    /// Write the current text to `path` atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        io::write_text(&NormalizedPath::new(path), &self.source)?;
        Ok(())
    }

    /// The full document text, including every node the engine does not
    /// model.
    pub fn serialize(&self) -> &str {
        &self.source
    }

    pub fn item_groups(&self) -> &[ItemGroup] {
        &self.tree.groups
    }

    /// All compile entry paths in document order.
    pub fn compile_entries(&self) -> Vec<&str> {
        self.tree
            .groups
            .iter()
            .flat_map(ItemGroup::compile_paths)
            .collect()
    }

    /// Whether any item group holds a compile entry with exactly this path.
    pub fn contains(&self, relative_path: &str) -> bool {
        self.tree
            .groups
            .iter()
            .flat_map(ItemGroup::compile_paths)
            .any(|p| p == relative_path)
    }

    /// Whether the text differs from what was loaded.
    pub fn is_modified(&self) -> bool {
        self.source != self.original_source
    }

    /// Unified diff between the loaded text and the current text.
    pub fn diff_preview(&self, label: &str) -> String {
        unified_diff(&self.original_source, &self.source, label)
    }

    /// Register a compile entry.
    ///
    /// Returns `None` without touching the text if the path is already
    /// registered. Otherwise the entry is appended to the group following the
    /// last group that holds an analyzer; when there is no such group a new
    /// item group is appended after the existing ones.
    pub fn insert_compile(&mut self, relative_path: &str) -> Result<Option<Edit>> {
        if self.contains(relative_path) {
            debug!(entry = relative_path, "compile entry already present");
            return Ok(None);
        }

        let element = format!("<Compile Include=\"{}\" />", escape(relative_path));
        let edit = match self.anchor_group() {
            Some(index) => self.append_to_group(index, &element),
            None => self.append_group(&element),
        };
        self.apply(&edit)?;
        Ok(Some(edit))
    }

    /// Remove the first compile entry with exactly this path.
    ///
    /// Returns `None` if no entry matched. When the entry sits on its own
    /// line, the whole line goes with it.
    pub fn remove_compile(&mut self, relative_path: &str) -> Result<Option<Edit>> {
        let Some(span) = self
            .tree
            .groups
            .iter()
            .flat_map(|g| g.entries.iter())
            .find(|e| e.compile_path() == Some(relative_path))
            .map(|e| e.span.clone())
        else {
            debug!(entry = relative_path, "no compile entry to remove");
            return Ok(None);
        };

        let range = line_removal_range(&self.source, span);
        let edit = Edit::delete(range.clone(), &self.source[range]);
        self.apply(&edit)?;
        Ok(Some(edit))
    }

    /// Index of the group new compile entries go into, if it already exists.
    fn anchor_group(&self) -> Option<usize> {
        let groups = &self.tree.groups;
        let last_analyzer = groups.iter().rposition(ItemGroup::has_analyzer)?;
        let anchor = last_analyzer + 1;
        (anchor < groups.len()).then_some(anchor)
    }

    fn append_to_group(&self, index: usize, element: &str) -> Edit {
        let group = &self.tree.groups[index];
        let nl = self.layout.newline;
        let group_indent = line_indent(&self.source, group.span.start).unwrap_or("");
        let entry_indent = group
            .entries
            .last()
            .and_then(|e| line_indent(&self.source, e.span.start))
            .map(str::to_string)
            .unwrap_or_else(|| format!("{group_indent}{}", self.layout.indent));

        match &group.content {
            Some(content) => {
                let (pos, needs_break) = end_of_content(&self.source, content);
                let mut text = format!("{nl}{entry_indent}{element}");
                if needs_break {
                    text.push_str(nl);
                    text.push_str(group_indent);
                }
                Edit::insert(pos, text)
            }
            None => {
                let old = &self.source[group.span.clone()];
                let open = open_tag_of_empty(old);
                let new = format!(
                    "{open}>{nl}{entry_indent}{element}{nl}{group_indent}</{}>",
                    tag_name(open)
                );
                Edit::replace(group.span.clone(), old, new)
            }
        }
    }

    fn append_group(&self, element: &str) -> Edit {
        let nl = self.layout.newline;
        let unit = &self.layout.indent;

        if let Some(last) = self.tree.groups.last() {
            let group_indent = line_indent(&self.source, last.span.start)
                .map(str::to_string)
                .unwrap_or_else(|| unit.clone());
            let text = format!(
                "{nl}{group_indent}<{ITEM_GROUP_ELEMENT}>{nl}{group_indent}{unit}{element}{nl}{group_indent}</{ITEM_GROUP_ELEMENT}>"
            );
            return Edit::insert(last.span.end, text);
        }

        let root = &self.tree.root;
        let root_indent = line_indent(&self.source, root.span.start).unwrap_or("");
        let group_indent = format!("{root_indent}{unit}");
        let group = format!(
            "<{ITEM_GROUP_ELEMENT}>{nl}{group_indent}{unit}{element}{nl}{group_indent}</{ITEM_GROUP_ELEMENT}>"
        );

        match &root.content {
            Some(content) => {
                let (pos, needs_break) = end_of_content(&self.source, content);
                let mut text = format!("{nl}{group_indent}{group}");
                if needs_break {
                    text.push_str(nl);
                    text.push_str(root_indent);
                }
                Edit::insert(pos, text)
            }
            None => {
                let old = &self.source[root.span.clone()];
                let open = open_tag_of_empty(old);
                let new = format!("{open}>{nl}{group_indent}{group}{nl}{root_indent}</{ROOT_ELEMENT}>");
                Edit::replace(root.span.clone(), old, new)
            }
        }
    }

    /// Apply `edit` and re-parse; the previous state is kept if the result
    /// does not parse.
    fn apply(&mut self, edit: &Edit) -> Result<()> {
        let source = edit.apply(&self.source);
        let tree = parse_tree(&source)?;
        self.layout = Layout::detect(&source, &tree);
        self.tree = tree;
        self.source = source;
        Ok(())
    }
}

/// Position just past the last non-whitespace byte of `content`, and whether
/// the trailing whitespace lacks a line break (so the closing tag would end
/// up on the same line as inserted markup).
fn end_of_content(source: &str, content: &Range<usize>) -> (usize, bool) {
    let inner = &source[content.clone()];
    let trimmed = inner.trim_end();
    let trailing = &inner[trimmed.len()..];
    (content.start + trimmed.len(), !trailing.contains('\n'))
}

/// Widen an element span to cover the whitespace around it that would be
/// left dangling once the element is gone.
///
/// An element alone on its line takes its indentation and the preceding line
/// break with it. When other markup follows on the same line, only the element
/// and the blanks after it go, so the rest stays on its own line.
fn line_removal_range(source: &str, span: Range<usize>) -> Range<usize> {
    let rest = &source[span.end..];
    let end = span.end + (rest.len() - rest.trim_start_matches([' ', '\t']).len());
    let after = &source[end..];
    let ends_line = after.is_empty() || after.starts_with('\n') || after.starts_with("\r\n");
    if !ends_line {
        return span.start..end;
    }

    let before = &source[..span.start];
    let ws_start = before.trim_end_matches([' ', '\t']).len();
    let lead = &source[..ws_start];
    if lead.ends_with("\r\n") {
        ws_start - 2..span.end
    } else if lead.ends_with('\n') {
        ws_start - 1..span.end
    } else {
        span.start..span.end
    }
}

/// `<Name attr="x" />` -> `<Name attr="x"`
fn open_tag_of_empty(element: &str) -> &str {
    element.trim_end().trim_end_matches("/>").trim_end()
}

/// `<ns:Name attr="x"` -> `ns:Name`
fn tag_name(open: &str) -> &str {
    let name = open.trim_start_matches('<');
    name.split(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .next()
        .unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn removal_range_takes_whole_line() {
        let source = "<a>\n    <b />\n</a>";
        let start = source.find("<b").unwrap();
        let range = line_removal_range(source, start..start + 5);
        assert_eq!(&source[range], "\n    <b />");
    }

    #[test]
    fn removal_range_keeps_inline_neighbours() {
        let source = "<a><c /><b /></a>";
        let start = source.find("<b").unwrap();
        let range = line_removal_range(source, start..start + 5);
        assert_eq!(&source[range], "<b />");
    }

    #[test]
    fn removal_range_handles_crlf() {
        let source = "<a>\r\n  <b />\r\n</a>";
        let start = source.find("<b").unwrap();
        let range = line_removal_range(source, start..start + 5);
        assert_eq!(&source[range], "\r\n  <b />");
    }

    #[test]
    fn removal_range_undoes_insert_after_trailing_blanks() {
        let source = "<a>\n  <c />\n  <b />  \n</a>";
        let start = source.find("<b").unwrap();
        let range = line_removal_range(source, start..start + 5);
        assert_eq!(&source[range], "\n  <b />");
    }

    #[test]
    fn removal_range_leaves_trailing_comment_on_its_line() {
        let source = "<a>\n    <b /> <!-- keep -->\n</a>";
        let start = source.find("<b").unwrap();
        let range = line_removal_range(source, start..start + 5);
        assert_eq!(&source[range], "<b /> ");
    }

    #[test]
    fn tag_name_keeps_prefix() {
        assert_eq!(tag_name("<msb:ItemGroup Condition=\"x\""), "msb:ItemGroup");
        assert_eq!(tag_name("<ItemGroup"), "ItemGroup");
    }

    #[test]
    fn open_tag_of_empty_strips_self_close() {
        assert_eq!(
            open_tag_of_empty("<ItemGroup Condition=\"'$(X)'=='1'\" />"),
            "<ItemGroup Condition=\"'$(X)'=='1'\""
        );
    }
}
