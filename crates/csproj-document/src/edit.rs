//! Edit types for content modification.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// The kind of edit operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditKind {
    /// Insert new content.
    Insert,
    /// Replace existing content.
    Replace,
    /// Delete content.
    Delete,
}

/// A byte-level splice of document source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    /// The kind of edit.
    pub kind: EditKind,
    /// Byte range replaced in the source before the edit.
    pub span: Range<usize>,
    /// Content previously occupying `span`.
    pub old_content: String,
    /// Content written in place of `span`.
    pub new_content: String,
}

impl Edit {
    pub fn insert(at: usize, content: impl Into<String>) -> Self {
        Self {
            kind: EditKind::Insert,
            span: at..at,
            old_content: String::new(),
            new_content: content.into(),
        }
    }

    pub fn replace(span: Range<usize>, old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            kind: EditKind::Replace,
            span,
            old_content: old.into(),
            new_content: new.into(),
        }
    }

    pub fn delete(span: Range<usize>, old: impl Into<String>) -> Self {
        Self {
            kind: EditKind::Delete,
            span,
            old_content: old.into(),
            new_content: String::new(),
        }
    }

    /// Apply this edit to `source`, returning the new text.
    pub fn apply(&self, source: &str) -> String {
        let mut out = String::with_capacity(
            source.len() - (self.span.end - self.span.start) + self.new_content.len(),
        );
        out.push_str(&source[..self.span.start]);
        out.push_str(&self.new_content);
        out.push_str(&source[self.span.end..]);
        out
    }

    /// The edit that undoes this one when applied to its output.
    pub fn inverse(&self) -> Self {
        let start = self.span.start;
        let kind = match self.kind {
            EditKind::Insert => EditKind::Delete,
            EditKind::Delete => EditKind::Insert,
            EditKind::Replace => EditKind::Replace,
        };
        Self {
            kind,
            span: start..start + self.new_content.len(),
            old_content: self.new_content.clone(),
            new_content: self.old_content.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverse_of_insert_restores_source() {
        let source = "<ItemGroup></ItemGroup>";
        let edit = Edit::insert(11, "<Compile Include=\"A.cs\" />");

        let edited = edit.apply(source);
        assert_eq!(edited, "<ItemGroup><Compile Include=\"A.cs\" /></ItemGroup>");

        let inverse = edit.inverse();
        assert_eq!(inverse.kind, EditKind::Delete);
        assert_eq!(inverse.apply(&edited), source);
    }

    #[test]
    fn inverse_of_replace_swaps_contents() {
        let edit = Edit::replace(3..6, "old", "newer");
        let inverse = edit.inverse();

        assert_eq!(inverse.kind, EditKind::Replace);
        assert_eq!(inverse.span, 3..8);
        assert_eq!(inverse.old_content, "newer");
        assert_eq!(inverse.new_content, "old");
        assert_eq!(inverse.apply(&edit.apply("abcoldxyz")), "abcoldxyz");
    }
}
