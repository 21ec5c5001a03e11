//! Span tree over manifest markup
//!
//! The tree records byte ranges into the source rather than owning copies of
//! the markup. Only the root container, its item groups, and the direct
//! children of those groups are modelled; everything else is left to the
//! source text.

use std::ops::Range;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Error, Result};

/// Name of the element every manifest must use as its root.
pub const ROOT_ELEMENT: &str = "Project";
/// Name of the container for compile and analyzer entries.
pub const ITEM_GROUP_ELEMENT: &str = "ItemGroup";
const COMPILE_ELEMENT: &str = "Compile";
const ANALYZER_ELEMENT: &str = "Analyzer";
const INCLUDE_ATTRIBUTE: &str = "Include";
const BOM: char = '\u{feff}';

/// What an item-group child represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// `<Compile Include="..." />`, with the unescaped include path
    Compile { include: String },
    /// `<Analyzer ... />`, never edited
    Analyzer,
    /// Any other element, preserved verbatim
    Other { name: String },
}

/// A direct child element of an item group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub kind: EntryKind,
    /// Byte range of the whole element, including any children
    pub span: Range<usize>,
}

impl Entry {
    /// The include path if this is a compile entry.
    pub fn compile_path(&self) -> Option<&str> {
        match &self.kind {
            EntryKind::Compile { include } => Some(include),
            _ => None,
        }
    }
}

/// An `<ItemGroup>` directly below the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemGroup {
    /// Byte range of the whole element
    pub span: Range<usize>,
    /// Bytes between the start and end tag; `None` for `<ItemGroup />`
    pub content: Option<Range<usize>>,
    pub entries: Vec<Entry>,
}

impl ItemGroup {
    pub fn has_analyzer(&self) -> bool {
        self.entries.iter().any(|e| e.kind == EntryKind::Analyzer)
    }

    pub fn compile_paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(Entry::compile_path)
    }
}

/// The root container element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RootElement {
    pub span: Range<usize>,
    pub content: Option<Range<usize>>,
    /// Start of the first element nested in the root, used for indentation
    pub first_child: Option<usize>,
}

#[derive(Debug, Clone)]
pub(crate) struct Tree {
    pub root: RootElement,
    pub groups: Vec<ItemGroup>,
}

struct OpenGroup {
    start: usize,
    open_end: usize,
    entries: Vec<Entry>,
}

/// Parse `source` into a span tree.
///
/// Fails on malformed markup, on a missing or foreign root element, and on
/// more than one root element.
pub(crate) fn parse_tree(source: &str) -> Result<Tree> {
    // Spans index `source` with the byte order mark included
    let offset = if source.starts_with(BOM) { BOM.len_utf8() } else { 0 };
    let mut reader = Reader::from_str(&source[offset..]);

    let mut depth = 0usize;
    let mut root_open: Option<(usize, usize)> = None;
    let mut root: Option<RootElement> = None;
    let mut first_child: Option<usize> = None;
    let mut groups = Vec::new();
    let mut open_group: Option<OpenGroup> = None;
    let mut open_entry: Option<(EntryKind, usize)> = None;

    loop {
        let start = offset + reader.buffer_position() as usize;
        let event = reader.read_event().map_err(|e| {
            Error::parse(format!(
                "{e} (near byte {})",
                offset + reader.error_position() as usize
            ))
        })?;
        let end = offset + reader.buffer_position() as usize;

        match event {
            Event::Start(tag) => {
                let name = local_name(&tag)?;
                match depth {
                    0 => {
                        ensure_single_root(&root, &root_open)?;
                        ensure_root_name(&name)?;
                        root_open = Some((start, end));
                    }
                    1 => {
                        first_child.get_or_insert(start);
                        if name == ITEM_GROUP_ELEMENT {
                            open_group = Some(OpenGroup {
                                start,
                                open_end: end,
                                entries: Vec::new(),
                            });
                        }
                    }
                    2 if open_group.is_some() => {
                        open_entry = Some((entry_kind(&tag, &name)?, start));
                    }
                    _ => {}
                }
                depth += 1;
            }
            Event::Empty(tag) => {
                let name = local_name(&tag)?;
                match depth {
                    0 => {
                        ensure_single_root(&root, &root_open)?;
                        ensure_root_name(&name)?;
                        root = Some(RootElement {
                            span: start..end,
                            content: None,
                            first_child: None,
                        });
                    }
                    1 => {
                        first_child.get_or_insert(start);
                        if name == ITEM_GROUP_ELEMENT {
                            groups.push(ItemGroup {
                                span: start..end,
                                content: None,
                                entries: Vec::new(),
                            });
                        }
                    }
                    2 => {
                        if let Some(group) = open_group.as_mut() {
                            group.entries.push(Entry {
                                kind: entry_kind(&tag, &name)?,
                                span: start..end,
                            });
                        }
                    }
                    _ => {}
                }
            }
            Event::End(_) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| Error::parse("closing tag without matching start tag"))?;
                match depth {
                    0 => {
                        if let Some((root_start, open_end)) = root_open.take() {
                            root = Some(RootElement {
                                span: root_start..end,
                                content: Some(open_end..start),
                                first_child,
                            });
                        }
                    }
                    1 => {
                        if let Some(group) = open_group.take() {
                            groups.push(ItemGroup {
                                span: group.start..end,
                                content: Some(group.open_end..start),
                                entries: group.entries,
                            });
                        }
                    }
                    2 => {
                        if let (Some((kind, entry_start)), Some(group)) =
                            (open_entry.take(), open_group.as_mut())
                        {
                            group.entries.push(Entry {
                                kind,
                                span: entry_start..end,
                            });
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(text) if depth == 0 => {
                let text = String::from_utf8_lossy(&text);
                if !text
                    .trim_matches(|c: char| c.is_whitespace() || c == BOM)
                    .is_empty()
                {
                    return Err(Error::parse("text content outside the root element"));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth > 0 {
        return Err(Error::parse("unexpected end of document: unclosed element"));
    }
    let root = root.ok_or_else(|| Error::parse(format!("missing <{ROOT_ELEMENT}> root element")))?;

    Ok(Tree { root, groups })
}

fn ensure_single_root(
    root: &Option<RootElement>,
    root_open: &Option<(usize, usize)>,
) -> Result<()> {
    if root.is_some() || root_open.is_some() {
        return Err(Error::parse("document has more than one root element"));
    }
    Ok(())
}

fn ensure_root_name(name: &str) -> Result<()> {
    if name != ROOT_ELEMENT {
        return Err(Error::parse(format!(
            "expected <{ROOT_ELEMENT}> root element, found <{name}>"
        )));
    }
    Ok(())
}

fn local_name(tag: &BytesStart<'_>) -> Result<String> {
    let local = tag.local_name();
    std::str::from_utf8(local.as_ref())
        .map(str::to_string)
        .map_err(|e| Error::parse(format!("element name is not UTF-8: {e}")))
}

fn entry_kind(tag: &BytesStart<'_>, name: &str) -> Result<EntryKind> {
    Ok(match name {
        COMPILE_ELEMENT => match attribute(tag, INCLUDE_ATTRIBUTE)? {
            Some(include) => EntryKind::Compile { include },
            None => EntryKind::Other {
                name: name.to_string(),
            },
        },
        ANALYZER_ELEMENT => EntryKind::Analyzer,
        _ => EntryKind::Other {
            name: name.to_string(),
        },
    })
}

fn attribute(tag: &BytesStart<'_>, key: &str) -> Result<Option<String>> {
    for attr in tag.attributes() {
        let attr = attr.map_err(|e| Error::parse(format!("malformed attribute: {e}")))?;
        if attr.key.as_ref() == key.as_bytes() {
            let value = attr
                .unescape_value()
                .map_err(|e| Error::parse(format!("malformed {key} value: {e}")))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}
