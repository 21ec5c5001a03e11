//! Manifest document model for csproj-sync
//!
//! Parses a project manifest into item groups and entries while keeping the
//! original text as the source of truth. Every mutation is a byte-level
//! splice of that text, so content the engine does not model survives a
//! load/save cycle untouched.

pub mod diff;
pub mod document;
pub mod edit;
pub mod error;
pub mod format;
pub mod tree;

pub use diff::unified_diff;
pub use document::ManifestDocument;
pub use edit::{Edit, EditKind};
pub use error::{Error, Result};
pub use tree::{Entry, EntryKind, ItemGroup};
