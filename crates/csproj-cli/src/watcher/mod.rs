//! Translation of raw file-system notifications into file events
//!
//! Notifications are collected until the tree has been quiet for the
//! debounce window, then handed out as `FileEvent`s in arrival order. The two
//! halves of a rename are paired into one event where the platform reports
//! them separately.

mod pending;

pub use pending::{DEBOUNCE_MS, PendingEvents};
