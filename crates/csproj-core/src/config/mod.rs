//! Workspace configuration
//!
//! `SyncConfig` names the files the synchronizer looks for and the scopes it
//! falls back to. It is resolved from built-in defaults overlaid with the
//! optional `csproj-sync.toml` and `csproj-sync.local.toml` at the workspace
//! root.

mod settings;

pub use settings::{SyncConfig, merge_toml};
