//! Manifest synchronization engine for csproj-sync
//!
//! This crate ties the lower layers together:
//!
//! - **Assembly resolution**: which manifest owns a source file, decided by the
//!   nearest assembly-definition marker or the editor/default fallback
//! - **SyncEngine**: applies create, delete and rename events to manifests,
//!   one load-mutate-save cycle per manifest at a time
//! - **Configuration**: naming conventions, layered from TOML files at the
//!   workspace root
//!
//! # Architecture
//!
//! ```text
//!         csproj-cli
//!             |
//!        csproj-core
//!          |      |
//! csproj-document |
//!          |      |
//!         csproj-fs
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod resolver;
pub mod sync;

pub use config::SyncConfig;
pub use error::{Error, Result};
pub use event::FileEvent;
pub use resolver::{AssemblyResolver, AssemblyScope};
pub use sync::{ManifestLocks, SyncAction, SyncEngine, SyncOptions, SyncReport};
