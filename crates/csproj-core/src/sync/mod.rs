//! SyncEngine for applying file events to manifests
//!
//! This module provides:
//! - **engine**: event dispatch and the load-mutate-save cycle
//! - **lock**: per-manifest serialization of those cycles
//! - **report**: what each event did to which manifest

mod engine;
mod lock;
mod report;

pub use engine::{SyncEngine, SyncOptions};
pub use lock::ManifestLocks;
pub use report::{SyncAction, SyncReport};
