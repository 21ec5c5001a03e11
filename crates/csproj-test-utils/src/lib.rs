//! Shared test utilities for the csproj-sync workspace.
//!
//! This crate provides standardised fixtures so crate test suites do not each
//! hand-roll temp workspaces. It is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`workspace`]: [`TestWorkspace`] builder for manifests, markers and sources

pub mod workspace;

pub use workspace::{MANIFEST_WITH_ANALYZER, TestWorkspace};
