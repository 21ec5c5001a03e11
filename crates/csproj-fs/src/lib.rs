//! Filesystem layer for csproj-sync
//!
//! Provides path scoping relative to a workspace root, atomic locked writes
//! for manifest persistence, and format-detecting config loading.

pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;

pub use config::{ConfigFormat, ConfigStore};
pub use constants::WellKnown;
pub use error::{Error, Result};
pub use io::RobustnessConfig;
pub use path::{NormalizedPath, PathStyle, ancestors_within, is_under_directory, relativize};
