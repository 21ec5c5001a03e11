//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// csproj-sync - Keep project manifests in step with the source tree
#[derive(Parser, Debug)]
#[command(name = "csproj-sync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Workspace root holding the manifests (defaults to the current directory)
    #[arg(long, global = true, env = "CSPROJ_SYNC_ROOT")]
    pub root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Show what would change without writing manifests
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Output as NDJSON for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Register source files with their manifests
    Add {
        /// Files that were created
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Unregister source files from their manifests
    Remove {
        /// Files that were deleted
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Move a registration from one path to another
    ///
    /// When the two paths belong to different assemblies the entry is removed
    /// from one manifest and added to the other.
    Rename {
        /// Previous path of the file
        old: PathBuf,
        /// New path of the file
        new: PathBuf,
    },

    /// Show which manifest a file belongs to
    Resolve {
        /// Source file to resolve
        file: PathBuf,
    },

    /// Watch the workspace and apply changes as they happen
    ///
    /// Stops on Ctrl+C.
    Watch,
}
