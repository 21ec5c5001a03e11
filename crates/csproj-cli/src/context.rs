//! Per-invocation state shared by commands

use std::path::{Path, PathBuf};

use csproj_core::{SyncConfig, SyncEngine, SyncOptions};

use crate::cli::Cli;
use crate::error::{CliError, Result};
use crate::output::Printer;

pub struct Context {
    pub root: PathBuf,
    pub dry_run: bool,
    pub printer: Printer,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let root = match &cli.root {
            Some(root) => std::path::absolute(root)?,
            None => std::env::current_dir()?,
        };
        if !root.is_dir() {
            return Err(CliError::user(format!(
                "workspace root {} is not a directory",
                root.display()
            )));
        }

        Ok(Self {
            root,
            dry_run: cli.dry_run,
            printer: Printer::new(cli.json),
        })
    }

    pub fn config(&self) -> Result<SyncConfig> {
        Ok(SyncConfig::load(&self.root)?)
    }

    /// A started engine for the workspace.
    pub fn engine(&self) -> Result<SyncEngine> {
        let options = SyncOptions {
            dry_run: self.dry_run,
        };
        let engine = SyncEngine::new(&self.root, self.config()?, options);
        engine.start();
        Ok(engine)
    }

    /// Make a command-line path absolute against the current directory.
    pub fn absolute(&self, path: &Path) -> Result<PathBuf> {
        Ok(std::path::absolute(path)?)
    }
}
