//! csproj-sync CLI
//!
//! Applies source-file changes to the project manifests of a Unity-style
//! workspace, either one event at a time or by watching the tree.

mod cli;
mod commands;
mod context;
mod error;
mod logging;
mod output;
mod watcher;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use context::Context;
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose)
        .map_err(|e| CliError::user(format!("failed to initialise logging: {e}")))?;
    tracing::debug!("Verbose mode enabled");

    let ctx = Context::from_cli(&cli)?;
    execute_command(&ctx, cli.command)
}

fn execute_command(ctx: &Context, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Add { files } => commands::run_add(ctx, &files),
        Commands::Remove { files } => commands::run_remove(ctx, &files),
        Commands::Rename { old, new } => commands::run_rename(ctx, &old, &new),
        Commands::Resolve { file } => commands::run_resolve(ctx, &file),
        Commands::Watch => commands::run_watch(ctx),
    }
}
