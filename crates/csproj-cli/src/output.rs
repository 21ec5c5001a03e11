//! Human and NDJSON rendering of event outcomes

use std::fmt::Display;
use std::path::Path;

use colored::Colorize;
use csproj_core::{AssemblyScope, FileEvent, SyncAction, SyncReport};
use serde_json::json;

/// Prints results either as colored text or as one JSON object per line.
#[derive(Debug, Clone, Copy)]
pub struct Printer {
    json: bool,
}

impl Printer {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// Print the outcome of a handled event.
    pub fn report(&self, event: &FileEvent, report: &SyncReport) {
        if self.json {
            println!("{}", json!({ "event": event, "report": report }));
            return;
        }

        for action in &report.actions {
            let marker = match action {
                SyncAction::Added { .. } => "+".green().bold(),
                SyncAction::Removed { .. } => "-".green().bold(),
                SyncAction::Renamed { .. } => "~".green().bold(),
                SyncAction::AlreadyPresent { .. } => "=".dimmed(),
                SyncAction::NotRegistered { .. } => "!".yellow().bold(),
            };
            let prefix = if report.dry_run { "[dry-run] " } else { "" };
            println!("{marker} {prefix}{action}");
        }
        for error in &report.errors {
            eprintln!("{} {error}", "x".red().bold());
        }
        for preview in &report.previews {
            print_diff(preview);
        }
    }

    /// Print an event that could not be applied.
    pub fn failure(&self, event: &FileEvent, error: &dyn Display) {
        if self.json {
            println!(
                "{}",
                json!({ "event": event, "error": error.to_string() })
            );
        } else {
            eprintln!("{} {event}: {error}", "x".red().bold());
        }
    }

    /// Print the resolved scope of a file.
    pub fn scope(&self, file: &Path, scope: &AssemblyScope) {
        if self.json {
            println!("{}", json!({ "file": file, "scope": scope }));
            return;
        }

        println!("{}  {}", "scope   ".dimmed(), scope.scope_name.cyan().bold());
        println!("{}  {}", "manifest".dimmed(), scope.manifest_path.display());
        match &scope.marker {
            Some(marker) => println!("{}  {}", "marker  ".dimmed(), marker.display()),
            None => println!("{}  {}", "marker  ".dimmed(), "(fallback)".dimmed()),
        }
    }

    /// Announce the start of a watch session.
    pub fn watching(&self, root: &Path) {
        if self.json {
            println!("{}", json!({ "event": "watch_started", "root": root }));
        } else {
            println!(
                "{} Watching {} (Ctrl+C to stop)",
                "=>".blue().bold(),
                root.display().to_string().cyan()
            );
        }
    }

    pub fn shutdown(&self) {
        if self.json {
            println!("{}", json!({ "event": "shutdown" }));
        } else {
            println!("{} Stopped watching", "=>".blue().bold());
        }
    }
}

fn print_diff(diff: &str) {
    for line in diff.lines() {
        if line.starts_with("+++") || line.starts_with("---") {
            println!("{}", line.bold());
        } else if line.starts_with('+') {
            println!("{}", line.green());
        } else if line.starts_with('-') {
            println!("{}", line.red());
        } else if line.starts_with("@@") {
            println!("{}", line.cyan());
        } else {
            println!("{line}");
        }
    }
}
