//! One-shot add, remove and rename commands

use std::path::{Path, PathBuf};

use csproj_core::{FileEvent, SyncEngine};

use crate::context::Context;
use crate::error::{CliError, Result};
use crate::output::Printer;

pub fn run_add(ctx: &Context, files: &[PathBuf]) -> Result<()> {
    let events = files
        .iter()
        .map(|f| ctx.absolute(f).map(FileEvent::created))
        .collect::<Result<Vec<_>>>()?;
    run_events(ctx, &events)
}

pub fn run_remove(ctx: &Context, files: &[PathBuf]) -> Result<()> {
    let events = files
        .iter()
        .map(|f| ctx.absolute(f).map(FileEvent::deleted))
        .collect::<Result<Vec<_>>>()?;
    run_events(ctx, &events)
}

pub fn run_rename(ctx: &Context, old: &Path, new: &Path) -> Result<()> {
    let event = FileEvent::renamed(ctx.absolute(old)?, ctx.absolute(new)?);
    run_events(ctx, &[event])
}

fn run_events(ctx: &Context, events: &[FileEvent]) -> Result<()> {
    let engine = ctx.engine()?;
    let failed = events
        .iter()
        .filter(|event| !handle_event(&engine, &ctx.printer, event))
        .count();
    engine.stop();

    if failed > 0 {
        return Err(CliError::EventsFailed {
            failed,
            total: events.len(),
        });
    }
    Ok(())
}

/// Apply one event and print its outcome. Returns whether it fully succeeded.
pub fn handle_event(engine: &SyncEngine, printer: &Printer, event: &FileEvent) -> bool {
    match engine.handle(event) {
        Ok(report) => {
            printer.report(event, &report);
            report.success
        }
        Err(e) => {
            tracing::debug!(%event, error = %e, "event abandoned");
            printer.failure(event, &e);
            false
        }
    }
}
