//! Watch command

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{RecvTimeoutError, channel};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, warn};

use super::sync::handle_event;
use crate::context::Context;
use crate::error::{CliError, Result};
use crate::watcher::{DEBOUNCE_MS, PendingEvents};

/// How long one loop iteration waits for a notification
const POLL_MS: u64 = 50;

pub fn run_watch(ctx: &Context) -> Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .map_err(|e| CliError::user(format!("failed to install Ctrl+C handler: {e}")))?;

    let engine = ctx.engine()?;
    let (tx, rx) = channel();
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            let _ = tx.send(res);
        },
        Config::default(),
    )?;
    watcher.watch(engine.root(), RecursiveMode::Recursive)?;
    ctx.printer.watching(engine.root());

    let mut pending = PendingEvents::new(
        engine.config().clone(),
        Duration::from_millis(DEBOUNCE_MS),
    );
    let mut total = 0;
    let mut failed = 0;

    loop {
        let keep_going = running.load(Ordering::SeqCst);
        if keep_going {
            match rx.recv_timeout(Duration::from_millis(POLL_MS)) {
                Ok(Ok(event)) => {
                    debug!(?event, "notification");
                    pending.push(&event);
                }
                Ok(Err(e)) => warn!(error = %e, "file watcher reported an error"),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        // Flush whatever is left once asked to stop
        if pending.is_ready() || !keep_going {
            for event in pending.drain() {
                total += 1;
                if !handle_event(&engine, &ctx.printer, &event) {
                    failed += 1;
                }
            }
        }
        if !keep_going {
            break;
        }
    }

    engine.stop();
    ctx.printer.shutdown();

    if failed > 0 {
        return Err(CliError::EventsFailed { failed, total });
    }
    Ok(())
}
