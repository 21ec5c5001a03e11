//! Command implementations

mod resolve;
mod sync;
mod watch;

pub use resolve::run_resolve;
pub use sync::{handle_event, run_add, run_remove, run_rename};
pub use watch::run_watch;
