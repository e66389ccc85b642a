// Application Layer - the command/response engine and the control-loop
// policies layered on top of it

pub mod constants;
pub mod dispatcher;
pub mod engine;
mod jobs;
pub mod runtime;
pub mod session;
pub mod store;

// Re-exports
pub use dispatcher::{Dispatcher, UiState};
pub use engine::JobEngine;
pub use runtime::{FrameUpdate, RemoteController};
pub use session::{SessionPolicy, SessionState};
pub use store::StateStore;

/// True when `interval_ms` has elapsed since `last`, or when there is no
/// previous attempt at all.
pub(crate) fn interval_elapsed(last: Option<i64>, now: i64, interval_ms: i64) -> bool {
    match last {
        Some(last) => now - last >= interval_ms,
        None => true,
    }
}
