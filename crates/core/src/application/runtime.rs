// Control-loop glue - one tick of the remote: sample buttons, schedule
// polls, drive the session policy, drain results back into domain state.
//
// Single-writer invariant: everything here is owned by the control-loop
// task; the worker only ever hands over JobResult values.

use tracing::trace;

use super::constants::{DEBUG_SNAPSHOT_INTERVAL_MS, STATUS_ICON_REFRESH_INTERVAL_MS};
use super::dispatcher::{Dispatcher, UiState};
use super::engine::JobEngine;
use super::interval_elapsed;
use super::session::{SessionPolicy, SessionState};
use super::store::StateStore;
use crate::domain::{ButtonEdges, JobKind, ResultPayload, SetlistState, TransportState};

/// Per-frame signals for the rendering boundary.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameUpdate {
    /// True once every 30s: time to refresh battery/WiFi status icons.
    pub refresh_status_icons: bool,
}

/// Owns the engine plus every control-loop policy and exposes the read
/// accessors the (external) rendering layer consumes.
pub struct RemoteController {
    engine: JobEngine,
    session: SessionPolicy,
    store: StateStore,
    dispatcher: Dispatcher,
    last_debug_snapshot: Option<i64>,
    last_status_icon_refresh: Option<i64>,
}

impl RemoteController {
    pub fn new(engine: JobEngine) -> Self {
        Self {
            engine,
            session: SessionPolicy::new(),
            store: StateStore::new(),
            dispatcher: Dispatcher::new(),
            last_debug_snapshot: None,
            last_status_icon_refresh: None,
        }
    }

    /// Run one control-loop tick. Never blocks on network I/O.
    pub fn tick(&mut self, now: i64, buttons: ButtonEdges) -> FrameUpdate {
        // Button edges first, so a press in this frame wins the queue slot.
        let button_jobs = self.dispatcher.handle_buttons(buttons, self.session.token());
        for kind in button_jobs {
            self.engine.submit(kind);
        }

        for kind in self
            .store
            .due_polls(now, self.dispatcher.ui_state(), &self.session)
        {
            self.engine.submit(kind);
        }

        for kind in self.session.check_and_retry(now) {
            self.engine.submit(kind);
        }

        for result in self.engine.drain_results() {
            self.session.observe(&result);
            self.store.apply(&result);
            if result.success {
                match &result.payload {
                    ResultPayload::ChangePlaystate { transport } => {
                        self.dispatcher.apply_playstate_change(transport);
                    }
                    other => {
                        if let Some(transport) = other.transport_state() {
                            self.dispatcher.apply_transport(transport);
                        }
                    }
                }
            }
        }
        self.dispatcher.set_connected(self.session.is_connected());

        if interval_elapsed(self.last_debug_snapshot, now, DEBUG_SNAPSHOT_INTERVAL_MS) {
            self.last_debug_snapshot = Some(now);
            trace!(
                ui_state = %self.dispatcher.ui_state(),
                session_state = ?self.session.state(),
                tabs = self.store.setlist().tabs.len(),
                active_index = self.store.setlist().active_index,
                play_state = %self.store.transport().play_state,
                "control loop snapshot"
            );
        }

        let refresh_status_icons = interval_elapsed(
            self.last_status_icon_refresh,
            now,
            STATUS_ICON_REFRESH_INTERVAL_MS,
        );
        if refresh_status_icons {
            self.last_status_icon_refresh = Some(now);
        }
        FrameUpdate {
            refresh_status_icons,
        }
    }

    // --- Read accessors for the rendering boundary ---

    pub fn transport(&self) -> &TransportState {
        self.store.transport()
    }

    pub fn setlist(&self) -> &SetlistState {
        self.store.setlist()
    }

    pub fn ui_state(&self) -> UiState {
        self.dispatcher.ui_state()
    }

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_connected()
    }

    pub fn dropped_results(&self) -> u64 {
        self.engine.dropped_results()
    }

    /// Direct submission hook for callers outside the dispatcher (tests,
    /// future surfaces). Same sentinel semantics as the engine.
    pub fn submit(&self, kind: JobKind) -> crate::domain::JobId {
        self.engine.submit(kind)
    }

    /// Stop the engine. Idempotent; safe on any teardown path.
    pub async fn shutdown(&mut self) {
        self.engine.shutdown().await;
    }
}
