// Domain State Store - the control loop's latest-known snapshot, plus the
// periodic poll schedule derived from it.
//
// Owned exclusively by the control-loop side; the worker communicates only
// via JobResult values. An unsuccessful result leaves the last-known-good
// values in place (stale-but-valid display) rather than blanking the UI.

use tracing::debug;

use super::constants::{
    STATUS_POLL_BOOTSTRAP_INTERVAL_MS, STATUS_POLL_INTERVAL_MS,
    TRANSPORT_POLL_ACTIVE_INTERVAL_MS, TRANSPORT_POLL_DEGRADED_INTERVAL_MS,
};
use super::dispatcher::UiState;
use super::interval_elapsed;
use super::session::SessionPolicy;
use crate::domain::{JobKind, JobResult, ResultPayload, SetlistState, TransportState};

pub struct StateStore {
    transport: TransportState,
    setlist: SetlistState,
    have_setlist: bool,
    last_status_poll: Option<i64>,
    last_transport_poll: Option<i64>,
}

impl StateStore {
    pub fn new() -> Self {
        Self {
            transport: TransportState::default(),
            setlist: SetlistState::default(),
            have_setlist: false,
            last_status_poll: None,
            last_transport_poll: None,
        }
    }

    /// Fold one completed job result into the snapshot.
    pub fn apply(&mut self, result: &JobResult) {
        if !result.success {
            return;
        }
        match &result.payload {
            ResultPayload::ChangeTab { setlist, transport }
            | ResultPayload::Status { setlist, transport } => {
                if setlist.success {
                    debug!(
                        tabs = setlist.tabs.len(),
                        active_index = setlist.active_index,
                        "setlist snapshot updated"
                    );
                    self.setlist = setlist.clone();
                    self.have_setlist = true;
                }
                if transport.success {
                    self.transport = transport.clone();
                }
            }
            ResultPayload::ChangePlaystate { transport }
            | ResultPayload::Transport { transport } => {
                if transport.success {
                    self.transport = transport.clone();
                }
            }
            ResultPayload::Connect { .. } | ResultPayload::SessionToken { .. } => {}
        }
    }

    /// Periodic polls that are due this tick.
    ///
    /// A status poll (token required) refreshes setlist and transport in one
    /// batch: every second until the first snapshot lands, every ten seconds
    /// after that. The transport-only poll covers what status does not:
    /// position updates while playing or awaiting stop confirmation, and
    /// degraded no-token operation. A tick that issues a status poll never
    /// also issues a transport poll.
    pub fn due_polls(&mut self, now: i64, ui_state: UiState, session: &SessionPolicy) -> Vec<JobKind> {
        let mut due = Vec::new();
        if !session.is_connected() {
            return due;
        }

        if session.token().is_acquired() {
            let interval = if self.have_setlist {
                STATUS_POLL_INTERVAL_MS
            } else {
                STATUS_POLL_BOOTSTRAP_INTERVAL_MS
            };
            if interval_elapsed(self.last_status_poll, now, interval) {
                self.last_status_poll = Some(now);
                // Status covers transport; restart the transport clock too.
                self.last_transport_poll = Some(now);
                due.push(JobKind::GetStatus {
                    token: session.token().clone(),
                });
                return due;
            }
        }

        let transport_interval = match ui_state {
            UiState::Playing | UiState::ConfirmStop => Some(TRANSPORT_POLL_ACTIVE_INTERVAL_MS),
            _ if !session.token().is_acquired() => Some(TRANSPORT_POLL_DEGRADED_INTERVAL_MS),
            _ => None,
        };
        if let Some(interval) = transport_interval {
            if interval_elapsed(self.last_transport_poll, now, interval) {
                self.last_transport_poll = Some(now);
                due.push(JobKind::GetTransport);
            }
        }
        due
    }

    pub fn transport(&self) -> &TransportState {
        &self.transport
    }

    pub fn setlist(&self) -> &SetlistState {
        &self.setlist
    }

    pub fn have_setlist(&self) -> bool {
        self.have_setlist
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PlayState, SessionToken, TabInfo};

    fn transport_snapshot(play_state: PlayState, position: f64) -> TransportState {
        TransportState {
            play_state,
            position_seconds: position,
            repeat_enabled: false,
            position_bars_beats: "1.1.00".to_string(),
            success: true,
        }
    }

    fn status_result(success: bool, tabs: Vec<TabInfo>, active: u32) -> JobResult {
        JobResult {
            job_id: 1,
            success,
            completed_at: 0,
            payload: ResultPayload::Status {
                setlist: SetlistState {
                    tabs,
                    active_index: active,
                    success,
                },
                transport: if success {
                    transport_snapshot(PlayState::Playing, 3.5)
                } else {
                    TransportState::default()
                },
            },
        }
    }

    fn tab(name: &str, index: u32) -> TabInfo {
        TabInfo {
            length_seconds: 180.0,
            name: name.to_string(),
            index,
        }
    }

    fn connected_session(with_token: bool) -> SessionPolicy {
        let mut session = SessionPolicy::new();
        session.observe(&JobResult {
            job_id: 1,
            success: true,
            completed_at: 0,
            payload: ResultPayload::Connect {
                connected: true,
                address: "http://127.0.0.1:8080".to_string(),
            },
        });
        if with_token {
            session.observe(&JobResult {
                job_id: 2,
                success: true,
                completed_at: 0,
                payload: ResultPayload::SessionToken {
                    token: SessionToken::new("_RS1"),
                },
            });
        }
        session
    }

    #[test]
    fn unsuccessful_result_keeps_last_known_good_values() {
        let mut store = StateStore::new();
        store.apply(&status_result(true, vec![tab("Song", 0)], 0));
        assert_eq!(store.setlist().tabs.len(), 1);
        assert_eq!(store.transport().play_state, PlayState::Playing);

        store.apply(&status_result(false, vec![], 7));
        assert_eq!(store.setlist().tabs.len(), 1);
        assert_eq!(store.setlist().active_index, 0);
        assert_eq!(store.transport().play_state, PlayState::Playing);
    }

    #[test]
    fn transport_only_result_updates_transport_not_setlist() {
        let mut store = StateStore::new();
        store.apply(&status_result(true, vec![tab("Song", 0)], 0));
        store.apply(&JobResult {
            job_id: 3,
            success: true,
            completed_at: 0,
            payload: ResultPayload::Transport {
                transport: transport_snapshot(PlayState::Stopped, 0.0),
            },
        });
        assert_eq!(store.transport().play_state, PlayState::Stopped);
        assert_eq!(store.setlist().tabs.len(), 1);
    }

    #[test]
    fn status_poll_tightens_until_first_snapshot() {
        let mut store = StateStore::new();
        let session = connected_session(true);

        // Bootstrap: 1s cadence.
        assert_eq!(store.due_polls(0, UiState::Stopped, &session).len(), 1);
        assert!(store.due_polls(500, UiState::Stopped, &session).is_empty());
        assert_eq!(store.due_polls(1_000, UiState::Stopped, &session).len(), 1);

        // After the first snapshot: 10s cadence.
        store.apply(&status_result(true, vec![tab("Song", 0)], 0));
        assert!(store.due_polls(2_000, UiState::Stopped, &session).is_empty());
        assert_eq!(store.due_polls(11_000, UiState::Stopped, &session).len(), 1);
    }

    #[test]
    fn transport_poll_runs_every_second_while_playing() {
        let mut store = StateStore::new();
        let session = connected_session(true);
        store.apply(&status_result(true, vec![tab("Song", 0)], 0));

        // Status poll at t=0 resets both clocks.
        let due = store.due_polls(0, UiState::Playing, &session);
        assert!(matches!(due.as_slice(), [JobKind::GetStatus { .. }]));

        assert!(store.due_polls(500, UiState::Playing, &session).is_empty());
        let due = store.due_polls(1_000, UiState::Playing, &session);
        assert!(matches!(due.as_slice(), [JobKind::GetTransport]));
        let due = store.due_polls(2_000, UiState::ConfirmStop, &session);
        assert!(matches!(due.as_slice(), [JobKind::GetTransport]));
    }

    #[test]
    fn no_transport_poll_while_stopped_with_token() {
        let mut store = StateStore::new();
        let session = connected_session(true);
        store.apply(&status_result(true, vec![tab("Song", 0)], 0));

        store.due_polls(0, UiState::Stopped, &session); // status poll
        assert!(store.due_polls(5_000, UiState::Stopped, &session).is_empty());
    }

    #[test]
    fn degraded_mode_polls_transport_without_a_token() {
        let mut store = StateStore::new();
        let session = connected_session(false);

        let due = store.due_polls(0, UiState::Stopped, &session);
        assert!(matches!(due.as_slice(), [JobKind::GetTransport]));
        assert!(store.due_polls(5_000, UiState::Stopped, &session).is_empty());
        let due = store.due_polls(10_000, UiState::Stopped, &session);
        assert!(matches!(due.as_slice(), [JobKind::GetTransport]));
    }

    #[test]
    fn nothing_polls_while_disconnected() {
        let mut store = StateStore::new();
        let session = SessionPolicy::new();
        assert!(store.due_polls(0, UiState::Stopped, &session).is_empty());
        assert!(store.due_polls(60_000, UiState::Playing, &session).is_empty());
    }
}
