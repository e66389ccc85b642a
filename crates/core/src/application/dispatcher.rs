// Button Command Dispatcher - maps one-shot button edges plus the current
// UI state onto job submissions and UI-state transitions.

use tracing::{debug, info, warn};

use crate::domain::{ButtonEdges, JobKind, PlayAction, SessionToken, TabDirection, TransportState};
use crate::domain::PlayState;

/// UI-visible control state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiState {
    /// No connection to the DAW; buttons are inert, presentation shows
    /// "Connecting...".
    Disconnected,
    Stopped,
    Playing,
    /// Stop was requested while playing; waiting for confirm or cancel.
    ConfirmStop,
}

impl std::fmt::Display for UiState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UiState::Disconnected => write!(f, "DISCONNECTED"),
            UiState::Stopped => write!(f, "STOPPED"),
            UiState::Playing => write!(f, "PLAYING"),
            UiState::ConfirmStop => write!(f, "CONFIRM_STOP"),
        }
    }
}

pub struct Dispatcher {
    state: UiState,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            state: UiState::Disconnected,
        }
    }

    /// Handle one frame of button edges. Returns the jobs to submit.
    ///
    /// Tab changes need the session token (the tab-listing script cannot run
    /// without it); a tab press before the token exists is dropped with a
    /// warning rather than submitted.
    pub fn handle_buttons(&mut self, edges: ButtonEdges, token: &SessionToken) -> Vec<JobKind> {
        if !edges.any() {
            return Vec::new();
        }

        match self.state {
            UiState::Disconnected => Vec::new(),
            UiState::Stopped => {
                if edges.previous {
                    self.change_tab(TabDirection::Previous, token)
                } else if edges.play {
                    info!("play requested");
                    vec![JobKind::ChangePlaystate(PlayAction::Play)]
                } else if edges.next {
                    self.change_tab(TabDirection::Next, token)
                } else {
                    Vec::new()
                }
            }
            UiState::Playing => {
                if edges.play {
                    info!("stop requested, awaiting confirmation");
                    self.set_state(UiState::ConfirmStop);
                }
                // Tab buttons do nothing while playing.
                Vec::new()
            }
            UiState::ConfirmStop => {
                if edges.previous {
                    info!("stop confirmed");
                    // State flips to Stopped only once the transport result
                    // comes back with play_state == stopped.
                    vec![JobKind::ChangePlaystate(PlayAction::Stop)]
                } else if edges.play || edges.next {
                    info!("stop cancelled");
                    self.set_state(UiState::Playing);
                    Vec::new()
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Derive Stopped/Playing from a periodic transport snapshot.
    ///
    /// ConfirmStop is sticky against polls (only button edges or an explicit
    /// playstate-change result leave it) and Paused / Recording values
    /// change nothing - no surprises for the user during those states.
    pub fn apply_transport(&mut self, transport: &TransportState) {
        if self.state == UiState::ConfirmStop {
            return;
        }
        self.derive_from_play_state(transport);
    }

    /// Derive the UI state from the transport snapshot a ChangePlaystate
    /// job returned. Unlike polls, this is the answer to the user's own
    /// command, so it leaves ConfirmStop: a confirmed stop flips to Stopped
    /// once the DAW reports play_state == stopped.
    pub fn apply_playstate_change(&mut self, transport: &TransportState) {
        self.derive_from_play_state(transport);
    }

    fn derive_from_play_state(&mut self, transport: &TransportState) {
        if !transport.success || self.state == UiState::Disconnected {
            return;
        }
        match transport.play_state {
            PlayState::Stopped => self.set_state(UiState::Stopped),
            PlayState::Playing => self.set_state(UiState::Playing),
            _ => {}
        }
    }

    /// Track connectivity: losing the connection overrides everything,
    /// regaining it lands in Stopped until a transport snapshot says
    /// otherwise.
    pub fn set_connected(&mut self, connected: bool) {
        if !connected {
            if self.state != UiState::Disconnected {
                self.set_state(UiState::Disconnected);
            }
        } else if self.state == UiState::Disconnected {
            self.set_state(UiState::Stopped);
        }
    }

    pub fn ui_state(&self) -> UiState {
        self.state
    }

    fn set_state(&mut self, state: UiState) {
        if self.state != state {
            debug!(from = %self.state, to = %state, "ui state changed");
            self.state = state;
        }
    }

    fn change_tab(&self, direction: TabDirection, token: &SessionToken) -> Vec<JobKind> {
        if !token.is_acquired() {
            warn!("tab change requested before session token acquired");
            return Vec::new();
        }
        info!(?direction, "tab change requested");
        vec![JobKind::ChangeTab {
            direction,
            token: token.clone(),
        }]
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
