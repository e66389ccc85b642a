// Transport Domain Model - playback engine state reported by the DAW

/// Playback state codes as reported on the `TRANSPORT` wire line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Stopped,
    Playing,
    Paused,
    Recording,
    RecordPaused,
}

impl PlayState {
    /// Map a wire code to a play state. Codes outside the protocol's set
    /// yield `None` and the whole transport line is treated as unparseable.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(PlayState::Stopped),
            1 => Some(PlayState::Playing),
            2 => Some(PlayState::Paused),
            5 => Some(PlayState::Recording),
            6 => Some(PlayState::RecordPaused),
            _ => None,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            PlayState::Stopped => 0,
            PlayState::Playing => 1,
            PlayState::Paused => 2,
            PlayState::Recording => 5,
            PlayState::RecordPaused => 6,
        }
    }
}

impl std::fmt::Display for PlayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayState::Stopped => write!(f, "STOPPED"),
            PlayState::Playing => write!(f, "PLAYING"),
            PlayState::Paused => write!(f, "PAUSED"),
            PlayState::Recording => write!(f, "RECORDING"),
            PlayState::RecordPaused => write!(f, "RECORD_PAUSED"),
        }
    }
}

/// Snapshot of the DAW transport.
///
/// `success == false` means the snapshot could not be fetched or parsed;
/// callers must not trust the remaining fields in that case.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportState {
    pub play_state: PlayState,
    pub position_seconds: f64,
    pub repeat_enabled: bool,
    pub position_bars_beats: String,
    pub success: bool,
}

impl Default for TransportState {
    fn default() -> Self {
        Self {
            play_state: PlayState::Stopped,
            position_seconds: 0.0,
            repeat_enabled: false,
            position_bars_beats: String::new(),
            success: false,
        }
    }
}
