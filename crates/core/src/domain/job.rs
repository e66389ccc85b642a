// Job Domain Model - one logical request to the DAW, executed once by the
// transport worker

use super::setlist::{SessionToken, SetlistState};
use super::transport::TransportState;

/// Job ID. Monotonically increasing per engine instance, wraps on overflow.
pub type JobId = u32;

/// Sentinel returned by `submit` when no job was enqueued (engine stopped or
/// job queue full). Never allocated to a real job.
pub const INVALID_JOB_ID: JobId = 0;

/// Tab navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabDirection {
    Next,
    Previous,
}

/// Playback action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayAction {
    Play,
    Stop,
}

/// Closed set of request kinds the engine knows how to execute.
///
/// Tab-list-dependent kinds carry the session token they were issued with, so
/// a job stays immutable once submitted even if the token changes later.
#[derive(Debug, Clone, PartialEq)]
pub enum JobKind {
    /// Probe DAW reachability (the device-side analogue of "connect").
    Connect,
    /// Switch tab, then refresh setlist + transport in one batch.
    ChangeTab {
        direction: TabDirection,
        token: SessionToken,
    },
    /// Start or stop playback, then refresh transport in one batch.
    ChangePlaystate(PlayAction),
    /// Full refresh: setlist + active index + transport.
    GetStatus { token: SessionToken },
    /// Fetch the ReaperSetlist script action id.
    GetSessionToken,
    /// Transport-only refresh.
    GetTransport,
}

impl JobKind {
    /// Short name for log lines.
    pub fn name(&self) -> &'static str {
        match self {
            JobKind::Connect => "Connect",
            JobKind::ChangeTab { .. } => "ChangeTab",
            JobKind::ChangePlaystate(_) => "ChangePlaystate",
            JobKind::GetStatus { .. } => "GetStatus",
            JobKind::GetSessionToken => "GetSessionToken",
            JobKind::GetTransport => "GetTransport",
        }
    }
}

/// A submitted job. Immutable once created; consumed by the worker.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    /// Submission timestamp, epoch ms.
    pub submitted_at: i64,
    pub kind: JobKind,
}

/// Kind-specific payload of a completed job.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultPayload {
    Connect {
        connected: bool,
        address: String,
    },
    ChangeTab {
        setlist: SetlistState,
        transport: TransportState,
    },
    ChangePlaystate {
        transport: TransportState,
    },
    Status {
        setlist: SetlistState,
        transport: TransportState,
    },
    SessionToken {
        token: SessionToken,
    },
    Transport {
        transport: TransportState,
    },
}

impl ResultPayload {
    /// Transport snapshot carried by this payload, if any.
    pub fn transport_state(&self) -> Option<&TransportState> {
        match self {
            ResultPayload::ChangeTab { transport, .. }
            | ResultPayload::ChangePlaystate { transport }
            | ResultPayload::Status { transport, .. }
            | ResultPayload::Transport { transport } => Some(transport),
            _ => None,
        }
    }

    /// Setlist snapshot carried by this payload, if any.
    pub fn setlist(&self) -> Option<&SetlistState> {
        match self {
            ResultPayload::ChangeTab { setlist, .. } | ResultPayload::Status { setlist, .. } => {
                Some(setlist)
            }
            _ => None,
        }
    }
}

/// Outcome of one executed job.
///
/// Created by the worker, delivered to the producer exactly once, never
/// mutated after creation. An unsuccessful result carries defaulted payload
/// fields that callers must not trust.
#[derive(Debug, Clone)]
pub struct JobResult {
    pub job_id: JobId,
    pub success: bool,
    /// Completion timestamp, epoch ms.
    pub completed_at: i64,
    pub payload: ResultPayload,
}
