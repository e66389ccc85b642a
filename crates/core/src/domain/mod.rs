// Domain Layer - Pure state of the remote-controlled DAW

pub mod input;
pub mod job;
pub mod setlist;
pub mod transport;

// Re-exports
pub use input::{Button, ButtonEdges};
pub use job::{
    Job, JobId, JobKind, JobResult, PlayAction, ResultPayload, TabDirection, INVALID_JOB_ID,
};
pub use setlist::{SessionToken, SetlistState, TabInfo};
pub use transport::{PlayState, TransportState};
