// Control-loop and engine constants (no magic values)

/// Capacity of the job queue feeding the transport worker.
/// Matches the result buffer so a burst of submissions cannot wedge either side.
pub const JOB_QUEUE_CAPACITY: usize = 10;

/// Capacity of the result buffer drained by the control loop.
pub const RESULT_QUEUE_CAPACITY: usize = 10;

/// How long `shutdown` waits for the worker to finish its current job (5s)
pub const SHUTDOWN_JOIN_TIMEOUT_MS: u64 = 5000;

/// Interval between connect probes while disconnected (10s)
pub const CONNECT_RETRY_INTERVAL_MS: i64 = 10_000;

/// Interval between session-token fetch attempts (5s)
pub const TOKEN_RETRY_INTERVAL_MS: i64 = 5_000;

/// Token fetch attempts before giving up until the next reconnect
pub const MAX_TOKEN_ATTEMPTS: u32 = 5;

/// Status poll interval before the first successful setlist snapshot (1s)
pub const STATUS_POLL_BOOTSTRAP_INTERVAL_MS: i64 = 1_000;

/// Status poll interval once a setlist snapshot is held (10s)
pub const STATUS_POLL_INTERVAL_MS: i64 = 10_000;

/// Transport-only poll interval while playing or awaiting stop confirmation (1s)
pub const TRANSPORT_POLL_ACTIVE_INTERVAL_MS: i64 = 1_000;

/// Transport-only poll interval in degraded (no-token) mode (10s)
pub const TRANSPORT_POLL_DEGRADED_INTERVAL_MS: i64 = 10_000;

/// Interval of the trace-level state snapshot log (5s)
pub const DEBUG_SNAPSHOT_INTERVAL_MS: i64 = 5_000;

/// Battery/WiFi status icon refresh interval surfaced to the renderer (30s)
pub const STATUS_ICON_REFRESH_INTERVAL_MS: i64 = 30_000;
