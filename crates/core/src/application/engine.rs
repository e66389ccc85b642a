// Job Queue Engine - serial command/response execution on one worker task.
//
// Exactly one worker, not a pool: the DAW's text protocol has no pipelining
// and commands must be serialized to avoid interleaved state mutation on the
// server side. The control loop talks to the worker only through bounded
// channels - submit on one side, drain on the other, no callbacks.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::constants::{
    JOB_QUEUE_CAPACITY, RESULT_QUEUE_CAPACITY, SHUTDOWN_JOIN_TIMEOUT_MS,
};
use super::jobs;
use crate::domain::{Job, JobId, JobKind, JobResult, INVALID_JOB_ID};
use crate::port::{TimeProvider, TransportPort};

/// Engine lifecycle: Running from construction until `shutdown`, then
/// terminally Stopped. A fresh instance is required to run again.
pub struct JobEngine {
    job_tx: mpsc::Sender<Job>,
    result_rx: mpsc::Receiver<JobResult>,
    next_job_id: AtomicU32,
    running: Arc<AtomicBool>,
    stop_tx: Option<watch::Sender<bool>>,
    worker_handle: Option<JoinHandle<()>>,
    dropped_results: Arc<AtomicU64>,
    time_provider: Arc<dyn TimeProvider>,
}

impl JobEngine {
    /// Start the engine: spawns the dedicated transport worker.
    pub fn start(
        transport: Arc<dyn TransportPort>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        let (job_tx, job_rx) = mpsc::channel(JOB_QUEUE_CAPACITY);
        let (result_tx, result_rx) = mpsc::channel(RESULT_QUEUE_CAPACITY);
        // A watch channel carries the stop flag: the worker can both poll
        // it between jobs and await the flip while parked on an empty queue.
        let (stop_tx, stop_rx) = watch::channel(false);
        let dropped_results = Arc::new(AtomicU64::new(0));
        let running = Arc::new(AtomicBool::new(true));

        let worker = Worker {
            transport,
            time_provider: time_provider.clone(),
            result_tx,
            dropped_results: dropped_results.clone(),
        };
        let worker_handle = tokio::spawn(worker.run(job_rx, stop_rx));

        info!("job engine started");
        Self {
            job_tx,
            result_rx,
            next_job_id: AtomicU32::new(1),
            running,
            stop_tx: Some(stop_tx),
            worker_handle: Some(worker_handle),
            dropped_results,
            time_provider,
        }
    }

    /// Enqueue a job for the worker. Returns its id, or `INVALID_JOB_ID`
    /// when the engine is stopped or the job queue is full (backpressure is
    /// logged, never raised). Never blocks.
    pub fn submit(&self, kind: JobKind) -> JobId {
        if !self.running.load(Ordering::Acquire) {
            warn!(kind = kind.name(), "cannot submit job - engine stopped");
            return INVALID_JOB_ID;
        }

        let id = self.allocate_id();
        let job = Job {
            id,
            submitted_at: self.time_provider.now_millis(),
            kind,
        };

        match self.job_tx.try_send(job) {
            Ok(()) => {
                debug!(job_id = id, "job submitted");
                id
            }
            Err(TrySendError::Full(job)) => {
                error!(
                    job_id = job.id,
                    kind = job.kind.name(),
                    "job queue full, dropping submission"
                );
                INVALID_JOB_ID
            }
            Err(TrySendError::Closed(_)) => {
                warn!("job queue closed, worker gone");
                INVALID_JOB_ID
            }
        }
    }

    /// Remove and return all buffered results, oldest first. Non-blocking.
    pub fn drain_results(&mut self) -> Vec<JobResult> {
        let mut results = Vec::new();
        while let Ok(result) = self.result_rx.try_recv() {
            results.push(result);
        }
        results
    }

    /// Results the worker had to drop because the result buffer was full.
    pub fn dropped_results(&self) -> u64 {
        self.dropped_results.load(Ordering::Relaxed)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stop the engine. Idempotent.
    ///
    /// The worker finishes the job it has already dequeued (that result is
    /// still delivered and drainable); jobs still waiting in the queue are
    /// abandoned.
    pub async fn shutdown(&mut self) {
        let was_running = self.running.swap(false, Ordering::AcqRel);
        if let Some(stop_tx) = self.stop_tx.take() {
            info!("shutting down job engine");
            let _ = stop_tx.send(true);
        }
        if let Some(handle) = self.worker_handle.take() {
            let join = tokio::time::timeout(
                Duration::from_millis(SHUTDOWN_JOIN_TIMEOUT_MS),
                handle,
            )
            .await;
            if join.is_err() {
                error!("worker did not stop within the join timeout");
            }
        }
        if was_running {
            info!("job engine shutdown complete");
        }
    }

    // Ids increase monotonically and wrap; 0 stays reserved as the sentinel.
    fn allocate_id(&self) -> JobId {
        let mut id = self.next_job_id.fetch_add(1, Ordering::Relaxed);
        if id == INVALID_JOB_ID {
            id = self.next_job_id.fetch_add(1, Ordering::Relaxed);
        }
        id
    }
}

/// The dedicated transport worker. Executes jobs strictly in submission
/// order; result-emission order equals execution order.
struct Worker {
    transport: Arc<dyn TransportPort>,
    time_provider: Arc<dyn TimeProvider>,
    result_tx: mpsc::Sender<JobResult>,
    dropped_results: Arc<AtomicU64>,
}

impl Worker {
    async fn run(self, mut job_rx: mpsc::Receiver<Job>, mut stop_rx: watch::Receiver<bool>) {
        info!("transport worker started");

        loop {
            if *stop_rx.borrow() {
                break;
            }

            // Block until a job arrives or stop is signalled. Once a job is
            // dequeued it runs to completion before stop is honored.
            let job = tokio::select! {
                maybe_job = job_rx.recv() => match maybe_job {
                    Some(job) => job,
                    None => break,
                },
                _ = stop_rx.changed() => break,
            };

            debug!(job_id = job.id, kind = job.kind.name(), "executing job");
            let (success, payload) = jobs::execute(&job.kind, self.transport.as_ref()).await;
            let result = JobResult {
                job_id: job.id,
                success,
                completed_at: self.time_provider.now_millis(),
                payload,
            };

            match self.result_tx.try_send(result) {
                Ok(()) => {}
                Err(TrySendError::Full(result)) => {
                    // Blocking here would wedge the single worker; drop the
                    // new result deterministically and count it.
                    self.dropped_results.fetch_add(1, Ordering::Relaxed);
                    error!(
                        job_id = result.job_id,
                        "result buffer full, dropping result"
                    );
                }
                Err(TrySendError::Closed(_)) => break,
            }
        }

        info!("transport worker stopped");
    }
}
