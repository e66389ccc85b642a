// End-to-end engine tests through the public crate API: real worker task,
// scripted transport, no control loop on top.

use std::sync::Arc;
use std::time::Duration;

use setlist_core::application::JobEngine;
use setlist_core::domain::{JobKind, JobResult, PlayState, ResultPayload, SessionToken, INVALID_JOB_ID};
use setlist_core::port::time_provider::SystemTimeProvider;
use setlist_core::port::transport::mocks::MockTransport;

const TRANSPORT_STOPPED: &str = "TRANSPORT\t0\t0.0\t0\t1.1.00\n";
const TOKEN_BODY: &str = "EXTSTATE\tReaperSetlist\tScriptActionId\t_RS75a1b2c3\n";
const STATUS_BODY: &str = "EXTSTATE\tReaperSetlist\ttabs\t[{\"length\":297,\"name\":\"Believer.RPP\",\"index\":0},{\"length\":180,\"name\":\"Encore.rpp\",\"index\":1}]\nEXTSTATE\tReaperSetlist\tactiveIndex\t1\nTRANSPORT\t1\t42.75\t0\t9.3.00\n";

fn start_engine(transport: Arc<MockTransport>) -> JobEngine {
    JobEngine::start(transport, Arc::new(SystemTimeProvider))
}

/// Wait until the worker has issued `count` requests.
async fn wait_for_requests(transport: &MockTransport, count: usize) {
    for _ in 0..200 {
        if transport.request_count() >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "worker issued only {} of {} expected requests",
        transport.request_count(),
        count
    );
}

async fn drain_until(engine: &mut JobEngine, count: usize) -> Vec<JobResult> {
    let mut results = Vec::new();
    for _ in 0..200 {
        results.extend(engine.drain_results());
        if results.len() >= count {
            return results;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    results
}

#[tokio::test]
async fn pipeline_preserves_submission_order_under_load() {
    let transport = Arc::new(MockTransport::with_default_body(TRANSPORT_STOPPED));
    let mut engine = start_engine(transport.clone());

    let ids: Vec<_> = (0..5).map(|_| engine.submit(JobKind::GetTransport)).collect();
    assert!(ids.iter().all(|&id| id != INVALID_JOB_ID));

    let results = drain_until(&mut engine, 5).await;
    let result_ids: Vec<_> = results.iter().map(|r| r.job_id).collect();
    assert_eq!(result_ids, ids);
    assert!(results.iter().all(|r| r.success));

    engine.shutdown().await;
}

#[tokio::test]
async fn mixed_kinds_keep_their_payload_pairing() {
    let transport = Arc::new(MockTransport::new());
    transport.push_body(TRANSPORT_STOPPED);
    transport.push_body(TOKEN_BODY);
    transport.push_body(STATUS_BODY);
    let mut engine = start_engine(transport.clone());

    engine.submit(JobKind::GetTransport);
    engine.submit(JobKind::GetSessionToken);
    engine.submit(JobKind::GetStatus {
        token: SessionToken::new("_RS75a1b2c3"),
    });

    let results = drain_until(&mut engine, 3).await;
    assert_eq!(results.len(), 3);

    match &results[0].payload {
        ResultPayload::Transport { transport } => {
            assert_eq!(transport.play_state, PlayState::Stopped);
        }
        other => panic!("unexpected first payload: {:?}", other),
    }
    match &results[1].payload {
        ResultPayload::SessionToken { token } => {
            assert_eq!(token.as_str(), "_RS75a1b2c3");
        }
        other => panic!("unexpected second payload: {:?}", other),
    }
    match &results[2].payload {
        ResultPayload::Status { setlist, transport } => {
            assert_eq!(setlist.tabs.len(), 2);
            assert_eq!(setlist.tabs[0].name, "Believer");
            assert_eq!(setlist.active_index, 1);
            assert_eq!(transport.play_state, PlayState::Playing);
        }
        other => panic!("unexpected third payload: {:?}", other),
    }

    engine.shutdown().await;
}

#[tokio::test]
async fn full_result_buffer_drops_the_new_result_and_counts_it() {
    let transport = Arc::new(MockTransport::with_default_body(TRANSPORT_STOPPED));
    let mut engine = start_engine(transport.clone());

    // Fill the result buffer to its capacity without draining.
    let mut submitted = Vec::new();
    for _ in 0..10 {
        submitted.push(engine.submit(JobKind::GetTransport));
    }
    wait_for_requests(&transport, 10).await;

    // These complete against a full buffer: dropped, never blocking the worker.
    for _ in 0..3 {
        engine.submit(JobKind::GetTransport);
    }
    wait_for_requests(&transport, 13).await;

    assert_eq!(engine.dropped_results(), 3);
    let results = engine.drain_results();
    let result_ids: Vec<_> = results.iter().map(|r| r.job_id).collect();
    assert_eq!(result_ids, submitted);

    engine.shutdown().await;
}

#[tokio::test]
async fn failures_surface_as_unsuccessful_results_not_errors() {
    let transport = Arc::new(MockTransport::new());
    transport.push_status(500, "");
    transport.push_body(TRANSPORT_STOPPED);
    let mut engine = start_engine(transport.clone());

    let failed = engine.submit(JobKind::GetTransport);
    let ok = engine.submit(JobKind::GetTransport);

    let results = drain_until(&mut engine, 2).await;
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].job_id, failed);
    assert!(!results[0].success);
    assert_eq!(results[1].job_id, ok);
    assert!(results[1].success);

    engine.shutdown().await;
}
