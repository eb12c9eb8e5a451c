//! Joint waiting on concurrent dispatches.

use std::sync::Arc;
use std::time::Duration;

use cronitor_agent::ping::{
    CompletionCounter, DispatchStatus, Dispatcher, EventKind, PingGroup, PingRequest,
};

mod common;

#[tokio::test]
async fn test_wait_unblocks_after_every_exit_path() {
    let (ok, ok_hits) = common::start_fixed_backend(200).await;
    let (failing, failing_hits) = common::start_fixed_backend(500).await;
    let closed = common::closed_addr().await;

    let delivering = Arc::new(Dispatcher::new(&common::local_config(ok, ok)).unwrap());
    let exhausting = Arc::new(Dispatcher::new(&common::local_config(failing, failing)).unwrap());
    let broken = Arc::new(Dispatcher::new(&common::local_config(closed, closed)).unwrap());

    let counter = CompletionCounter::new();
    let mut handles = Vec::new();
    for i in 0..12 {
        let dispatcher = match i % 3 {
            0 => &delivering,
            1 => &exhausting,
            _ => &broken,
        };
        let request = PingRequest::new(format!("job-{}", i), EventKind::Complete).unwrap();
        handles.push(dispatcher.spawn(request, counter.signal()));
    }

    tokio::time::timeout(Duration::from_secs(10), counter.wait())
        .await
        .expect("joint wait should unblock");
    assert_eq!(counter.pending(), 0);

    let mut statuses = Vec::new();
    for handle in handles {
        statuses.push(handle.await.unwrap().status);
    }
    let count = |status: DispatchStatus| statuses.iter().filter(|s| **s == status).count();
    assert_eq!(count(DispatchStatus::Delivered), 4);
    assert_eq!(count(DispatchStatus::Exhausted), 4);
    assert_eq!(count(DispatchStatus::TransportFailed), 4);

    assert_eq!(ok_hits.count(), 4);
    assert_eq!(failing_hits.count(), 4 * 6);
}

#[tokio::test]
async fn test_ping_group_collects_reports() {
    let (primary, hits) = common::start_fixed_backend(200).await;
    let dispatcher = Arc::new(Dispatcher::new(&common::local_config(primary, primary)).unwrap());

    let mut group = PingGroup::new(dispatcher);
    for kind in [EventKind::Run, EventKind::Complete, EventKind::Fail] {
        group.spawn(
            PingRequest::new("web-01", kind)
                .unwrap()
                .with_message("batch"),
        );
    }
    let completion = group.completion();

    let reports = tokio::time::timeout(Duration::from_secs(5), group.wait())
        .await
        .expect("group should finish");

    assert_eq!(reports.len(), 3);
    assert!(reports.iter().all(|r| r.is_delivered()));
    assert_eq!(completion.pending(), 0);

    let mut kinds: Vec<&str> = reports.iter().map(|r| r.kind.as_str()).collect();
    kinds.sort();
    assert_eq!(kinds, vec!["complete", "fail", "run"]);

    let mut targets: Vec<String> = hits.requests().into_iter().map(|r| r.target).collect();
    targets.sort();
    assert_eq!(
        targets,
        vec![
            "/web-01/complete?try=1&msg=batch",
            "/web-01/fail?try=1&msg=batch",
            "/web-01/run?try=1&msg=batch",
        ]
    );
}

#[tokio::test]
async fn test_empty_group() {
    let dispatcher = Arc::new(Dispatcher::new(&cronitor_agent::AgentConfig::default()).unwrap());
    let group = PingGroup::new(dispatcher);
    assert_eq!(group.pending(), 0);
    assert!(group.wait().await.is_empty());
}
