// Registry behaviour under concurrent creation and teardown

mod common;

use auracall_session_core::{ConnectionRequest, DisconnectCause, SessionEvent};
use common::*;
use std::sync::{Arc, Barrier};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_create_and_teardown() {
    let harness = Arc::new(TestHarness::new());

    let mut handles = Vec::new();
    for i in 0..32 {
        let harness = Arc::clone(&harness);
        handles.push(tokio::spawn(async move {
            let request = ConnectionRequest::new().with_explicit_id(format!("call-{}", i));
            let session = harness.factory.create_incoming(&request).unwrap();
            session.answer();
            session.disconnect(DisconnectCause::Local);
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let stats = harness.registry.stats();
    assert!(harness.registry.is_empty());
    assert_eq!(stats.total_registered, 32);
    assert_eq!(stats.total_removed, 32);
    assert_eq!(stats.key_collisions, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_disconnects_destroy_once() {
    let harness = Arc::new(TestHarness::new());
    let session = harness
        .factory
        .create_outgoing(&ConnectionRequest::new().with_explicit_id("race"))
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let session = Arc::clone(&session);
        handles.push(tokio::spawn(async move {
            session.disconnect(DisconnectCause::Local);
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(harness.platform.destroy_count("race"), 1);
    assert!(harness.registry.lookup("race").is_none());
}

#[test]
fn test_commands_by_unknown_key_are_noops() {
    let harness = TestHarness::new();
    assert!(harness.registry.lookup("nobody").is_none());
    assert!(harness.registry.unregister("nobody").is_none());
    assert!(harness.platform.calls().is_empty());
}

#[test]
fn test_racing_last_removals_announce_all_ended_once() {
    for round in 0..50 {
        let harness = TestHarness::new();
        let mut events = harness.events.subscribe();
        let keys = [format!("a-{}", round), format!("b-{}", round)];
        let sessions: Vec<_> = keys
            .iter()
            .map(|key| {
                harness
                    .factory
                    .create_incoming(&ConnectionRequest::new().with_explicit_id(key.as_str()))
                    .unwrap()
            })
            .collect();

        let barrier = Arc::new(Barrier::new(sessions.len()));
        let handles: Vec<_> = sessions
            .into_iter()
            .map(|session| {
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    session.disconnect(DisconnectCause::Remote);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert!(harness.registry.is_empty());
        let ended = std::iter::from_fn(|| events.try_recv().ok())
            .filter(|e| matches!(e, SessionEvent::AllCallsEnded))
            .count();
        assert_eq!(ended, 1, "round {}", round);
    }
}
