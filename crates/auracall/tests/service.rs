// End-to-end tests for the AuraCall service

mod common;

use auracall::{AuraCallConfig, AuraCallError, AuraCallService, BridgeEvent};
use auracall_carrier_core::{PlacementOutcome, SimEvent};
use auracall_session_core::{
    CallState, ConnectionRequest, DerivedDirection, DisconnectCause, NoopPlatform, RawCallState,
};
use common::*;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tokio_test::{assert_err, assert_ok};

#[tokio::test]
async fn test_start_is_idempotent() {
    let (service, _) = service();
    assert!(!service.is_running());
    assert_ok!(service.start());
    assert_ok!(service.start());
    assert!(service.is_running());
    service.shutdown().await;
    assert!(!service.is_running());
}

#[tokio::test]
async fn test_start_after_shutdown_fails() {
    let (service, _) = service();
    service.start().unwrap();
    service.shutdown().await;
    assert!(matches!(
        service.start(),
        Err(AuraCallError::InvalidState { .. })
    ));
}

#[test]
fn test_start_outside_runtime_fails() {
    let (service, _) = service();
    assert!(matches!(
        service.start(),
        Err(AuraCallError::InvalidState { .. })
    ));
}

#[test]
fn test_invalid_config_rejected() {
    let config = AuraCallConfig::default().with_event_capacity(0);
    let result = AuraCallService::new(
        config,
        Arc::new(NoopPlatform),
        Arc::new(FakeProvider::new()),
    );
    assert!(matches!(result, Err(AuraCallError::Configuration { .. })));
}

#[tokio::test]
async fn test_telephony_signals_become_call_state_events() {
    let (service, _) = service();
    let mut events = service.subscribe();
    service.start().unwrap();

    let signals = service.telephony_signal_sender();
    signals
        .send_state(RawCallState::Ringing, Some("555"))
        .await
        .unwrap();
    signals.send_code(2, Some("555")).await.unwrap();

    let mut directions = Vec::new();
    for _ in 0..2 {
        match next_matching(&mut events, |e| matches!(e, BridgeEvent::CallStateChanged(_))).await
        {
            BridgeEvent::CallStateChanged(event) => {
                assert_eq!(event.number, "555");
                directions.push(event.direction);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
    assert_eq!(
        directions,
        vec![DerivedDirection::Incoming, DerivedDirection::Answered]
    );

    service.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_sim_events_push_carrier_snapshots() {
    let (service, _) = service();
    let mut events = service.subscribe();
    service.start().unwrap();

    // Initial push
    match next_matching(&mut events, |e| matches!(e, BridgeEvent::CarrierUpdated(_))).await {
        BridgeEvent::CarrierUpdated(snapshot) => {
            assert_eq!(snapshot.len(), 1);
            assert_eq!(snapshot[0].carrier_name.as_deref(), Some("Acme"));
        }
        other => panic!("unexpected event: {:?}", other),
    }

    service
        .sim_event_sender()
        .send(SimEvent::CardStateChanged)
        .await
        .unwrap();
    let update = next_matching(&mut events, |e| matches!(e, BridgeEvent::CarrierUpdated(_))).await;
    assert_eq!(update.name(), "CarrierUpdated");

    service.shutdown().await;
}

#[tokio::test]
async fn test_session_teardown_reaches_the_bridge() {
    let (service, _) = service();
    let mut events = service.subscribe();
    service.start().unwrap();

    let request = ConnectionRequest::new()
        .with_explicit_id("abc")
        .with_address("tel:555");
    let session = service.create_outgoing(&request).unwrap();
    assert_eq!(session.key(), "abc");
    assert_eq!(session.state(), CallState::Dialing);

    assert!(service.answer("abc").unwrap().is_applied());
    assert!(service.disconnect("abc").unwrap().is_applied());
    assert!(service.registry().is_empty());

    let finished = next_matching(&mut events, |e| {
        matches!(e, BridgeEvent::CallFinished { .. } | BridgeEvent::AllCallsEnded)
    })
    .await;
    assert_eq!(
        finished,
        BridgeEvent::CallFinished {
            key: "abc".to_string(),
            cause: DisconnectCause::Local,
        }
    );
    let ended = next_matching(&mut events, |e| matches!(e, BridgeEvent::AllCallsEnded)).await;
    assert_eq!(ended, BridgeEvent::AllCallsEnded);

    service.shutdown().await;
}

#[tokio::test]
async fn test_commands_for_unknown_key_are_dropped() {
    let (service, _) = service();
    assert!(service.answer("missing").is_none());
    assert!(service.hold("missing").is_none());
    assert!(service.disconnect("missing").is_none());
    assert!(service.play_tone("missing", '5').is_none());
}

#[tokio::test]
async fn test_unmanaged_connections_are_not_created() {
    let config = AuraCallConfig::default().with_manage_connections(false);
    let service = service_with(config, Arc::new(FakeProvider::new()));
    let request = ConnectionRequest::new().with_address("tel:555");
    assert!(service.create_incoming(&request).is_none());
    assert!(service.registry().is_empty());
}

#[tokio::test]
async fn test_place_call_rejection_is_structured() {
    let provider = Arc::new(FakeProvider::without_permission());
    let service = service_with(AuraCallConfig::default(), provider.clone());

    let rejection = assert_err!(service.place_call("555", 0));
    assert_eq!(rejection.code, "PERMISSION_DENIED");
    assert!(provider.placed().is_empty());
}

#[tokio::test]
async fn test_place_call_on_slot() {
    let (service, provider) = service();
    assert_eq!(
        service.place_call("555", 0).unwrap(),
        PlacementOutcome::CallStarted
    );
    assert_eq!(provider.placed(), vec!["tel:555".to_string()]);
}

#[tokio::test]
async fn test_shutdown_clears_sessions() {
    let (service, _) = service();
    service.start().unwrap();
    service
        .create_incoming(&ConnectionRequest::new().with_address("tel:777"))
        .unwrap();
    assert_eq!(service.registry().len(), 1);

    service.shutdown().await;
    assert!(service.registry().is_empty());
}
