// Shared helpers for session-core integration tests
#![allow(dead_code)]

use auracall_infra_common::PlatformError;
use auracall_session_core::{
    default_table, ConnectionSignal, FactoryConfig, MediaRequest, PlatformConnection,
    SessionEventPublisher, SessionFactory, SessionRegistry,
};
use parking_lot::Mutex;
use std::sync::mpsc;
use std::sync::Arc;

/// Everything the platform was asked to do, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    Signal(String, ConnectionSignal),
    Address(String, String),
    Media(String, MediaRequest),
    Destroy(String),
}

/// Platform double that records every call and can be told to fail
#[derive(Debug, Default)]
pub struct RecordingPlatform {
    calls: Mutex<Vec<PlatformCall>>,
    fail_signals: bool,
    fail_destroy: bool,
    disconnect_gate: Mutex<Option<(mpsc::Sender<()>, mpsc::Receiver<()>)>>,
}

impl RecordingPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every signal and destroy call returns an error
    pub fn failing() -> Self {
        Self {
            fail_signals: true,
            fail_destroy: true,
            ..Self::default()
        }
    }

    /// The first `Disconnected` signal reports on `entered` and then blocks
    /// until `release` fires; it is recorded only once released.
    pub fn gated_on_disconnect() -> (Self, mpsc::Receiver<()>, mpsc::Sender<()>) {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let platform = Self {
            disconnect_gate: Mutex::new(Some((entered_tx, release_rx))),
            ..Self::default()
        };
        (platform, entered_rx, release_tx)
    }

    pub fn calls(&self) -> Vec<PlatformCall> {
        self.calls.lock().clone()
    }

    pub fn destroy_count(&self, key: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, PlatformCall::Destroy(k) if k == key))
            .count()
    }

    pub fn signals(&self, key: &str) -> Vec<ConnectionSignal> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                PlatformCall::Signal(k, s) if k == key => Some(s.clone()),
                _ => None,
            })
            .collect()
    }
}

impl PlatformConnection for RecordingPlatform {
    fn signal(&self, key: &str, signal: ConnectionSignal) -> Result<(), PlatformError> {
        if matches!(signal, ConnectionSignal::Disconnected(_)) {
            let gate = self.disconnect_gate.lock().take();
            if let Some((entered, release)) = gate {
                let _ = entered.send(());
                let _ = release.recv();
            }
        }
        self.calls
            .lock()
            .push(PlatformCall::Signal(key.to_string(), signal));
        if self.fail_signals {
            return Err(PlatformError::new("signal", "connection gone"));
        }
        Ok(())
    }

    fn set_address(&self, key: &str, address: &str) -> Result<(), PlatformError> {
        self.calls
            .lock()
            .push(PlatformCall::Address(key.to_string(), address.to_string()));
        Ok(())
    }

    fn media(&self, key: &str, request: MediaRequest) -> Result<(), PlatformError> {
        self.calls
            .lock()
            .push(PlatformCall::Media(key.to_string(), request));
        Ok(())
    }

    fn destroy(&self, key: &str) -> Result<(), PlatformError> {
        self.calls.lock().push(PlatformCall::Destroy(key.to_string()));
        if self.fail_destroy {
            return Err(PlatformError::new("destroy", "connection gone"));
        }
        Ok(())
    }
}

/// Factory, registry, platform double and event publisher wired together
pub struct TestHarness {
    pub registry: Arc<SessionRegistry>,
    pub platform: Arc<RecordingPlatform>,
    pub events: SessionEventPublisher,
    pub factory: SessionFactory,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_platform(RecordingPlatform::new())
    }

    pub fn with_platform(platform: RecordingPlatform) -> Self {
        let events = SessionEventPublisher::new(64);
        let registry = Arc::new(SessionRegistry::with_events(events.clone()));
        let platform = Arc::new(platform);
        let factory = SessionFactory::new(
            Arc::clone(&registry),
            Arc::new(default_table()),
            platform.clone(),
            Some(events.clone()),
            FactoryConfig::default(),
        );
        Self {
            registry,
            platform,
            events,
            factory,
        }
    }
}
