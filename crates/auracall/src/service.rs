//! AuraCall service
//!
//! Composition root. Owns the session registry, the session factory, the
//! signal classifier, the carrier services and the event emitter, and runs
//! the background tasks that connect them:
//!
//! - telephony signals → classifier → `CallStateChanged`
//! - SIM events → debounced snapshot → `CarrierUpdated`
//! - session teardown → `CallFinished` / `AllCallsEnded`

use crate::config::AuraCallConfig;
use crate::error::{AuraCallError, AuraCallResult};
use crate::events::{BridgeEvent, BridgeRejection, EventEmitter, EventStream};
use auracall_carrier_core::{
    CallPlacer, CarrierInfo, CarrierQuery, DefaultProviderStatus, PlacementOutcome, SimEvent,
    SimMonitor, TelephonyProvider,
};
use auracall_session_core::{
    default_table, CallSession, ConnectionRequest, DisconnectCause, PlatformConnection,
    RawCallState, SessionCommand, SessionEvent, SessionEventPublisher, SessionFactory,
    SessionRegistry, SignalClassifier, TelephonySignal, TransitionOutcome,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const SIM_EVENT_BUFFER: usize = 16;

/// Clonable handle for feeding the telephony signal stream
#[derive(Debug, Clone)]
pub struct TelephonySignalSender {
    tx: mpsc::Sender<TelephonySignal>,
}

impl TelephonySignalSender {
    /// Send a decoded raw state, waiting for buffer space
    pub async fn send_state(
        &self,
        state: RawCallState,
        number: Option<&str>,
    ) -> AuraCallResult<()> {
        self.send(TelephonySignal::state(state, number)).await
    }

    /// Send a platform integer code, waiting for buffer space
    pub async fn send_code(&self, code: i32, number: Option<&str>) -> AuraCallResult<()> {
        self.send(TelephonySignal::code(code, number)).await
    }

    /// Send from a synchronous platform callback. Fails if the buffer is full.
    pub fn try_send_code(&self, code: i32, number: Option<&str>) -> AuraCallResult<()> {
        self.tx
            .try_send(TelephonySignal::code(code, number))
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => {
                    AuraCallError::invalid_state("telephony signal buffer is full")
                }
                mpsc::error::TrySendError::Closed(_) => AuraCallError::ChannelClosed {
                    channel: "telephony signals",
                },
            })
    }

    async fn send(&self, signal: TelephonySignal) -> AuraCallResult<()> {
        self.tx
            .send(signal)
            .await
            .map_err(|_| AuraCallError::ChannelClosed {
                channel: "telephony signals",
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Running,
    Stopped,
}

struct Runtime {
    lifecycle: Lifecycle,
    signal_rx: Option<mpsc::Receiver<TelephonySignal>>,
    sim_rx: Option<mpsc::Receiver<SimEvent>>,
    tasks: Vec<JoinHandle<()>>,
}

pub struct AuraCallService {
    config: AuraCallConfig,
    registry: Arc<SessionRegistry>,
    factory: SessionFactory,
    classifier: Arc<SignalClassifier>,
    session_events: SessionEventPublisher,
    emitter: EventEmitter,
    carrier: CarrierQuery,
    placer: CallPlacer,
    signal_tx: mpsc::Sender<TelephonySignal>,
    sim_tx: mpsc::Sender<SimEvent>,
    runtime: Mutex<Runtime>,
}

impl AuraCallService {
    pub fn new(
        config: AuraCallConfig,
        platform: Arc<dyn PlatformConnection>,
        provider: Arc<dyn TelephonyProvider>,
    ) -> AuraCallResult<Self> {
        config.validate()?;

        let table = default_table();
        table.validate().map_err(|errors| {
            AuraCallError::config(format!("invalid state table: {}", errors.join("; ")))
        })?;

        let session_events = SessionEventPublisher::new(config.events.capacity);
        let registry = Arc::new(SessionRegistry::with_events(session_events.clone()));
        let factory = SessionFactory::new(
            Arc::clone(&registry),
            Arc::new(table),
            platform,
            Some(session_events.clone()),
            config.factory.clone(),
        );

        let (signal_tx, signal_rx) = mpsc::channel(config.classifier.signal_buffer);
        let (sim_tx, sim_rx) = mpsc::channel(SIM_EVENT_BUFFER);

        Ok(Self {
            registry,
            factory,
            classifier: Arc::new(SignalClassifier::new()),
            session_events,
            emitter: EventEmitter::new(config.events.capacity),
            carrier: CarrierQuery::new(Arc::clone(&provider)),
            placer: CallPlacer::new(provider, &config.carrier),
            signal_tx,
            sim_tx,
            runtime: Mutex::new(Runtime {
                lifecycle: Lifecycle::Created,
                signal_rx: Some(signal_rx),
                sim_rx: Some(sim_rx),
                tasks: Vec::new(),
            }),
            config,
        })
    }

    /// Spawn the classifier, SIM monitor and session event tasks on the
    /// current tokio runtime. Calling it again while running does nothing;
    /// a stopped service cannot be restarted.
    pub fn start(&self) -> AuraCallResult<()> {
        let handle = tokio::runtime::Handle::try_current().map_err(|_| {
            AuraCallError::invalid_state("start must be called within a tokio runtime")
        })?;

        let mut runtime = self.runtime.lock();
        match runtime.lifecycle {
            Lifecycle::Running => return Ok(()),
            Lifecycle::Stopped => {
                return Err(AuraCallError::invalid_state("service has been shut down"))
            }
            Lifecycle::Created => {}
        }

        let (Some(signal_rx), Some(sim_rx)) = (runtime.signal_rx.take(), runtime.sim_rx.take())
        else {
            return Err(AuraCallError::invalid_state("inbound channels already consumed"));
        };

        let classifier = Arc::clone(&self.classifier);
        runtime
            .tasks
            .push(handle.spawn(classifier.run(signal_rx, self.emitter.clone())));

        let debounce = self.config.carrier.sim_update_debounce();
        let monitor = SimMonitor::new(self.carrier.clone(), debounce);
        runtime
            .tasks
            .push(handle.spawn(monitor.run(sim_rx, self.emitter.clone())));

        runtime.tasks.push(handle.spawn(forward_session_events(
            self.session_events.subscribe(),
            self.emitter.clone(),
        )));

        runtime.lifecycle = Lifecycle::Running;
        info!("AuraCall service started");
        Ok(())
    }

    /// Stop background tasks and drop every session
    pub async fn shutdown(&self) {
        let tasks = {
            let mut runtime = self.runtime.lock();
            if runtime.lifecycle == Lifecycle::Stopped {
                return;
            }
            runtime.lifecycle = Lifecycle::Stopped;
            std::mem::take(&mut runtime.tasks)
        };

        for task in &tasks {
            task.abort();
        }
        for task in tasks {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    warn!("Background task failed: {}", e);
                }
            }
        }

        self.registry.clear();
        info!("AuraCall service stopped");
    }

    pub fn is_running(&self) -> bool {
        self.runtime.lock().lifecycle == Lifecycle::Running
    }

    pub fn config(&self) -> &AuraCallConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    pub fn classifier(&self) -> &Arc<SignalClassifier> {
        &self.classifier
    }

    // Connection creation, called by the platform's call-routing service

    pub fn create_outgoing(&self, request: &ConnectionRequest) -> Option<Arc<CallSession>> {
        self.factory.create_outgoing(request)
    }

    pub fn create_incoming(&self, request: &ConnectionRequest) -> Option<Arc<CallSession>> {
        self.factory.create_incoming(request)
    }

    pub fn outgoing_failed(&self, request: &ConnectionRequest) {
        self.factory.outgoing_failed(request)
    }

    pub fn incoming_failed(&self, request: &ConnectionRequest) {
        self.factory.incoming_failed(request)
    }

    // Presentation commands. An unknown key is a no-op and returns `None`.

    pub fn command(&self, key: &str, command: SessionCommand) -> Option<TransitionOutcome> {
        match self.registry.lookup(key) {
            Some(session) => Some(session.apply(command)),
            None => {
                debug!("No session for key {}, dropping {:?}", key, command);
                None
            }
        }
    }

    pub fn answer(&self, key: &str) -> Option<TransitionOutcome> {
        self.command(key, SessionCommand::Answer)
    }

    pub fn reject(&self, key: &str) -> Option<TransitionOutcome> {
        self.command(key, SessionCommand::Reject)
    }

    /// Local hangup
    pub fn disconnect(&self, key: &str) -> Option<TransitionOutcome> {
        self.command(key, SessionCommand::Disconnect(DisconnectCause::Local))
    }

    pub fn hold(&self, key: &str) -> Option<TransitionOutcome> {
        self.command(key, SessionCommand::Hold)
    }

    pub fn unhold(&self, key: &str) -> Option<TransitionOutcome> {
        self.command(key, SessionCommand::Unhold)
    }

    pub fn play_tone(&self, key: &str, digit: char) -> Option<TransitionOutcome> {
        self.command(key, SessionCommand::PlayTone(digit))
    }

    pub fn stop_tone(&self, key: &str) -> Option<TransitionOutcome> {
        self.command(key, SessionCommand::StopTone)
    }

    // Telephony signals and events

    pub fn telephony_signal_sender(&self) -> TelephonySignalSender {
        TelephonySignalSender {
            tx: self.signal_tx.clone(),
        }
    }

    pub fn sim_event_sender(&self) -> mpsc::Sender<SimEvent> {
        self.sim_tx.clone()
    }

    pub fn subscribe(&self) -> EventStream {
        self.emitter.subscribe()
    }

    // Carrier surface

    pub fn carrier_info(&self) -> Vec<CarrierInfo> {
        self.carrier.snapshot()
    }

    pub fn place_call(&self, number: &str, slot: i32) -> Result<PlacementOutcome, BridgeRejection> {
        self.placer.place_call(number, slot).map_err(|e| {
            warn!("Call placement rejected: {}", e);
            BridgeRejection::from(e)
        })
    }

    pub fn ensure_default_provider(&self) -> Result<DefaultProviderStatus, BridgeRejection> {
        self.placer.ensure_default_provider().map_err(|e| {
            warn!("Default provider check failed: {}", e);
            BridgeRejection::from(e)
        })
    }
}

async fn forward_session_events(
    mut events: broadcast::Receiver<SessionEvent>,
    emitter: EventEmitter,
) {
    loop {
        match events.recv().await {
            Ok(SessionEvent::SessionFinished { key, cause }) => {
                emitter.emit(BridgeEvent::CallFinished { key, cause });
            }
            Ok(SessionEvent::AllCallsEnded) => emitter.emit(BridgeEvent::AllCallsEnded),
            Ok(other) => debug!("Session event: {:?}", other),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("Session event forwarder lagged, {} events skipped", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
