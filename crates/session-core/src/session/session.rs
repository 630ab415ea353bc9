//! Call Session
//!
//! Per-call state machine. A session owns one call's lifecycle: it validates
//! every command against the [`StateTable`], mirrors accepted transitions to
//! the platform connection and, on entering `Disconnected`, runs teardown
//! exactly once.

use crate::events::{SessionEvent, SessionEventPublisher};
use crate::platform::{ConnectionSignal, MediaRequest, NoopPlatform, PlatformConnection};
use crate::registry::SessionRegistry;
use crate::state_table::{default_table, Action, CommandKind, SessionCommand, StateTable};
use crate::types::{CallDirection, CallState, DisconnectCause, RemoteAddress};
use auracall_infra_common::PlatformError;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, warn};

/// Collaborators shared by every session created from the same factory
#[derive(Clone)]
pub struct SessionContext {
    pub table: Arc<StateTable>,
    pub platform: Arc<dyn PlatformConnection>,
    pub registry: Weak<SessionRegistry>,
    pub events: Option<SessionEventPublisher>,
}

impl SessionContext {
    pub fn new(
        table: Arc<StateTable>,
        platform: Arc<dyn PlatformConnection>,
        registry: &Arc<SessionRegistry>,
        events: Option<SessionEventPublisher>,
    ) -> Self {
        Self {
            table,
            platform,
            registry: Arc::downgrade(registry),
            events,
        }
    }

    /// Default table, no-op platform, no registry, no events
    pub fn detached() -> Self {
        Self {
            table: Arc::new(default_table()),
            platform: Arc::new(NoopPlatform),
            registry: Weak::new(),
            events: None,
        }
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("transitions", &self.table.transition_count())
            .field("has_registry", &(self.registry.strong_count() > 0))
            .field("has_events", &self.events.is_some())
            .finish()
    }
}

/// Result of applying a command to a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The state changed
    Applied { from: CallState, to: CallState },
    /// A media command was forwarded; state unchanged
    Forwarded,
    /// The command is not legal in the current state and was dropped
    Ignored { state: CallState, command: CommandKind },
}

impl TransitionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, TransitionOutcome::Applied { .. })
    }
}

/// Result of terminal cleanup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeardownOutcome {
    /// Teardown already ran; nothing happened
    AlreadyDestroyed,
    /// Teardown ran now
    Completed {
        /// Outcome of releasing the platform connection
        platform: Result<(), PlatformError>,
        /// Whether this call removed the session from the registry
        unregistered: bool,
    },
}

#[derive(Debug)]
struct SessionInner {
    state: CallState,
    remote_address: Option<RemoteAddress>,
    disconnect_cause: Option<DisconnectCause>,
    entered_active_at: Option<DateTime<Utc>>,
    /// Set, under this lock, by whichever call will run teardown
    teardown_claimed: bool,
}

/// A single call
pub struct CallSession {
    key: String,
    direction: CallDirection,
    created_at: DateTime<Utc>,
    inner: Mutex<SessionInner>,
    destroyed: AtomicBool,
    context: SessionContext,
}

impl CallSession {
    /// Create a session in `Initializing`
    pub fn new(key: impl Into<String>, direction: CallDirection, context: SessionContext) -> Self {
        let key = key.into();
        debug!("CallSession {} created ({:?})", key, direction);
        Self {
            key,
            direction,
            created_at: Utc::now(),
            inner: Mutex::new(SessionInner {
                state: CallState::Initializing,
                remote_address: None,
                disconnect_cause: None,
                entered_active_at: None,
                teardown_claimed: false,
            }),
            destroyed: AtomicBool::new(false),
            context,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn direction(&self) -> CallDirection {
        self.direction
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn state(&self) -> CallState {
        self.inner.lock().state
    }

    pub fn is_terminal(&self) -> bool {
        self.state().is_terminal()
    }

    /// Whether teardown has run
    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::Acquire)
    }

    pub fn remote_address(&self) -> Option<RemoteAddress> {
        self.inner.lock().remote_address.clone()
    }

    /// Set once, when the session enters `Disconnected`
    pub fn disconnect_cause(&self) -> Option<DisconnectCause> {
        self.inner.lock().disconnect_cause
    }

    /// First time the session became `Active`
    pub fn entered_active_at(&self) -> Option<DateTime<Utc>> {
        self.inner.lock().entered_active_at
    }

    /// Attach the remote address and pass it on to the platform connection.
    ///
    /// A platform failure is logged; the address is kept locally either way.
    pub fn set_address(&self, address: RemoteAddress) -> Result<(), PlatformError> {
        let result = self.context.platform.set_address(&self.key, &address.raw);
        if let Err(e) = &result {
            warn!("Failed to set address on connection {}: {}", self.key, e);
        }
        self.inner.lock().remote_address = Some(address);
        result
    }

    /// Apply a command through the state table.
    pub fn apply(&self, command: SessionCommand) -> TransitionOutcome {
        self.apply_with_teardown(command).0
    }

    fn apply_with_teardown(
        &self,
        command: SessionCommand,
    ) -> (TransitionOutcome, Option<TeardownOutcome>) {
        let (from, to, transition, owns_teardown) = {
            let mut inner = self.inner.lock();
            let from = inner.state;

            let Some(transition) = self.context.table.get(from, command.kind()).cloned() else {
                debug!("Session {} ignoring {:?} in state {}", self.key, command, from);
                return (TransitionOutcome::Ignored { state: from, command: command.kind() }, None);
            };

            let to = match transition.next_state {
                Some(_) if from.is_terminal() => {
                    return (TransitionOutcome::Ignored { state: from, command: command.kind() }, None);
                }
                Some(next) => {
                    inner.state = next;
                    if next.is_terminal() {
                        inner.disconnect_cause = Some(
                            transition
                                .cause
                                .or(command.cause())
                                .unwrap_or(DisconnectCause::Unspecified),
                        );
                    }
                    if next == CallState::Active && inner.entered_active_at.is_none() {
                        inner.entered_active_at = Some(Utc::now());
                    }
                    Some(next)
                }
                None => None,
            };

            // The call that makes the terminal transition owns teardown, so
            // the platform hears the final state before it is destroyed.
            let owns_teardown = transition.actions.contains(&Action::Destroy)
                && !std::mem::replace(&mut inner.teardown_claimed, true);
            (from, to, transition, owns_teardown)
        };

        // The lock is released before calling out so the platform may call
        // back into this session from its handlers.
        if let Some(to) = to {
            debug!("Session {} state: {} -> {} ({:?})", self.key, from, to, command);
            self.publish(SessionEvent::StateChanged {
                key: self.key.clone(),
                old_state: from,
                new_state: to,
            });
        }

        let mut teardown = None;
        for action in &transition.actions {
            match action {
                Action::SignalState => {
                    if let Some(to) = to {
                        self.signal_platform(to);
                    }
                }
                Action::ForwardMedia => self.forward_media(command),
                Action::Destroy if owns_teardown => teardown = Some(self.teardown()),
                Action::Destroy => {}
            }
        }

        let outcome = match to {
            Some(to) => TransitionOutcome::Applied { from, to },
            None => TransitionOutcome::Forwarded,
        };
        (outcome, teardown)
    }

    pub fn answer(&self) -> TransitionOutcome {
        self.apply(SessionCommand::Answer)
    }

    pub fn reject(&self) -> TransitionOutcome {
        self.apply(SessionCommand::Reject)
    }

    pub fn disconnect(&self, cause: DisconnectCause) -> TransitionOutcome {
        self.apply(SessionCommand::Disconnect(cause))
    }

    pub fn hold(&self) -> TransitionOutcome {
        self.apply(SessionCommand::Hold)
    }

    pub fn unhold(&self) -> TransitionOutcome {
        self.apply(SessionCommand::Unhold)
    }

    pub fn abort(&self) -> TransitionOutcome {
        self.apply(SessionCommand::Abort)
    }

    pub fn play_tone(&self, digit: char) -> TransitionOutcome {
        self.apply(SessionCommand::PlayTone(digit))
    }

    pub fn stop_tone(&self) -> TransitionOutcome {
        self.apply(SessionCommand::StopTone)
    }

    pub fn start_rtt(&self) -> TransitionOutcome {
        self.apply(SessionCommand::StartRtt)
    }

    pub fn stop_rtt(&self) -> TransitionOutcome {
        self.apply(SessionCommand::StopRtt)
    }

    /// Terminal cleanup. Idempotent.
    ///
    /// A live session is first moved to `Disconnected(Unspecified)`, which
    /// runs teardown as part of the transition. Once another call has made
    /// the terminal transition, teardown is that call's job and this returns
    /// `AlreadyDestroyed` without touching the platform.
    pub fn destroy(&self) -> TeardownOutcome {
        self.end_with(DisconnectCause::Unspecified)
    }

    /// Remote hangup: disconnect with `Remote` and tear down.
    ///
    /// Teardown always unregisters, so on return the entry is gone or about
    /// to be removed by the call that owns teardown.
    pub fn finish_and_cleanup(&self) -> TeardownOutcome {
        self.end_with(DisconnectCause::Remote)
    }

    fn end_with(&self, cause: DisconnectCause) -> TeardownOutcome {
        match self.apply_with_teardown(SessionCommand::Disconnect(cause)) {
            (_, Some(outcome)) => outcome,
            (_, None) => self.claim_teardown(),
        }
    }

    /// Run teardown unless some call already claimed it. Covers tables whose
    /// terminal transitions carry no `Destroy` action.
    fn claim_teardown(&self) -> TeardownOutcome {
        let claimed = std::mem::replace(&mut self.inner.lock().teardown_claimed, true);
        if claimed {
            return TeardownOutcome::AlreadyDestroyed;
        }
        self.teardown()
    }

    fn teardown(&self) -> TeardownOutcome {
        if self.destroyed.swap(true, Ordering::AcqRel) {
            return TeardownOutcome::AlreadyDestroyed;
        }

        let platform = self.context.platform.destroy(&self.key);
        if let Err(e) = &platform {
            warn!("Error during teardown of {}: {}", self.key, e);
        }

        // Runs regardless of the platform outcome
        let registry = self.context.registry.upgrade();
        let emptied = registry
            .as_ref()
            .and_then(|registry| registry.detach_session(&self.key, self));
        let unregistered = emptied.is_some();

        let cause = self.disconnect_cause().unwrap_or(DisconnectCause::Unspecified);
        let replaced = !unregistered
            && registry
                .as_ref()
                .is_some_and(|registry| registry.is_held_by_other(&self.key, self));
        if replaced {
            // The key now belongs to the replacement; announcing it would end
            // the wrong call
            debug!("Session {} was replaced, not announcing its end", self.key);
        } else {
            self.publish(SessionEvent::SessionFinished {
                key: self.key.clone(),
                cause,
            });
        }

        if let (Some(registry), Some(true)) = (&registry, emptied) {
            registry.announce_all_ended();
        }
        debug!("Session {} torn down (cause: {})", self.key, cause);

        TeardownOutcome::Completed {
            platform,
            unregistered,
        }
    }

    fn signal_platform(&self, state: CallState) {
        let signal = match state {
            CallState::Initializing => ConnectionSignal::Initializing,
            CallState::Dialing => ConnectionSignal::Dialing,
            CallState::Ringing => ConnectionSignal::Ringing,
            CallState::Active => ConnectionSignal::Active,
            CallState::Held => ConnectionSignal::Held,
            CallState::Disconnected => ConnectionSignal::Disconnected(
                self.disconnect_cause().unwrap_or(DisconnectCause::Unspecified),
            ),
        };
        if let Err(e) = self.context.platform.signal(&self.key, signal) {
            warn!("Failed to signal {} to platform for {}: {}", state, self.key, e);
        }
    }

    fn forward_media(&self, command: SessionCommand) {
        let request = match command {
            SessionCommand::PlayTone(digit) => MediaRequest::PlayTone(digit),
            SessionCommand::StopTone => MediaRequest::StopTone,
            SessionCommand::StartRtt => MediaRequest::StartRtt,
            SessionCommand::StopRtt => MediaRequest::StopRtt,
            other => {
                warn!("Session {}: {:?} is not a media command", self.key, other);
                return;
            }
        };
        debug!("Session {} media: {:?}", self.key, request);
        if let Err(e) = self.context.platform.media(&self.key, request) {
            warn!("Failed to forward {:?} for {}: {}", request, self.key, e);
        }
    }

    fn publish(&self, event: SessionEvent) {
        if let Some(events) = &self.context.events {
            events.publish(event);
        }
    }
}

impl fmt::Debug for CallSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("CallSession")
            .field("key", &self.key)
            .field("direction", &self.direction)
            .field("state", &inner.state)
            .field("remote_address", &inner.remote_address)
            .field("disconnect_cause", &inner.disconnect_cause)
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}
