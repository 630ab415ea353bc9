//! Session Factory
//!
//! Entry point for the call-routing collaborator. Derives a stable key for
//! each connection request, builds a [`CallSession`], advances it out of
//! `Initializing` and registers it.

use crate::events::{SessionEvent, SessionEventPublisher};
use crate::platform::PlatformConnection;
use crate::registry::SessionRegistry;
use crate::session::{CallSession, SessionContext};
use crate::state_table::{SessionCommand, StateTable};
use crate::types::{CallDirection, ConnectionRequest, RemoteAddress};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Session factory configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactoryConfig {
    /// When `false` every request is declined so the platform handles the
    /// call itself
    pub manage_connections: bool,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            manage_connections: true,
        }
    }
}

/// Creates and registers call sessions
pub struct SessionFactory {
    registry: Arc<SessionRegistry>,
    context: SessionContext,
    config: FactoryConfig,
    sequence: AtomicU64,
}

impl SessionFactory {
    pub fn new(
        registry: Arc<SessionRegistry>,
        table: Arc<StateTable>,
        platform: Arc<dyn PlatformConnection>,
        events: Option<SessionEventPublisher>,
        config: FactoryConfig,
    ) -> Self {
        let context = SessionContext::new(table, platform, &registry, events);
        Self {
            registry,
            context,
            config,
            sequence: AtomicU64::new(0),
        }
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// Session for a call this process is placing. Starts in `Dialing`.
    pub fn create_outgoing(&self, request: &ConnectionRequest) -> Option<Arc<CallSession>> {
        self.create(request, CallDirection::Outgoing, SessionCommand::Dial)
    }

    /// Session for a call arriving from the network. Starts in `Ringing`.
    pub fn create_incoming(&self, request: &ConnectionRequest) -> Option<Arc<CallSession>> {
        self.create(request, CallDirection::Incoming, SessionCommand::Ring)
    }

    pub fn outgoing_failed(&self, request: &ConnectionRequest) {
        warn!(
            "Outgoing connection failed (address: {:?}, account: {:?})",
            request.address, request.account_id
        );
    }

    pub fn incoming_failed(&self, request: &ConnectionRequest) {
        warn!(
            "Incoming connection failed (address: {:?}, account: {:?})",
            request.address, request.account_id
        );
    }

    /// Pick the session key for a request.
    ///
    /// Priority: non-empty explicit id, then the address's non-empty
    /// scheme-specific part, then `call-<unix-millis>-<sequence>`.
    pub fn derive_key(&self, explicit_id: Option<&str>, address: Option<&RemoteAddress>) -> String {
        if let Some(id) = explicit_id.filter(|id| !id.is_empty()) {
            return id.to_string();
        }
        if let Some(part) = address
            .map(|a| a.scheme_specific_part.as_str())
            .filter(|part| !part.is_empty())
        {
            return part.to_string();
        }
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        format!("call-{}-{}", Utc::now().timestamp_millis(), seq)
    }

    fn create(
        &self,
        request: &ConnectionRequest,
        direction: CallDirection,
        initial: SessionCommand,
    ) -> Option<Arc<CallSession>> {
        if !self.config.manage_connections {
            debug!("Connection management disabled, declining {:?} request", direction);
            return None;
        }

        let address = request.address.as_deref().and_then(|raw| {
            RemoteAddress::parse(raw)
                .map_err(|e| warn!("Proceeding without address: {}", e))
                .ok()
        });
        let key = self.derive_key(request.explicit_id.as_deref(), address.as_ref());

        let session = Arc::new(CallSession::new(key.clone(), direction, self.context.clone()));
        if let Some(address) = address {
            // Failure is logged by the session
            let _ = session.set_address(address);
        }
        session.apply(initial);

        self.registry.register(&key, Arc::clone(&session));
        if let Some(events) = &self.context.events {
            events.publish(SessionEvent::SessionCreated {
                key: key.clone(),
                direction,
                state: session.state(),
            });
        }

        info!("Created {:?} session {} in state {}", direction, key, session.state());
        Some(session)
    }
}
