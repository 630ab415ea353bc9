//! Session Registry
//!
//! Concurrent key → session store; the single source of truth for which
//! call sessions exist. One instance is owned by the composition root and
//! shared by `Arc` with the session factory, every session (weakly) and the
//! command dispatcher.

use crate::events::{SessionEvent, SessionEventPublisher};
use crate::session::CallSession;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Counters describing registry activity since creation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Sessions currently registered
    pub active: usize,
    /// Successful `register` calls
    pub total_registered: usize,
    /// Entries removed by `unregister`, teardown or `clear`
    pub total_removed: usize,
    /// `register` calls that replaced an existing entry
    pub key_collisions: usize,
}

#[derive(Debug, Default)]
struct Counters {
    registered: AtomicUsize,
    removed: AtomicUsize,
    collisions: AtomicUsize,
}

/// Registry of live call sessions
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: DashMap<String, Arc<CallSession>>,
    /// Registered entries; decides when the registry became empty
    live: AtomicUsize,
    counters: Counters,
    events: Option<SessionEventPublisher>,
}

impl SessionRegistry {
    /// Create an empty registry that publishes no events
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry that publishes [`SessionEvent::AllCallsEnded`]
    /// whenever its last entry is removed
    pub fn with_events(events: SessionEventPublisher) -> Self {
        Self {
            events: Some(events),
            ..Self::default()
        }
    }

    /// Register a session under `key`.
    ///
    /// An empty key is ignored. An existing entry for the same key is
    /// replaced (last writer wins); that indicates a key collision and is
    /// logged as a warning.
    pub fn register(&self, key: &str, session: Arc<CallSession>) {
        if key.is_empty() {
            debug!("Ignoring registration with empty key");
            return;
        }

        // Counted before the insert so `live` never drops below the map size
        self.live.fetch_add(1, Ordering::AcqRel);
        if let Some(previous) = self.sessions.insert(key.to_string(), session) {
            self.live.fetch_sub(1, Ordering::AcqRel);
            self.counters.collisions.fetch_add(1, Ordering::Relaxed);
            warn!(
                "Session key collision: {} replaced an existing session in state {}",
                key,
                previous.state()
            );
        }
        self.counters.registered.fetch_add(1, Ordering::Relaxed);
        debug!("Registered session for key={}", key);
    }

    /// Look up a session by key
    pub fn lookup(&self, key: &str) -> Option<Arc<CallSession>> {
        self.sessions.get(key).map(|entry| Arc::clone(entry.value()))
    }

    /// Remove the entry for `key`. Absent or `None` keys are a no-op.
    pub fn unregister<'a>(&self, key: impl Into<Option<&'a str>>) -> Option<Arc<CallSession>> {
        let key = key.into()?;
        let (_, removed) = self.sessions.remove(key)?;
        if self.release(key) {
            self.announce_all_ended();
        }
        Some(removed)
    }

    /// Remove the entry for `key` only if it still refers to `session`, so
    /// that a session replaced after a key collision cannot evict its
    /// replacement. Announcing `AllCallsEnded` is left to the caller.
    ///
    /// Returns `None` when nothing was removed, otherwise whether the
    /// registry became empty.
    pub(crate) fn detach_session(&self, key: &str, session: &CallSession) -> Option<bool> {
        let removed = self
            .sessions
            .remove_if(key, |_, current| std::ptr::eq(Arc::as_ptr(current), session))
            .is_some();
        if removed {
            Some(self.release(key))
        } else {
            debug!("Session {} was no longer registered at teardown", key);
            None
        }
    }

    /// Whether `key` is held by a session other than `session`
    pub(crate) fn is_held_by_other(&self, key: &str, session: &CallSession) -> bool {
        self.sessions
            .get(key)
            .is_some_and(|entry| !std::ptr::eq(Arc::as_ptr(entry.value()), session))
    }

    pub(crate) fn announce_all_ended(&self) {
        debug!("Registry empty, all calls ended");
        self.publish(SessionEvent::AllCallsEnded);
    }

    /// Remove every entry. Used at process teardown.
    pub fn clear(&self) {
        let mut emptied = false;
        let mut count = 0usize;
        for key in self.keys() {
            if self.sessions.remove(&key).is_some() {
                count += 1;
                emptied |= self.release(&key);
            }
        }
        debug!("Cleared {} sessions", count);
        if emptied {
            self.announce_all_ended();
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.sessions.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Keys of all registered sessions, in no particular order
    pub fn keys(&self) -> Vec<String> {
        self.sessions.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            active: self.sessions.len(),
            total_registered: self.counters.registered.load(Ordering::Relaxed),
            total_removed: self.counters.removed.load(Ordering::Relaxed),
            key_collisions: self.counters.collisions.load(Ordering::Relaxed),
        }
    }

    /// Account for one removed entry. Exactly one removal observes the
    /// transition to empty, however many race.
    fn release(&self, key: &str) -> bool {
        self.counters.removed.fetch_add(1, Ordering::Relaxed);
        debug!("Unregistered session for key={}", key);
        self.live.fetch_sub(1, Ordering::AcqRel) == 1
    }

    fn publish(&self, event: SessionEvent) {
        if let Some(events) = &self.events {
            events.publish(event);
        }
    }
}
