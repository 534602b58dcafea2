//! # Event Bus
//!
//! Delivers engine events to registered listeners on the simulation context.
//!
//! ```text
//! Engine ──dispatch()──► listener 1 ──► listener 2 ──► ...
//! ```
//!
//! Listeners run in registration order. A cancelled inventory click is
//! still handed to later listeners; each decides what to do with it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use itemrenamer_core::{GameEvent, Listener};
use parking_lot::RwLock;

/// Handle returned by [`EventBus::register`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Listener registry.
pub struct EventBus {
    listeners: RwLock<Vec<(ListenerId, Arc<dyn Listener>)>>,
    next_id: AtomicU64,
}

impl EventBus {
    /// Creates a bus with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Adds a listener.
    pub fn register(&self, listener: Arc<dyn Listener>) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        tracing::debug!("Registering listener {} ({:?})", listener.name(), id);
        self.listeners.write().push((id, listener));
        id
    }

    /// Removes a listener. Returns false if the id was not registered.
    pub fn unregister(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write();
        let Some(index) = listeners.iter().position(|(entry, _)| *entry == id) else {
            return false;
        };
        let (_, listener) = listeners.remove(index);
        tracing::debug!("Unregistered listener {} ({:?})", listener.name(), id);
        true
    }

    /// Returns true if the id is currently registered.
    #[must_use]
    pub fn is_registered(&self, id: ListenerId) -> bool {
        self.listeners.read().iter().any(|(entry, _)| *entry == id)
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    /// Delivers an event to every listener now.
    pub fn dispatch(&self, event: &mut GameEvent) {
        // Listeners may register or unregister from inside a callback.
        let listeners: Vec<Arc<dyn Listener>> = self
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in &listeners {
            event.dispatch(listener.as_ref());
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}
