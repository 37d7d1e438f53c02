//! EventNotifier: single-channel publish/subscribe for mutation events
//!
//! Callbacks run synchronously inside [`EventNotifier::emit`], in registration
//! order. The registry lock is never held while a callback runs, so callbacks
//! may subscribe, unsubscribe or mutate the store without deadlocking.
//!
//! A panicking callback is logged and skipped; the remaining callbacks still
//! run and the panic never reaches the emitter.

use docstore_core::MutationEvent;
use parking_lot::Mutex;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};
use tracing::{error, trace};

/// Subscriber callback
pub type Callback = Arc<dyn Fn(&MutationEvent) + Send + Sync>;

/// Identifies one registered callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(ListenerId, Callback)>,
}

impl Registry {
    fn contains(&self, id: ListenerId) -> bool {
        self.listeners.iter().any(|(lid, _)| *lid == id)
    }
}

/// Mutation event channel
///
/// Cloning yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct EventNotifier {
    registry: Arc<Mutex<Registry>>,
}

impl EventNotifier {
    /// Create a notifier with no listeners
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback; it stays registered until unsubscribed
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&MutationEvent) + Send + Sync + 'static,
    {
        let mut registry = self.registry.lock();
        let id = ListenerId(registry.next_id);
        registry.next_id += 1;
        registry.listeners.push((id, Arc::new(callback)));
        trace!(target: "docstore::events", listener = id.0, "Listener registered");
        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Remove a callback; returns false if it was already gone
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        remove_listener(&self.registry, id)
    }

    /// Deliver `event` to every registered callback
    pub fn emit(&self, event: &MutationEvent) {
        let snapshot: Vec<(ListenerId, Callback)> = self.registry.lock().listeners.clone();
        trace!(
            target: "docstore::events",
            kind = %event.kind,
            id = %event.document_id,
            listeners = snapshot.len(),
            "Emitting event"
        );
        for (id, callback) in snapshot {
            // Skip listeners removed by an earlier callback in this dispatch
            if !self.registry.lock().contains(id) {
                continue;
            }
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| callback(event))) {
                error!(
                    target: "docstore::events",
                    listener = id.0,
                    kind = %event.kind,
                    id = %event.document_id,
                    panic = %panic_message(payload.as_ref()),
                    "Listener panicked; continuing with remaining listeners"
                );
            }
        }
    }

    /// Number of registered callbacks
    pub fn listener_count(&self) -> usize {
        self.registry.lock().listeners.len()
    }
}

impl std::fmt::Debug for EventNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventNotifier")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

fn remove_listener(registry: &Mutex<Registry>, id: ListenerId) -> bool {
    let mut registry = registry.lock();
    let before = registry.listeners.len();
    registry.listeners.retain(|(lid, _)| *lid != id);
    let removed = registry.listeners.len() != before;
    if removed {
        trace!(target: "docstore::events", listener = id.0, "Listener removed");
    }
    removed
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Disposer for a registered callback
///
/// Dropping the handle does NOT unsubscribe; call [`Subscription::unsubscribe`].
#[derive(Debug, Clone)]
pub struct Subscription {
    id: ListenerId,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// Id of the underlying listener
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Stop receiving events. Idempotent.
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            remove_listener(&registry, self.id);
        }
    }

    /// Whether the callback is still registered
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .map(|registry| registry.lock().contains(self.id))
            .unwrap_or(false)
    }
}
