//! Listener registry and synchronous fan-out

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, OnceLock, RwLock};

use super::event::ExecutionEvent;

static GLOBAL: OnceLock<Arc<EventBus>> = OnceLock::new();

/// Receives lifecycle events.
///
/// Called from worker threads, possibly for several units at once.
pub trait ExecutionEventListener: Send + Sync {
    fn on_event(&self, event: &ExecutionEvent);
}

impl<F> ExecutionEventListener for F
where
    F: Fn(&ExecutionEvent) + Send + Sync,
{
    fn on_event(&self, event: &ExecutionEvent) {
        self(event)
    }
}

/// Fixed list of listeners, invoked in registration order
#[derive(Default)]
pub struct EventBus {
    listeners: RwLock<Vec<Arc<dyn ExecutionEventListener>>>,
}

impl EventBus {
    /// Create an empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-scoped bus
    pub fn global() -> Arc<EventBus> {
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(EventBus::new())))
    }

    /// Register a listener
    pub fn register(&self, listener: Arc<dyn ExecutionEventListener>) {
        match self.listeners.write() {
            Ok(mut listeners) => listeners.push(listener),
            Err(poisoned) => poisoned.into_inner().push(listener),
        }
    }

    /// Remove every listener
    pub fn clear(&self) {
        match self.listeners.write() {
            Ok(mut listeners) => listeners.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.snapshot().len()
    }

    /// Deliver `event` to every listener on the calling thread.
    ///
    /// A panicking listener is logged and skipped; the remaining listeners
    /// still receive the event.
    pub fn post(&self, event: &ExecutionEvent) {
        for listener in self.snapshot() {
            let delivered = panic::catch_unwind(AssertUnwindSafe(|| listener.on_event(event)));
            if delivered.is_err() {
                tracing::warn!(
                    event_id = %event.id(),
                    event_type = %event.event_type(),
                    data_source = event.data_source_name(),
                    "execution event listener panicked"
                );
            }
        }
    }

    // Listeners may register others while being notified, so the lock is
    // never held during delivery.
    fn snapshot(&self) -> Vec<Arc<dyn ExecutionEventListener>> {
        match self.listeners.read() {
            Ok(listeners) => listeners.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}
