use crate::sink::AnalyticsSink;
use beacon_events::EventStore;
use serde_json::{Map, Value};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::warn;

/// The single entry point application code uses to report an interaction.
///
/// Recording is split in two: the local event store always gets the event
/// first (so the in-app log stays authoritative), then delivery to the
/// external sink is attempted best-effort. Events tracked before a sink is
/// bound are lost to the external system but remain in the local store.
pub struct Tracker {
    store: EventStore,
    sink: RwLock<Option<Arc<dyn AnalyticsSink>>>,
}

impl Tracker {
    pub fn new(store: EventStore) -> Self {
        Self {
            store,
            sink: RwLock::new(None),
        }
    }

    pub fn with_sink(store: EventStore, sink: Arc<dyn AnalyticsSink>) -> Self {
        Self {
            store,
            sink: RwLock::new(Some(sink)),
        }
    }

    /// Binds the sink after construction, for scripts that finish loading
    /// late. Replaces any previously bound sink.
    pub fn bind_sink(&self, sink: Arc<dyn AnalyticsSink>) {
        *self.sink.write().unwrap_or_else(PoisonError::into_inner) = Some(sink);
    }

    pub fn sink_bound(&self) -> bool {
        self.sink
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Records one interaction. Never fails and never blocks the caller on
    /// anything but the synchronous store append and sink call.
    ///
    /// The store append happens first and unconditionally; the sink is then
    /// attempted even when the store's rate-limit gate dropped the event
    /// locally, so external delivery is unaffected by local suppression.
    pub fn track(&self, event_type: &str, data: Map<String, Value>) {
        let sink = self.sink.read().unwrap_or_else(PoisonError::into_inner);
        match sink.as_ref() {
            Some(sink) => {
                self.store.append(event_type, data.clone());
                sink.deliver(event_type, &data);
            }
            None => {
                self.store.append(event_type, data);
                warn!(event_type, "analytics sink is not loaded yet, skipping delivery");
            }
        }
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }
}
