use crate::bus::EventBus;
use crate::types::{EventId, EventRecord, StoreUpdate};
use chrono::{TimeDelta, Utc};
use serde_json::{Map, Value};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::warn;

const BUS_CAPACITY: usize = 1024;

/// Suppresses bursts of same-type events: once `max_per_window` events of a
/// type have been recorded inside `window`, further ones are dropped until
/// the window slides past them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub window: Duration,
    pub max_per_window: usize,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            window: Duration::from_millis(100),
            max_per_window: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub enum AppendOutcome {
    Appended(EventRecord),
    RateLimited,
}

impl AppendOutcome {
    pub fn is_appended(&self) -> bool {
        matches!(self, Self::Appended(_))
    }
}

/// In-memory, ordered log of recorded events.
///
/// Explicitly constructed and cheap to clone (clones share the same log and
/// bus), so the application root owns one instance and hands it to whoever
/// needs read or write access. All mutation goes through `append`/`clear`;
/// readers take whole-sequence snapshots and never observe a partial append.
#[derive(Clone)]
pub struct EventStore {
    events: Arc<RwLock<Vec<EventRecord>>>,
    bus: EventBus,
    policy: RateLimitPolicy,
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new(RateLimitPolicy::default())
    }
}

impl EventStore {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            events: Arc::new(RwLock::new(Vec::new())),
            bus: EventBus::new(BUS_CAPACITY),
            policy,
        }
    }

    /// Records an event with a fresh id and the current timestamp, unless
    /// the rate-limit gate drops it. O(n) over the stored sequence per call.
    pub fn append(&self, event_type: &str, data: Map<String, Value>) -> AppendOutcome {
        let now = Utc::now();
        // A window too large to represent counts everything as recent.
        let cutoff = TimeDelta::from_std(self.policy.window)
            .ok()
            .and_then(|window| now.checked_sub_signed(window));

        let mut events = self
            .events
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let recent = events
            .iter()
            .filter(|event| {
                event.event_type == event_type && cutoff.is_none_or(|cutoff| event.at > cutoff)
            })
            .count();
        if recent >= self.policy.max_per_window {
            drop(events);
            warn!(
                event_type,
                recent,
                window_ms = self.policy.window.as_millis() as u64,
                "too many events of this type in window, dropping"
            );
            return AppendOutcome::RateLimited;
        }

        let record = EventRecord {
            id: EventId::generate(),
            event_type: event_type.to_string(),
            data,
            at: now,
        };
        events.push(record.clone());
        drop(events);

        self.bus.publish(StoreUpdate::Appended(record.clone()));
        AppendOutcome::Appended(record)
    }

    /// Replaces the sequence with empty. Rate-limit state needs no reset:
    /// the gate recomputes from stored timestamps, of which none remain.
    pub fn clear(&self) {
        self.events
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.bus.publish(StoreUpdate::Cleared);
    }

    /// Consistent ordered copy of the full log, insertion order preserved.
    pub fn snapshot(&self) -> Vec<EventRecord> {
        self.events
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.events
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreUpdate> {
        self.bus.subscribe()
    }

    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }
}
