use beacon_events::EventRecord;
use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

const TOP_EVENTS: usize = 5;
const RECENT_EVENTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TypeCount {
    pub event_type: String,
    pub count: usize,
}

/// Aggregate view of the event log, as shown on the analytics panel.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct EventSummary {
    pub total_events: usize,
    pub unique_event_types: usize,
    pub counts: BTreeMap<String, usize>,
    /// Up to five types, ordered by descending count (ties by name).
    pub top_events: Vec<TypeCount>,
    /// Up to five most recent events, newest first.
    pub recent: Vec<EventRecord>,
}

pub fn summarize(events: &[EventRecord]) -> EventSummary {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for event in events {
        *counts.entry(event.event_type.clone()).or_insert(0) += 1;
    }

    let mut top: Vec<TypeCount> = counts
        .iter()
        .map(|(event_type, count)| TypeCount {
            event_type: event_type.clone(),
            count: *count,
        })
        .collect();
    top.sort_by(|a, b| b.count.cmp(&a.count).then(a.event_type.cmp(&b.event_type)));
    top.truncate(TOP_EVENTS);

    let recent: Vec<EventRecord> = events.iter().rev().take(RECENT_EVENTS).cloned().collect();

    EventSummary {
        total_events: events.len(),
        unique_event_types: counts.len(),
        counts,
        top_events: top,
        recent,
    }
}
