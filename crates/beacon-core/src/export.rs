use beacon_events::EventRecord;
use serde_json::Value;

const HEADER: &str = "Event Type,Timestamp,Data";

/// Renders the event log as CSV: type, RFC 3339 timestamp, JSON-encoded
/// data. Fields containing commas, quotes, or newlines are quoted per
/// RFC 4180 (the data column always is, since it holds JSON).
pub fn to_csv(events: &[EventRecord]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for event in events {
        out.push_str(&escape(&event.event_type));
        out.push(',');
        out.push_str(&escape(&event.at.to_rfc3339()));
        out.push(',');
        out.push_str(&escape(&Value::Object(event.data.clone()).to_string()));
        out.push('\n');
    }
    out
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
