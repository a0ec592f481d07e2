use serde_json::{Map, Value};
use tracing::info;

/// Port for the external analytics endpoint.
///
/// Delivery is fire-and-forget: no return value, no acknowledgement, no
/// retry. Whether a sink is bound at all is a capability the tracker checks
/// per call; absence is a normal condition. The sink's own transport is out
/// of scope here.
pub trait AnalyticsSink: Send + Sync {
    fn deliver(&self, event_type: &str, data: &Map<String, Value>);
}

/// Stand-in sink that logs each delivery, used by the demo session.
#[derive(Debug, Default)]
pub struct LogSink;

impl AnalyticsSink for LogSink {
    fn deliver(&self, event_type: &str, data: &Map<String, Value>) {
        info!(event_type, data = %serde_json::Value::Object(data.clone()), "delivered to analytics sink");
    }
}
