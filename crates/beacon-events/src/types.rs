use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use ulid::Ulid;
use utoipa::ToSchema;

/// Identifier for a recorded event, formatted as `evt_<ULID>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(transparent)]
#[schema(as = String)]
pub struct EventId(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("invalid prefix: expected {expected}, got {got}")]
    InvalidPrefix { expected: &'static str, got: String },
    #[error("invalid ulid: {value}")]
    InvalidUlid { value: String },
    #[error("invalid id format: {value}")]
    InvalidFormat { value: String },
}

impl EventId {
    pub const PREFIX: &'static str = "evt_";

    pub fn generate() -> Self {
        Self(format!("{}{}", Self::PREFIX, Ulid::new()))
    }

    pub fn new(value: String) -> Result<Self, IdError> {
        let Some(rest) = value.strip_prefix(Self::PREFIX) else {
            let got = value.split('_').next().unwrap_or("").to_string();
            return Err(IdError::InvalidPrefix {
                expected: Self::PREFIX,
                got,
            });
        };
        if rest.len() != 26 {
            return Err(IdError::InvalidFormat {
                value: value.clone(),
            });
        }
        Ulid::from_str(rest).map_err(|_| IdError::InvalidUlid {
            value: value.clone(),
        })?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EventId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl<'de> Deserialize<'de> for EventId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

/// One recorded interaction. Immutable once appended to the store.
///
/// `event_type` is an open category string, not an enum: callers may track
/// any type. `data` is an arbitrary JSON object whose shape varies per type
/// and is never validated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EventRecord {
    pub id: EventId,
    #[serde(rename = "type")]
    pub event_type: String,
    #[schema(value_type = Object)]
    pub data: Map<String, Value>,
    pub at: DateTime<Utc>,
}

/// Change notification published on the store's bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", content = "event", rename_all = "snake_case")]
pub enum StoreUpdate {
    Appended(EventRecord),
    Cleared,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_parses_back() {
        let id = EventId::generate();
        let parsed = EventId::from_str(id.as_str()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_rejects_wrong_prefix() {
        let err = EventId::from_str("task_01ARZ3NDEKTSV4RRFFQ69G5FAV").unwrap_err();
        assert!(matches!(err, IdError::InvalidPrefix { .. }));
    }

    #[test]
    fn test_rejects_short_ulid() {
        let err = EventId::from_str("evt_abc").unwrap_err();
        assert!(matches!(err, IdError::InvalidFormat { .. }));
    }

    #[test]
    fn test_record_serializes_type_field() {
        let record = EventRecord {
            id: EventId::generate(),
            event_type: "page_view".to_string(),
            data: Map::new(),
            at: chrono::Utc::now(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "page_view");
    }
}
