pub mod bus;
pub mod store;
pub mod types;

pub use crate::bus::EventBus;
pub use crate::store::{AppendOutcome, EventStore, RateLimitPolicy};
pub use crate::types::{EventId, EventRecord, StoreUpdate};
