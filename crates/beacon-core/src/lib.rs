pub mod config;
pub mod error;
pub mod export;
pub mod sink;
pub mod summary;
pub mod tracker;

pub use crate::config::BeaconConfig;
pub use crate::error::BeaconError;
pub use crate::sink::AnalyticsSink;
pub use crate::tracker::Tracker;
