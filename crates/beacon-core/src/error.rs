use thiserror::Error;

/// Errors at the configuration and IO boundary. The tracking paths proper
/// (`Tracker::track`, store append/clear) cannot fail: rate-limit drops and
/// sink absence are policy, reported on the diagnostic channel only.
#[derive(Debug, Error)]
pub enum BeaconError {
    #[error("config error: {message}")]
    Config { message: String },
}
