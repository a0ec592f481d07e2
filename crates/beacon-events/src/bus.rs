use crate::types::StoreUpdate;
use tokio::sync::broadcast;

/// Broadcast channel carrying store change notifications to UI consumers.
///
/// Lossy by construction: a receiver that lags past the channel capacity
/// misses updates and should re-read the store snapshot.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<StoreUpdate>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreUpdate> {
        self.sender.subscribe()
    }

    /// Publishes an update, returning the number of live subscribers it
    /// reached. Zero subscribers is a normal condition, not an error.
    pub fn publish(&self, update: StoreUpdate) -> usize {
        self.sender.send(update).unwrap_or(0)
    }
}
