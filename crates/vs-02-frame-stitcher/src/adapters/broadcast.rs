//! Broadcast publisher adapter.
//!
//! Fans scan events out to any number of subscribers. Slow subscribers lag
//! and lose the oldest events; the worker is never blocked.

use crate::ports::outbound::{PublishError, ScanEvent, ScanEventPublisher};
use tokio::sync::broadcast;

/// Publishes scan events on a tokio broadcast channel.
#[derive(Debug, Clone)]
pub struct BroadcastPublisher {
    sender: broadcast::Sender<ScanEvent>,
}

impl BroadcastPublisher {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ScanEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl ScanEventPublisher for BroadcastPublisher {
    fn publish(&self, event: ScanEvent) -> Result<(), PublishError> {
        self.sender
            .send(event)
            .map(|_| ())
            .map_err(|_| PublishError::NoSubscribers)
    }
}
