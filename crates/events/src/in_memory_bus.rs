//! In-process outcome bus.

use tokio::sync::broadcast;

use crate::bus::{EventBus, Subscription};

/// Messages a slow subscription may fall behind by before it starts skipping.
pub const DEFAULT_CAPACITY: usize = 64;

/// In-memory pub/sub bus over a broadcast channel.
///
/// Publishing never blocks and never fails; with no subscriber the message is
/// simply dropped.
#[derive(Debug)]
pub struct InMemoryEventBus<M> {
    sender: broadcast::Sender<M>,
}

impl<M: Clone> InMemoryEventBus<M> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<M: Clone> Default for InMemoryEventBus<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> EventBus<M> for InMemoryEventBus<M>
where
    M: Clone + Send + 'static,
{
    fn publish(&self, message: M) -> usize {
        self.sender.send(message).unwrap_or(0)
    }

    fn subscribe(&self) -> Subscription<M> {
        Subscription::new(self.sender.subscribe())
    }
}
