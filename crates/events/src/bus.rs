//! Outcome publishing/subscription abstraction.
//!
//! Purchase outcomes arrive at arbitrary times, independent of any call the
//! application made. Besides the callbacks handed to `init`, any number of
//! consumers (UI badges, analytics, entitlement refreshers) may want to see
//! them. The bus fans each published message out to every live subscription.
//!
//! Delivery is best-effort: a subscription only sees messages published after
//! it was created, and one that falls too far behind skips the oldest ones.

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

/// A subscription to the outcome stream.
///
/// ```ignore
/// let mut subscription = client.subscribe_purchases();
/// while let Some(outcome) = subscription.recv().await {
///     refresh_entitlements(outcome);
/// }
/// ```
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: broadcast::Receiver<M>,
}

impl<M: Clone> Subscription<M> {
    pub fn new(receiver: broadcast::Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Wait for the next message. `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<M> {
        loop {
            match self.receiver.recv().await {
                Ok(message) => return Some(message),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "subscription lagged; oldest outcomes dropped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// The next queued message, if any, without waiting.
    pub fn try_recv(&mut self) -> Option<M> {
        loop {
            match self.receiver.try_recv() {
                Ok(message) => return Some(message),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "subscription lagged; oldest outcomes dropped");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }

    /// Drain everything currently queued.
    pub fn drain(&mut self) -> Vec<M> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}

/// Broadcast pub/sub contract.
pub trait EventBus<M>: Send + Sync {
    /// Publish to every live subscription; returns how many were reached.
    fn publish(&self, message: M) -> usize;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    fn publish(&self, message: M) -> usize {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
