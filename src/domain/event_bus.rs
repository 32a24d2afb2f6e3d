//! Broadcast channel for client-side notifications.
//!
//! [`EventBus`] wraps a [`tokio::sync::broadcast`] channel. The transport
//! publishes every inbound [`crate::ws::TransportEvent`] through one bus and
//! the session store publishes every [`super::StoreChange`] through another.
//! Consumers hold a [`Subscription`] for as long as they want to listen.

use tokio::sync::broadcast;

/// Broadcast bus for cloneable events.
///
/// Backed by a `tokio::broadcast` channel with a configurable capacity.
/// When the ring buffer is full, the oldest events are dropped for lagging
/// receivers.
#[derive(Debug)]
pub struct EventBus<E> {
    sender: broadcast::Sender<E>,
}

impl<E: Clone> EventBus<E> {
    /// Creates a new `EventBus` with the given channel capacity.
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of receivers that received the event.
    /// If there are no active receivers, the event is silently dropped.
    pub fn publish(&self, event: E) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Creates a new subscription that will receive all future events.
    #[must_use]
    pub fn subscribe(&self) -> Subscription<E> {
        Subscription::new(self.sender.subscribe())
    }

    /// Returns the current number of active subscriptions.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<E> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

/// Scoped listener on an [`EventBus`].
///
/// Dropping the subscription unsubscribes it; there is no separate
/// teardown call to forget.
#[derive(Debug)]
pub struct Subscription<E> {
    receiver: broadcast::Receiver<E>,
}

impl<E: Clone> Subscription<E> {
    fn new(receiver: broadcast::Receiver<E>) -> Self {
        Self { receiver }
    }

    /// Waits for the next event.
    ///
    /// Returns `None` once every publisher is gone. Events lost to lag are
    /// logged and skipped.
    pub async fn recv(&mut self) -> Option<E> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(lagged = n, "subscriber lagged behind event bus");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Returns the next already-published event without waiting.
    pub fn try_recv(&mut self) -> Option<E> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    tracing::warn!(lagged = n, "subscriber lagged behind event bus");
                }
                Err(
                    broadcast::error::TryRecvError::Empty | broadcast::error::TryRecvError::Closed,
                ) => return None,
            }
        }
    }

    /// Drains every already-published event.
    pub fn drain(&mut self) -> Vec<E> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}
