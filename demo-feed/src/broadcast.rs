//! Fan-out of JSON text messages to WebSocket clients.
//!
//! One producer publishes each message once; every connected client holds a
//! subscriber. Slow clients that fall behind skip messages instead of
//! stalling the producer.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};

/// A message ready for sending, shared between subscribers.
pub type FeedMessage = Arc<str>;

/// Broadcaster for one feed (metrics or camera).
#[derive(Debug, Clone)]
pub struct FeedBroadcaster {
    tx: broadcast::Sender<FeedMessage>,
}

impl FeedBroadcaster {
    /// Create a new broadcaster with the given channel capacity.
    ///
    /// Capacity is how many messages can queue before lagging clients skip.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish a message to all subscribers.
    ///
    /// Returns the number of active subscribers, or 0 if none.
    pub fn publish(&self, message: impl Into<FeedMessage>) -> usize {
        self.tx.send(message.into()).unwrap_or(0)
    }

    /// Serialize and publish a value.
    pub fn publish_json<T: serde::Serialize>(&self, value: &T) -> serde_json::Result<usize> {
        let text = serde_json::to_string(value)?;
        Ok(self.publish(text))
    }

    pub fn subscribe(&self) -> FeedSubscriber {
        FeedSubscriber {
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for FeedBroadcaster {
    fn default() -> Self {
        Self::new(16)
    }
}

/// A subscriber to one feed.
pub struct FeedSubscriber {
    rx: broadcast::Receiver<FeedMessage>,
}

impl FeedSubscriber {
    /// Stream of messages, skipping any lost to lag.
    pub fn into_stream(self) -> impl Stream<Item = FeedMessage> {
        BroadcastStream::new(self.rx).filter_map(|result| match result {
            Ok(message) => Some(message),
            Err(e) => {
                // Lagged: the client missed some messages, keep going
                tracing::debug!("subscriber skipped messages: {e}");
                None
            }
        })
    }
}
