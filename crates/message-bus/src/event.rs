//! # Publish/Subscribe Channel
//!
//! The fire-and-forget leg of the bus. Publishing an event hands it to the
//! subscriber's channel and returns; there is no reply and no correlation.
//! The delivery assumption is at-least-once, so subscribers must treat a
//! duplicate event as a possibility, not a bug.

use tokio::sync::mpsc;

use crate::error::BusError;

/// The publishing side of an event channel. Cheap to clone.
pub struct EventPublisher<E> {
    sender: mpsc::Sender<E>,
}

impl<E> Clone for EventPublisher<E> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<E> EventPublisher<E> {
    /// Delivers `event` to the subscriber. The only failure mode is a
    /// subscriber that has shut down.
    pub async fn publish(&self, event: E) -> Result<(), BusError> {
        self.sender.send(event).await.map_err(|_| BusError::Closed)
    }
}

/// The subscribing side of an event channel.
pub struct EventStream<E> {
    receiver: mpsc::Receiver<E>,
}

impl<E> EventStream<E> {
    /// Waits for the next event; `None` once every publisher is dropped.
    pub async fn next(&mut self) -> Option<E> {
        self.receiver.recv().await
    }
}

/// Creates a connected publisher/stream pair.
pub fn event_channel<E>(capacity: usize) -> (EventPublisher<E>, EventStream<E>) {
    let (sender, receiver) = mpsc::channel(capacity);
    (EventPublisher { sender }, EventStream { receiver })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_arrive_in_publish_order() {
        let (publisher, mut stream) = event_channel::<u32>(8);

        publisher.publish(1).await.unwrap();
        publisher.publish(2).await.unwrap();

        assert_eq!(stream.next().await, Some(1));
        assert_eq!(stream.next().await, Some(2));
    }

    #[tokio::test]
    async fn publish_fails_once_subscriber_is_gone() {
        let (publisher, stream) = event_channel::<u32>(8);
        drop(stream);

        assert!(matches!(publisher.publish(1).await, Err(BusError::Closed)));
    }

    #[tokio::test]
    async fn stream_ends_when_publishers_are_dropped() {
        let (publisher, mut stream) = event_channel::<u32>(8);
        publisher.publish(7).await.unwrap();
        drop(publisher);

        assert_eq!(stream.next().await, Some(7));
        assert_eq!(stream.next().await, None);
    }
}
