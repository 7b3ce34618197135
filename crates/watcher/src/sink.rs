//! Event delivery
//!
//! The scan loop writes events through an [`EventSink`]. The default sink is
//! a rendezvous channel: [`ChannelSink::emit`] does not return until the
//! caller's [`EventStream`] has received the event.

use crate::error::{Result, WatchError};
use crate::event::WatchEvent;
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

/// Consumer of ordered watch events
///
/// `emit` may wait for the consumer; the scan loop does not continue until it
/// returns.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: WatchEvent) -> Result<()>;
}

/// An event in flight, acknowledged when the stream takes it
type Delivery = (WatchEvent, oneshot::Sender<()>);

/// Sink whose sends complete only once the consumer has received the event
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<Delivery>,
}

/// Consuming end of a [`ChannelSink`]
#[derive(Debug)]
pub struct EventStream {
    rx: mpsc::Receiver<Delivery>,
}

/// Create a connected sink and stream
pub fn channel() -> (ChannelSink, EventStream) {
    // One slot for the hand-off; the sender still waits for the ack
    let (tx, rx) = mpsc::channel(1);
    (ChannelSink { tx }, EventStream { rx })
}

#[async_trait]
impl EventSink for ChannelSink {
    async fn emit(&self, event: WatchEvent) -> Result<()> {
        let (ack_tx, ack_rx) = oneshot::channel();

        self.tx
            .send((event, ack_tx))
            .await
            .map_err(|_| WatchError::SinkClosed)?;

        // Dropped unacknowledged when the stream goes away with it queued
        ack_rx.await.map_err(|_| WatchError::SinkClosed)
    }
}

impl EventStream {
    /// Wait for the next event; `None` once every sink has been dropped
    pub async fn recv(&mut self) -> Option<WatchEvent> {
        let (event, ack) = self.rx.recv().await?;
        let _ = ack.send(());
        Some(event)
    }

    /// Take an event whose sender is already waiting, without blocking
    pub fn try_recv(&mut self) -> Option<WatchEvent> {
        let (event, ack) = self.rx.try_recv().ok()?;
        let _ = ack.send(());
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::{sleep, timeout};

    #[tokio::test]
    async fn test_events_arrive_in_order() {
        let (sink, mut stream) = channel();

        let producer = tokio::spawn(async move {
            sink.emit(WatchEvent::created("a")).await.unwrap();
            sink.emit(WatchEvent::removed("b")).await.unwrap();
        });

        assert_eq!(stream.recv().await, Some(WatchEvent::created("a")));
        assert_eq!(stream.recv().await, Some(WatchEvent::removed("b")));
        producer.await.unwrap();

        assert_eq!(stream.recv().await, None);
    }

    #[tokio::test]
    async fn test_emit_completes_only_after_recv() {
        let (sink, mut stream) = channel();

        let pending = tokio::spawn(async move { sink.emit(WatchEvent::created("a")).await });

        sleep(Duration::from_millis(50)).await;
        assert!(
            !pending.is_finished(),
            "emit returned before the consumer received"
        );

        assert_eq!(stream.recv().await, Some(WatchEvent::created("a")));
        timeout(Duration::from_secs(2), pending)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_emit_without_consumer_never_completes() {
        let (sink, _stream) = channel();

        let result = timeout(
            Duration::from_millis(50),
            sink.emit(WatchEvent::created("a")),
        )
        .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_try_recv_acknowledges_waiting_sender() {
        let (sink, mut stream) = channel();
        assert_eq!(stream.try_recv(), None);

        let pending = tokio::spawn(async move { sink.emit(WatchEvent::removed("z")).await });
        sleep(Duration::from_millis(20)).await;

        assert_eq!(stream.try_recv(), Some(WatchEvent::removed("z")));
        timeout(Duration::from_secs(2), pending)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_emit_fails_after_stream_dropped() {
        let (sink, stream) = channel();
        drop(stream);

        let result = sink.emit(WatchEvent::created("a")).await;
        assert!(matches!(result, Err(WatchError::SinkClosed)));
    }

    #[tokio::test]
    async fn test_stream_dropped_while_emit_waits() {
        let (sink, stream) = channel();

        let pending = tokio::spawn(async move { sink.emit(WatchEvent::created("a")).await });
        sleep(Duration::from_millis(20)).await;
        drop(stream);

        let result = timeout(Duration::from_secs(2), pending)
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(result, Err(WatchError::SinkClosed)));
    }

    #[tokio::test]
    async fn test_stream_ends_when_sink_dropped() {
        let (sink, mut stream) = channel();
        drop(sink);

        assert_eq!(stream.recv().await, None);
    }
}
