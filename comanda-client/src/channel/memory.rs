//! In-process snapshot source
//!
//! [`MemoryHub`] plays the role of the realtime backend: it keeps the current
//! contents of each topic and pushes a fresh snapshot to every open feed on
//! each change. Tests use it to inject errors and dropped connections.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::transport::{FeedEvent, SnapshotFeed, SnapshotTransport};
use crate::ChannelError;

type FeedSender = mpsc::UnboundedSender<Result<FeedEvent, ChannelError>>;

#[derive(Default)]
struct TopicState {
    data: Option<Vec<Value>>,
    feeds: Vec<FeedSender>,
    opened: u32,
}

#[derive(Default)]
struct HubInner {
    topics: HashMap<String, TopicState>,
    refuse_connections: bool,
}

/// Shared in-memory snapshot source
#[derive(Clone, Default)]
pub struct MemoryHub {
    inner: Arc<Mutex<HubInner>>,
}

impl std::fmt::Debug for MemoryHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryHub").finish_non_exhaustive()
    }
}

impl MemoryHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport reading from this hub
    pub fn transport(&self) -> MemoryTransport {
        MemoryTransport { hub: self.clone() }
    }

    /// Replace the contents of a topic and push them to every open feed
    pub fn publish(&self, topic: &str, data: Vec<Value>) {
        let mut inner = self.inner.lock();
        let state = inner.topics.entry(topic.to_string()).or_default();
        state.data = Some(data.clone());
        state
            .feeds
            .retain(|feed| feed.send(Ok(FeedEvent::Snapshot(data.clone()))).is_ok());
    }

    /// Current contents of a topic
    pub fn snapshot(&self, topic: &str) -> Option<Vec<Value>> {
        self.inner
            .lock()
            .topics
            .get(topic)
            .and_then(|state| state.data.clone())
    }

    /// Send a non-fatal error to every open feed of a topic
    pub fn publish_error(&self, topic: &str, message: &str) {
        let mut inner = self.inner.lock();
        if let Some(state) = inner.topics.get_mut(topic) {
            state
                .feeds
                .retain(|feed| feed.send(Ok(FeedEvent::Error(message.to_string()))).is_ok());
        }
    }

    /// Break every open feed of a topic
    pub fn drop_connections(&self, topic: &str) {
        let mut inner = self.inner.lock();
        if let Some(state) = inner.topics.get_mut(topic) {
            for feed in state.feeds.drain(..) {
                let _ = feed.send(Err(ChannelError::Connection("connection reset".into())));
            }
        }
    }

    /// Make subsequent `open` calls fail
    pub fn set_refuse_connections(&self, refuse: bool) {
        self.inner.lock().refuse_connections = refuse;
    }

    /// Number of feeds ever opened for a topic
    pub fn connection_count(&self, topic: &str) -> u32 {
        self.inner
            .lock()
            .topics
            .get(topic)
            .map_or(0, |state| state.opened)
    }

    /// Number of feeds still open for a topic
    pub fn open_feeds(&self, topic: &str) -> usize {
        let mut inner = self.inner.lock();
        match inner.topics.get_mut(topic) {
            Some(state) => {
                state.feeds.retain(|feed| !feed.is_closed());
                state.feeds.len()
            }
            None => 0,
        }
    }
}

/// Transport over a [`MemoryHub`]
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    hub: MemoryHub,
}

impl MemoryTransport {
    pub fn new(hub: &MemoryHub) -> Self {
        hub.transport()
    }
}

#[async_trait]
impl SnapshotTransport for MemoryTransport {
    async fn open(&self, topic: &str) -> Result<Box<dyn SnapshotFeed>, ChannelError> {
        let mut inner = self.hub.inner.lock();
        if inner.refuse_connections {
            return Err(ChannelError::Connection("connection refused".into()));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let state = inner.topics.entry(topic.to_string()).or_default();
        state.opened += 1;
        if let Some(data) = &state.data {
            let _ = tx.send(Ok(FeedEvent::Snapshot(data.clone())));
        }
        state.feeds.push(tx);

        Ok(Box::new(MemoryFeed { rx }))
    }
}

struct MemoryFeed {
    rx: mpsc::UnboundedReceiver<Result<FeedEvent, ChannelError>>,
}

#[async_trait]
impl SnapshotFeed for MemoryFeed {
    async fn next_event(&mut self) -> Result<Option<FeedEvent>, ChannelError> {
        match self.rx.recv().await {
            Some(Ok(event)) => Ok(Some(event)),
            Some(Err(e)) => Err(e),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_open_delivers_current_contents() {
        let hub = MemoryHub::new();
        hub.publish("orders", vec![json!({"id": "1"})]);

        let mut feed = hub.transport().open("orders").await.unwrap();
        assert_eq!(
            feed.next_event().await.unwrap(),
            Some(FeedEvent::Snapshot(vec![json!({"id": "1"})]))
        );

        hub.publish_error("orders", "quota exceeded");
        assert_eq!(
            feed.next_event().await.unwrap(),
            Some(FeedEvent::Error("quota exceeded".into()))
        );

        hub.drop_connections("orders");
        assert!(feed.next_event().await.is_err());
        assert_eq!(hub.open_feeds("orders"), 0);
    }

    #[tokio::test]
    async fn test_refused_connections() {
        let hub = MemoryHub::new();
        hub.set_refuse_connections(true);
        assert!(hub.transport().open("orders").await.is_err());
        assert_eq!(hub.connection_count("orders"), 0);
    }
}
