//! Push channel
//!
//! Subscribes to named remote collections and delivers ordered snapshots of
//! their contents. There is at most one upstream feed per topic: repeated
//! subscribes share it, and the feed is torn down when the last consumer
//! unsubscribes.
//!
//! Each topic runs a pump task that reconnects with a fixed backoff and a
//! bounded number of attempts ([`ReconnectPolicy`]). A successful delivery
//! resets the attempt counter.
//!
//! ```text
//! Disconnected ──open──▶ Connecting ──snapshot──▶ Connected
//!       ▲                    │                        │
//!       └──── backoff ◀──────┴──── error / EOF ◀──────┘
//! ```

pub mod memory;
pub mod transport;

pub use memory::{MemoryHub, MemoryTransport};
pub use transport::{FeedEvent, SnapshotFeed, SnapshotTransport, TcpTransport, WireFrame};

use parking_lot::Mutex;
use serde_json::Value;
use shared::error::ErrorCode;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::config::ReconnectPolicy;

/// Connection state of a topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// One delivery of a topic
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotUpdate {
    pub topic: String,
    /// Increases by one with every delivery on the topic
    pub sequence: u64,
    /// Full contents of the collection
    pub data: Vec<Value>,
    /// Set when upstream reported a non-fatal error; `data` is then the last
    /// good snapshot
    pub error: Option<String>,
}

impl SnapshotUpdate {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

struct TopicEntry {
    updates: watch::Sender<Option<SnapshotUpdate>>,
    state: watch::Sender<ConnectionState>,
    consumers: usize,
    cancel: CancellationToken,
}

struct ChannelInner {
    transport: Arc<dyn SnapshotTransport>,
    policy: ReconnectPolicy,
    topics: Mutex<HashMap<String, TopicEntry>>,
    connected: watch::Sender<bool>,
}

/// Snapshot push channel
#[derive(Clone)]
pub struct PushChannel {
    inner: Arc<ChannelInner>,
}

impl std::fmt::Debug for PushChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushChannel")
            .field("policy", &self.inner.policy)
            .field("topics", &self.active_topics())
            .finish_non_exhaustive()
    }
}

impl PushChannel {
    pub fn new(transport: Arc<dyn SnapshotTransport>, policy: ReconnectPolicy) -> Self {
        let (connected, _) = watch::channel(false);
        Self {
            inner: Arc::new(ChannelInner {
                transport,
                policy,
                topics: Mutex::new(HashMap::new()),
                connected,
            }),
        }
    }

    /// Subscribe to a topic, starting its pump if this is the first consumer
    ///
    /// Must be called inside a tokio runtime.
    pub fn subscribe(&self, topic: &str) -> TopicSubscription {
        let mut topics = self.inner.topics.lock();

        if let Some(entry) = topics.get_mut(topic) {
            entry.consumers += 1;
            // The pump gave up after exhausting its retries; start over
            if entry.cancel.is_cancelled() {
                entry.cancel = CancellationToken::new();
                self.spawn_pump(topic, &entry.updates, &entry.state, &entry.cancel);
                tracing::info!(topic, "Restarting topic subscription");
            } else {
                tracing::debug!(topic, consumers = entry.consumers, "Sharing topic subscription");
            }
            return TopicSubscription::new(topic, &entry.updates, &entry.state);
        }

        let (updates, _) = watch::channel(None);
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        let cancel = CancellationToken::new();

        let subscription = TopicSubscription::new(topic, &updates, &state);
        self.spawn_pump(topic, &updates, &state, &cancel);

        topics.insert(
            topic.to_string(),
            TopicEntry {
                updates,
                state,
                consumers: 1,
                cancel,
            },
        );
        tracing::info!(topic, "Subscribed to topic");

        subscription
    }

    fn spawn_pump(
        &self,
        topic: &str,
        updates: &watch::Sender<Option<SnapshotUpdate>>,
        state: &watch::Sender<ConnectionState>,
        cancel: &CancellationToken,
    ) {
        let pump = TopicPump {
            topic: topic.to_string(),
            transport: self.inner.transport.clone(),
            policy: self.inner.policy,
            updates: updates.clone(),
            state: state.clone(),
            connected: self.inner.connected.clone(),
            cancel: cancel.clone(),
        };
        tokio::spawn(pump.run());
    }

    /// Release one consumer of a topic; the feed closes with the last one
    pub fn unsubscribe(&self, topic: &str) {
        let mut topics = self.inner.topics.lock();
        let Some(entry) = topics.get_mut(topic) else {
            return;
        };

        entry.consumers = entry.consumers.saturating_sub(1);
        if entry.consumers == 0 {
            if let Some(entry) = topics.remove(topic) {
                entry.cancel.cancel();
                tracing::info!(topic, "Unsubscribed from topic");
            }
        }
    }

    /// Tear down every topic
    pub fn unsubscribe_all(&self) {
        let drained: Vec<(String, TopicEntry)> = self.inner.topics.lock().drain().collect();
        for (topic, entry) in drained {
            entry.cancel.cancel();
            tracing::debug!(topic = %topic, "Topic closed");
        }
        self.inner.connected.send_replace(false);
    }

    /// True between the first delivery and the next detected disconnect
    pub fn is_connected(&self) -> bool {
        *self.inner.connected.borrow()
    }

    pub fn connected(&self) -> watch::Receiver<bool> {
        self.inner.connected.subscribe()
    }

    /// Connection state of a topic (`Disconnected` when not subscribed)
    pub fn topic_state(&self, topic: &str) -> ConnectionState {
        self.inner
            .topics
            .lock()
            .get(topic)
            .map_or(ConnectionState::Disconnected, |entry| *entry.state.borrow())
    }

    pub fn active_topics(&self) -> Vec<String> {
        let mut topics: Vec<String> = self.inner.topics.lock().keys().cloned().collect();
        topics.sort();
        topics
    }

    pub fn consumer_count(&self, topic: &str) -> usize {
        self.inner
            .topics
            .lock()
            .get(topic)
            .map_or(0, |entry| entry.consumers)
    }
}

/// Consumer handle of a topic
#[derive(Debug, Clone)]
pub struct TopicSubscription {
    topic: String,
    updates: watch::Receiver<Option<SnapshotUpdate>>,
    state: watch::Receiver<ConnectionState>,
}

impl TopicSubscription {
    fn new(
        topic: &str,
        updates: &watch::Sender<Option<SnapshotUpdate>>,
        state: &watch::Sender<ConnectionState>,
    ) -> Self {
        let mut updates = updates.subscribe();
        // A late consumer still sees the snapshot that is already there
        if updates.borrow().is_some() {
            updates.mark_changed();
        }
        Self {
            topic: topic.to_string(),
            updates,
            state: state.subscribe(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Wait for the next delivery
    ///
    /// Returns `None` once the topic has been torn down. Deliveries that
    /// arrive faster than they are consumed collapse into the latest one.
    pub async fn next(&mut self) -> Option<SnapshotUpdate> {
        loop {
            self.updates.changed().await.ok()?;
            let update = self.updates.borrow_and_update().clone();
            if update.is_some() {
                return update;
            }
        }
    }

    /// Latest delivery without waiting
    pub fn latest(&self) -> Option<SnapshotUpdate> {
        self.updates.borrow().clone()
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    pub fn state_changes(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }
}

/// Per-topic connection loop
struct TopicPump {
    topic: String,
    transport: Arc<dyn SnapshotTransport>,
    policy: ReconnectPolicy,
    updates: watch::Sender<Option<SnapshotUpdate>>,
    state: watch::Sender<ConnectionState>,
    connected: watch::Sender<bool>,
    cancel: CancellationToken,
}

/// How a feed ended
enum FeedEnd {
    Cancelled,
    Disconnected { delivered: bool },
}

impl TopicPump {
    async fn run(self) {
        let seed = self.updates.borrow().clone();
        let (mut sequence, mut last_data) = match seed {
            Some(update) => (update.sequence, update.data),
            None => (0, Vec::new()),
        };
        let mut failures = 0u32;

        loop {
            self.set_state(ConnectionState::Connecting);

            let opened = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                result = self.transport.open(&self.topic) => result,
            };

            match opened {
                Ok(mut feed) => {
                    match self.pump(feed.as_mut(), &mut sequence, &mut last_data).await {
                        FeedEnd::Cancelled => break,
                        FeedEnd::Disconnected { delivered } => {
                            if delivered {
                                failures = 0;
                            }
                            self.set_state(ConnectionState::Disconnected);
                            self.connected.send_if_modified(|connected| {
                                std::mem::replace(connected, false)
                            });
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(topic = %self.topic, error = %e, "Failed to open feed");
                    self.set_state(ConnectionState::Disconnected);
                }
            }

            failures += 1;
            if failures > self.policy.max_attempts {
                tracing::error!(
                    topic = %self.topic,
                    code = %ErrorCode::ReconnectExhausted,
                    attempts = self.policy.max_attempts,
                    "Reconnect attempts exhausted, giving up"
                );
                self.cancel.cancel();
                break;
            }

            tracing::warn!(
                topic = %self.topic,
                "Connection lost (attempt {}/{})",
                failures,
                self.policy.max_attempts
            );

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                _ = tokio::time::sleep(self.policy.backoff) => {}
            }
        }

        self.set_state(ConnectionState::Disconnected);
        tracing::debug!(topic = %self.topic, "Topic pump stopped");
    }

    async fn pump(
        &self,
        feed: &mut dyn SnapshotFeed,
        sequence: &mut u64,
        last_data: &mut Vec<Value>,
    ) -> FeedEnd {
        let mut delivered = false;

        loop {
            let event = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return FeedEnd::Cancelled,
                event = feed.next_event() => event,
            };

            match event {
                Ok(Some(FeedEvent::Snapshot(data))) => {
                    delivered = true;
                    *sequence += 1;
                    *last_data = data.clone();
                    self.updates.send_replace(Some(SnapshotUpdate {
                        topic: self.topic.clone(),
                        sequence: *sequence,
                        data,
                        error: None,
                    }));
                    self.set_state(ConnectionState::Connected);
                    self.connected
                        .send_if_modified(|connected| !std::mem::replace(connected, true));
                }
                Ok(Some(FeedEvent::Error(message))) => {
                    tracing::warn!(topic = %self.topic, error = %message, "Upstream error");
                    *sequence += 1;
                    self.updates.send_replace(Some(SnapshotUpdate {
                        topic: self.topic.clone(),
                        sequence: *sequence,
                        data: last_data.clone(),
                        error: Some(message),
                    }));
                }
                Ok(None) => {
                    tracing::info!(topic = %self.topic, "Feed ended");
                    return FeedEnd::Disconnected { delivered };
                }
                Err(e) => {
                    tracing::warn!(topic = %self.topic, error = %e, "Feed disconnected");
                    return FeedEnd::Disconnected { delivered };
                }
            }
        }
    }

    fn set_state(&self, state: ConnectionState) {
        self.state.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
    }
}
