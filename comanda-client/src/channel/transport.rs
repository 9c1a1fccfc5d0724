//! Snapshot transports
//!
//! A transport opens one feed per topic. A feed yields full snapshots of the
//! topic's collection, non-fatal errors, and finally either end-of-stream or
//! an error; both end the connection.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

use crate::ChannelError;

/// Largest frame accepted from a snapshot server
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

/// Event delivered by a feed
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// Current contents of the collection
    Snapshot(Vec<Value>),
    /// Upstream reported a problem but the feed stays open
    Error(String),
}

/// Live subscription to a single topic
#[async_trait]
pub trait SnapshotFeed: Send {
    /// Next event; `Ok(None)` when upstream ended the stream
    async fn next_event(&mut self) -> Result<Option<FeedEvent>, ChannelError>;
}

/// Opens snapshot feeds
#[async_trait]
pub trait SnapshotTransport: Send + Sync {
    async fn open(&self, topic: &str) -> Result<Box<dyn SnapshotFeed>, ChannelError>;
}

/// Wire frame exchanged with a snapshot server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireFrame {
    Subscribe { topic: String },
    Snapshot { topic: String, data: Vec<Value> },
    Error { topic: String, message: String },
}

/// Write one frame: payload length (4 bytes, LE) followed by the JSON body
pub async fn write_frame<W>(writer: &mut W, frame: &WireFrame) -> Result<(), ChannelError>
where
    W: AsyncWrite + Unpin + Send,
{
    let payload = serde_json::to_vec(frame).map_err(|e| ChannelError::InvalidFrame(e.to_string()))?;
    if payload.len() > MAX_FRAME_LEN {
        return Err(ChannelError::InvalidFrame(format!(
            "frame too large: {} bytes",
            payload.len()
        )));
    }

    let mut data = Vec::with_capacity(4 + payload.len());
    data.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    data.extend_from_slice(&payload);
    writer.write_all(&data).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one frame; `Ok(None)` on a clean EOF before the length prefix
pub async fn read_frame<R>(reader: &mut R) -> Result<Option<WireFrame>, ChannelError>
where
    R: AsyncRead + Unpin + Send,
{
    // Read payload length (4 bytes)
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    }

    let len = u32::from_le_bytes(len_buf) as usize;
    if len > MAX_FRAME_LEN {
        return Err(ChannelError::InvalidFrame(format!("frame too large: {} bytes", len)));
    }

    // Read payload
    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await?;

    serde_json::from_slice(&payload)
        .map(Some)
        .map_err(|e| ChannelError::InvalidFrame(e.to_string()))
}

/// TCP Transport Implementation
///
/// Connects to a snapshot server, sends a `subscribe` frame and reads
/// `snapshot` / `error` frames for that topic.
#[derive(Debug, Clone)]
pub struct TcpTransport {
    addr: String,
}

impl TcpTransport {
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }
}

#[async_trait]
impl SnapshotTransport for TcpTransport {
    async fn open(&self, topic: &str) -> Result<Box<dyn SnapshotFeed>, ChannelError> {
        let stream = TcpStream::connect(&self.addr)
            .await
            .map_err(|e| ChannelError::Connection(e.to_string()))?;
        let (reader, mut writer) = stream.into_split();

        write_frame(
            &mut writer,
            &WireFrame::Subscribe {
                topic: topic.to_string(),
            },
        )
        .await?;

        Ok(Box::new(TcpFeed {
            topic: topic.to_string(),
            reader,
            _writer: writer,
        }))
    }
}

struct TcpFeed {
    topic: String,
    reader: OwnedReadHalf,
    // Dropping the write half shuts the connection down
    _writer: OwnedWriteHalf,
}

#[async_trait]
impl SnapshotFeed for TcpFeed {
    async fn next_event(&mut self) -> Result<Option<FeedEvent>, ChannelError> {
        loop {
            let Some(frame) = read_frame(&mut self.reader).await? else {
                return Ok(None);
            };

            match frame {
                WireFrame::Snapshot { topic, data } if topic == self.topic => {
                    return Ok(Some(FeedEvent::Snapshot(data)));
                }
                WireFrame::Error { topic, message } if topic == self.topic => {
                    return Ok(Some(FeedEvent::Error(message)));
                }
                other => {
                    tracing::debug!(topic = %self.topic, frame = ?other, "Ignoring frame");
                }
            }
        }
    }
}
