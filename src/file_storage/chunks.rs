//! # Chunked Object Reads
//!
//! [`ChunkStream`] wraps the backend's chunked read of one object and hands
//! the chunks out in order, one at a time. The whole object is never held in
//! memory. The stream is finite and cannot be restarted:
//!
//! ```text
//! Opened ──first chunk──▶ Emitting ──chunk──▶ Emitting
//!   │                        │
//!   └──────end of data───────┴──────────────▶ Exhausted
//! ```
//!
//! A backend error is yielded once and then the stream is exhausted.

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::stream::{BoxStream, Stream, StreamExt};
use tracing::{debug, warn};

use super::errors::StorageResult;

/// Position of a [`ChunkStream`] in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Read opened, nothing delivered yet
    Opened,
    /// At least one chunk delivered
    Emitting,
    /// End of data (or a surfaced error); terminal
    Exhausted,
}

/// Lazy, forward-only sequence of byte chunks for one object
pub struct ChunkStream {
    name: String,
    inner: BoxStream<'static, StorageResult<Bytes>>,
    state: StreamState,
    chunks: u64,
    bytes: u64,
}

impl ChunkStream {
    /// Wrap an opened backend read
    pub fn new(name: impl Into<String>, inner: BoxStream<'static, StorageResult<Bytes>>) -> Self {
        Self {
            name: name.into(),
            inner,
            state: StreamState::Opened,
            chunks: 0,
            bytes: 0,
        }
    }

    /// Object this stream reads
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Bytes delivered so far
    pub fn bytes_emitted(&self) -> u64 {
        self.bytes
    }
}

impl Stream for ChunkStream {
    type Item = StorageResult<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            if this.state == StreamState::Exhausted {
                return Poll::Ready(None);
            }

            match this.inner.poll_next_unpin(cx) {
                Poll::Pending => return Poll::Pending,
                // Empty chunks carry nothing for the response body
                Poll::Ready(Some(Ok(chunk))) if chunk.is_empty() => continue,
                Poll::Ready(Some(Ok(chunk))) => {
                    this.state = StreamState::Emitting;
                    this.chunks += 1;
                    this.bytes += chunk.len() as u64;
                    return Poll::Ready(Some(Ok(chunk)));
                }
                Poll::Ready(Some(Err(e))) => {
                    warn!(
                        object = %this.name,
                        bytes = this.bytes,
                        error = %e,
                        "chunked read failed mid-stream"
                    );
                    this.state = StreamState::Exhausted;
                    return Poll::Ready(Some(Err(e)));
                }
                Poll::Ready(None) => {
                    debug!(
                        object = %this.name,
                        chunks = this.chunks,
                        bytes = this.bytes,
                        "chunked read complete"
                    );
                    this.state = StreamState::Exhausted;
                    return Poll::Ready(None);
                }
            }
        }
    }
}

impl fmt::Debug for ChunkStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkStream")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("chunks", &self.chunks)
            .field("bytes", &self.bytes)
            .finish()
    }
}

impl From<ChunkStream> for axum::body::Body {
    fn from(stream: ChunkStream) -> Self {
        axum::body::Body::from_stream(stream)
    }
}
