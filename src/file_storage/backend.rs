//! # Storage Backend Trait

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;

use super::chunks::ChunkStream;
use super::errors::StorageResult;

/// Forward-only byte stream handed to [`StorageBackend::write`]
pub type ByteStream<'a> = BoxStream<'a, StorageResult<Bytes>>;

/// Backend trait for a single object container
#[async_trait]
pub trait StorageBackend: Send + Sync + std::fmt::Debug {
    /// Name of the container this backend is bound to
    fn container(&self) -> &str;

    /// List every object name, in backend order
    async fn list(&self) -> StorageResult<Vec<String>>;

    /// Read the whole object into memory
    async fn read_all(&self, name: &str) -> StorageResult<Bytes>;

    /// Open a chunked read of the object
    async fn read_chunks(&self, name: &str) -> StorageResult<ChunkStream>;

    /// Write the object from a byte stream, replacing any existing object.
    ///
    /// Returns the number of bytes written.
    async fn write(&self, name: &str, body: ByteStream<'_>) -> StorageResult<u64>;
}
