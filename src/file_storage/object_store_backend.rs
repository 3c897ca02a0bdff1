//! # object_store Backend
//!
//! [`StorageBackend`] over any [`ObjectStore`]: Azure Blob Storage in
//! production, in-memory or local filesystem stores for tests and demos.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{StreamExt, TryStreamExt};
use object_store::azure::{AzureConfigKey, MicrosoftAzureBuilder};
use object_store::buffered::BufWriter;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::ObjectStore;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::backend::{ByteStream, StorageBackend};
use super::chunks::ChunkStream;
use super::connection::ConnectionString;
use super::errors::{StorageError, StorageResult};

/// Storage backend bound to one container of an object store
#[derive(Debug, Clone)]
pub struct ObjectStoreBackend {
    store: Arc<dyn ObjectStore>,
    container: String,
}

impl ObjectStoreBackend {
    /// Wrap an already configured store
    pub fn new(store: Arc<dyn ObjectStore>, container: impl Into<String>) -> Self {
        Self {
            store,
            container: container.into(),
        }
    }

    /// Volatile store, used by tests
    pub fn in_memory(container: impl Into<String>) -> Self {
        Self::new(Arc::new(InMemory::new()), container)
    }

    /// Connect to an Azure Blob Storage container
    pub fn azure(conn: &ConnectionString, container: &str) -> StorageResult<Self> {
        let mut builder = MicrosoftAzureBuilder::new().with_container_name(container);

        if conn.use_development_storage {
            builder = builder.with_use_emulator(true);
        } else {
            if let Some(account) = &conn.account_name {
                builder = builder.with_account(account);
            }
            if let Some(key) = conn.account_key() {
                builder = builder.with_access_key(key);
            }
            if let Some(sas) = conn.shared_access_signature() {
                builder = builder.with_config(AzureConfigKey::SasKey, sas);
            }
            if let Some(endpoint) = conn.blob_endpoint() {
                builder = builder
                    .with_allow_http(endpoint.starts_with("http://"))
                    .with_endpoint(endpoint);
            }
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::InvalidConnectionString(e.to_string()))?;

        Ok(Self::new(Arc::new(store), container))
    }
}

/// Map an object name to a store location.
///
/// Names are opaque keys; `/` is kept as the store's own delimiter.
fn location(name: &str) -> StorageResult<Path> {
    if name.is_empty() {
        return Err(StorageError::InvalidName("empty object name".to_string()));
    }
    Ok(Path::parse(name)?)
}

#[async_trait]
impl StorageBackend for ObjectStoreBackend {
    fn container(&self) -> &str {
        &self.container
    }

    async fn list(&self) -> StorageResult<Vec<String>> {
        let mut entries = self.store.list(None);
        let mut names = Vec::new();

        while let Some(meta) = entries.try_next().await? {
            names.push(meta.location.to_string());
        }

        debug!(container = %self.container, count = names.len(), "listed objects");
        Ok(names)
    }

    async fn read_all(&self, name: &str) -> StorageResult<Bytes> {
        let location = location(name)?;
        let data = self.store.get(&location).await?.bytes().await?;

        debug!(object = %name, size = data.len(), "read object");
        Ok(data)
    }

    async fn read_chunks(&self, name: &str) -> StorageResult<ChunkStream> {
        let location = location(name)?;
        let result = self.store.get(&location).await?;
        let chunks = result.into_stream().map_err(StorageError::from).boxed();

        Ok(ChunkStream::new(name, chunks))
    }

    async fn write(&self, name: &str, mut body: ByteStream<'_>) -> StorageResult<u64> {
        let location = location(name)?;

        // Small payloads go out as one put, large ones as a multipart upload
        let mut writer = BufWriter::new(Arc::clone(&self.store), location);
        let mut written = 0u64;

        while let Some(chunk) = body.next().await {
            let result = match chunk {
                Ok(chunk) => writer
                    .write_all(&chunk)
                    .await
                    .map(|_| chunk.len())
                    .map_err(StorageError::from),
                Err(e) => Err(e),
            };

            match result {
                Ok(len) => written += len as u64,
                Err(e) => {
                    warn!(object = %name, written, error = %e, "upload aborted");
                    if let Err(abort_err) = writer.abort().await {
                        warn!(object = %name, error = %abort_err, "failed to abort partial upload");
                    }
                    return Err(e);
                }
            }
        }

        writer.shutdown().await?;

        debug!(object = %name, size = written, "wrote object");
        Ok(written)
    }
}
