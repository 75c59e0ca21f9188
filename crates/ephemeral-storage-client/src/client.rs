//! Storage-client capability interface and its ephemeral implementation.
//!
//! [`StorageClient`] is the asynchronous surface shared by storage backends.
//! [`EphemeralStorageClient`] implements it on top of an [`EphemeralStore`]:
//! uploads are buffered in full before they touch the store, and downloads
//! are returned as chunked [`ByteStream`]s.
//!
//! # Object safety
//!
//! The trait uses `#[async_trait]` so it can be used as `Arc<dyn StorageClient>`.

use std::ops::RangeInclusive;
use std::sync::Arc;

use async_trait::async_trait;
use ephemeral_storage_core::{CompletedPart, EphemeralStore, StorageConfig, StorageResult};
use tracing::debug;

use crate::stream::ByteStream;

/// Asynchronous storage capability interface.
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Store the full contents of `data` at `key`.
    async fn upload(&self, key: &str, data: ByteStream) -> StorageResult<()>;

    /// Stream the object at `key`, optionally limited to an inclusive byte
    /// range.
    async fn download(
        &self,
        key: &str,
        range: Option<RangeInclusive<i64>>,
    ) -> StorageResult<ByteStream>;

    /// Whether `key` is an object or a directory.
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Size of the object at `key`; `0` when absent.
    async fn size(&self, key: &str) -> StorageResult<u64>;

    /// Copy a single object.
    async fn copy(&self, source: &str, destination: &str) -> StorageResult<()>;

    /// Immediate child names under `prefix` (root when `None`).
    async fn list(&self, prefix: Option<&str>) -> StorageResult<Vec<String>>;

    /// Delete `key` and everything beneath it.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Create a directory and its ancestors.
    async fn create_directory(&self, key: &str) -> StorageResult<()>;

    /// Start a multipart upload and return its id.
    async fn create_multipart_upload(&self, key: &str) -> StorageResult<String>;

    /// Upload one part of a multipart upload.
    async fn upload_part(
        &self,
        upload_id: &str,
        key: &str,
        number: i32,
        data: ByteStream,
    ) -> StorageResult<CompletedPart>;

    /// Abandon a multipart upload.
    async fn abort_multipart_upload(&self, upload_id: &str, key: &str) -> StorageResult<()>;

    /// Assemble the referenced parts into the final object.
    async fn finish_multipart_upload(
        &self,
        upload_id: &str,
        key: &str,
        chunks: Vec<CompletedPart>,
    ) -> StorageResult<()>;
}

/// [`StorageClient`] backed by an in-memory [`EphemeralStore`].
///
/// Cloning is cheap; clones share the same store.
#[derive(Debug, Clone)]
pub struct EphemeralStorageClient {
    store: Arc<EphemeralStore>,
    config: Arc<StorageConfig>,
}

impl Default for EphemeralStorageClient {
    fn default() -> Self {
        Self::new(StorageConfig::default())
    }
}

impl EphemeralStorageClient {
    /// Create a client over a fresh, empty store.
    #[must_use]
    pub fn new(config: StorageConfig) -> Self {
        Self::with_store(Arc::new(EphemeralStore::new()), config)
    }

    /// Create a client over an existing store.
    #[must_use]
    pub fn with_store(store: Arc<EphemeralStore>, config: StorageConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<EphemeralStore> {
        &self.store
    }

    /// The client configuration.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }
}

#[async_trait]
impl StorageClient for EphemeralStorageClient {
    async fn upload(&self, key: &str, data: ByteStream) -> StorageResult<()> {
        let data = data.collect().await?;
        self.store.put(key, data);
        Ok(())
    }

    async fn download(
        &self,
        key: &str,
        range: Option<RangeInclusive<i64>>,
    ) -> StorageResult<ByteStream> {
        let data = self.store.read(key, range)?;
        debug!(key, size = data.len(), "download prepared");
        Ok(ByteStream::chunked(data, self.config.download_chunk_size))
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.store.exists(key))
    }

    async fn size(&self, key: &str) -> StorageResult<u64> {
        Ok(self.store.size(key))
    }

    async fn copy(&self, source: &str, destination: &str) -> StorageResult<()> {
        self.store.copy(source, destination)
    }

    async fn list(&self, prefix: Option<&str>) -> StorageResult<Vec<String>> {
        Ok(self.store.list(prefix))
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.store.remove(key);
        Ok(())
    }

    async fn create_directory(&self, key: &str) -> StorageResult<()> {
        self.store.create_directory(key);
        Ok(())
    }

    async fn create_multipart_upload(&self, key: &str) -> StorageResult<String> {
        Ok(self.store.create_multipart_upload(key))
    }

    async fn upload_part(
        &self,
        upload_id: &str,
        key: &str,
        number: i32,
        data: ByteStream,
    ) -> StorageResult<CompletedPart> {
        let data = data.collect().await?;
        self.store.add_multipart_part(upload_id, key, number, data)
    }

    async fn abort_multipart_upload(&self, upload_id: &str, key: &str) -> StorageResult<()> {
        self.store.abort_multipart_upload(upload_id, key)
    }

    async fn finish_multipart_upload(
        &self,
        upload_id: &str,
        key: &str,
        chunks: Vec<CompletedPart>,
    ) -> StorageResult<()> {
        self.store.finish_multipart_upload(upload_id, key, &chunks)
    }
}
