//! Mock storage backend for testing.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::storage::{StorageClient, StorageConfig, StorageConnector, StorageError};

/// In-memory implementation of the StorageClient trait.
///
/// Provides controllable behavior for testing:
/// - Seed objects and inspect uploads
/// - Track fetched and stored keys for assertions
/// - Simulate failures on the next operation or the next upload
#[derive(Debug, Default)]
pub struct MockStorage {
    /// Stored objects by key.
    objects: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
    /// Served for keys that were never stored, when set.
    default_object: Arc<RwLock<Option<Vec<u8>>>>,
    /// Keys fetched, in order.
    fetches: Arc<RwLock<Vec<String>>>,
    /// Keys stored, in order.
    puts: Arc<RwLock<Vec<String>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<StorageError>>>,
    /// If set, the next upload will fail with this error.
    next_put_error: Arc<RwLock<Option<StorageError>>>,
}

impl MockStorage {
    /// Create an empty mock storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock storage that serves `bytes` for every unknown key.
    pub fn accepting_all(bytes: Vec<u8>) -> Self {
        Self {
            default_object: Arc::new(RwLock::new(Some(bytes))),
            ..Self::default()
        }
    }

    /// Store an object.
    pub async fn insert_object(&self, key: &str, bytes: Vec<u8>) {
        self.objects.write().await.insert(key.to_string(), bytes);
    }

    /// Get a stored object.
    pub async fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.read().await.get(key).cloned()
    }

    /// Get all fetched keys, in order.
    pub async fn fetched_keys(&self) -> Vec<String> {
        self.fetches.read().await.clone()
    }

    /// Get all stored keys, in order.
    pub async fn put_keys(&self) -> Vec<String> {
        self.puts.read().await.clone()
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: StorageError) {
        *self.next_error.write().await = Some(error);
    }

    /// Configure the next upload to fail with the given error.
    pub async fn set_put_error(&self, error: StorageError) {
        *self.next_put_error.write().await = Some(error);
    }

    async fn take_error(&self) -> Option<StorageError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl StorageClient for MockStorage {
    fn name(&self) -> &str {
        "mock"
    }

    async fn list(&self, collection: &str) -> Result<Vec<String>, StorageError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        let prefix = format!("{}/", collection.trim_end_matches('/'));
        let objects = self.objects.read().await;
        Ok(objects
            .keys()
            .filter_map(|key| key.strip_prefix(&prefix))
            .filter(|name| !name.is_empty() && !name.contains('/'))
            .map(str::to_string)
            .collect())
    }

    async fn fetch(&self, key: &str, dest: &Path) -> Result<u64, StorageError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        let bytes = match self.objects.read().await.get(key).cloned() {
            Some(bytes) => bytes,
            None => self
                .default_object
                .read()
                .await
                .clone()
                .ok_or_else(|| StorageError::NotFound(key.to_string()))?,
        };

        tokio::fs::write(dest, &bytes).await?;
        self.fetches.write().await.push(key.to_string());
        Ok(bytes.len() as u64)
    }

    async fn put(&self, key: &str, src: &Path) -> Result<u64, StorageError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        if let Some(err) = self.next_put_error.write().await.take() {
            return Err(err);
        }

        let bytes = tokio::fs::read(src).await?;
        let size = bytes.len() as u64;
        self.objects.write().await.insert(key.to_string(), bytes);
        self.puts.write().await.push(key.to_string());
        Ok(size)
    }
}

/// Connector handing out a shared [`MockStorage`].
///
/// The storage record is validated exactly like the WebDAV connector does,
/// so unsupported types and malformed URLs still fail.
#[derive(Debug)]
pub struct MockConnector {
    storage: Arc<MockStorage>,
    connects: AtomicUsize,
}

impl MockConnector {
    pub fn new(storage: Arc<MockStorage>) -> Self {
        Self {
            storage,
            connects: AtomicUsize::new(0),
        }
    }

    /// Number of successful connects.
    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

impl StorageConnector for MockConnector {
    fn connect(&self, config: &StorageConfig) -> Result<Arc<dyn StorageClient>, StorageError> {
        config.backend()?;
        config.endpoint()?;
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(self.storage.clone())
    }
}
