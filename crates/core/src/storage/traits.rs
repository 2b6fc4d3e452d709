//! Trait definitions for the storage module.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use super::error::StorageError;
use super::types::StorageConfig;

/// A client for a remote object store.
///
/// Keys are `/`-separated paths relative to the store's base URL.
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Returns the name of this client implementation.
    fn name(&self) -> &str;

    /// Lists the names of the file objects directly inside a collection, sorted.
    async fn list(&self, collection: &str) -> Result<Vec<String>, StorageError>;

    /// Downloads an object to a local file, returning the number of bytes written.
    async fn fetch(&self, key: &str, dest: &Path) -> Result<u64, StorageError>;

    /// Uploads a local file under the given key, returning the number of bytes sent.
    async fn put(&self, key: &str, src: &Path) -> Result<u64, StorageError>;
}

/// Turns a request's storage record into a client.
///
/// Implementations must validate the record without touching the network.
pub trait StorageConnector: Send + Sync {
    fn connect(&self, config: &StorageConfig) -> Result<Arc<dyn StorageClient>, StorageError>;
}
