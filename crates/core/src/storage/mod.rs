//! Remote storage abstraction.
//!
//! This module provides a `StorageClient` trait for fetching and storing job
//! artifacts, a WebDAV implementation, and the factory that turns the
//! request's storage record into a configured client.

mod error;
mod traits;
mod types;
mod webdav;

pub use error::StorageError;
pub use traits::{StorageClient, StorageConnector};
pub use types::{StorageBackend, StorageConfig};
pub use webdav::{WebDavClient, WebDavConnector};

use std::time::Duration;

/// Factory function to create a storage client from the request's storage record.
///
/// Validates the storage type and endpoint; performs no network I/O.
pub fn create_storage_client(
    config: &StorageConfig,
    timeout: Duration,
) -> Result<Box<dyn StorageClient>, StorageError> {
    match config.backend()? {
        StorageBackend::WebDav => Ok(Box::new(WebDavClient::new(config, timeout)?)),
    }
}
