//! Testing utilities and mock implementations.
//!
//! This module provides an in-memory storage backend so the whole job
//! pipeline can be exercised without a WebDAV server.
//!
//! # Example
//!
//! ```rust,ignore
//! use visibility_core::testing::{MockConnector, MockStorage};
//!
//! let storage = Arc::new(MockStorage::new());
//! storage.insert_object("visibility/input/2023/05/01/img.jpg", b"...".to_vec()).await;
//!
//! let handler = JobHandler::with_connector(config, Arc::new(MockConnector::new(storage.clone())));
//! let response = handler.handle(request).await;
//!
//! assert_eq!(storage.put_keys().await.len(), 1);
//! ```

mod mock_storage;

pub use mock_storage::{MockConnector, MockStorage};
