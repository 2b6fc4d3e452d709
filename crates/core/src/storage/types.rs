//! Storage configuration carried by a job request.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::StorageError;

/// Supported storage protocols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    WebDav,
}

impl StorageBackend {
    /// Parses a storage type name, case-insensitively.
    pub fn from_type(kind: &str) -> Result<Self, StorageError> {
        if kind.eq_ignore_ascii_case("webdav") {
            Ok(Self::WebDav)
        } else {
            Err(StorageError::UnsupportedType(kind.to_string()))
        }
    }
}

/// The `storage` object of a job request.
#[derive(Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    pub login: String,
    pub password: String,
}

impl StorageConfig {
    pub fn backend(&self) -> Result<StorageBackend, StorageError> {
        StorageBackend::from_type(&self.kind)
    }

    /// Parses the endpoint URL. Only http(s) endpoints are accepted.
    pub fn endpoint(&self) -> Result<Url, StorageError> {
        let url = Url::parse(&self.url)
            .map_err(|e| StorageError::InvalidUrl(format!("{}: {}", self.url, e)))?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(StorageError::InvalidUrl(format!(
                "{}: unsupported scheme {}",
                self.url, scheme
            ))),
        }
    }
}

// Password stays out of debug output.
impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("kind", &self.kind)
            .field("url", &self.url)
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}
