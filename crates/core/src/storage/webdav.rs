//! WebDAV storage client implementation.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use once_cell::sync::Lazy;
use regex_lite::Regex;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

use super::{
    create_storage_client, StorageClient, StorageConfig, StorageConnector, StorageError,
};

const PROPFIND_BODY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<d:propfind xmlns:d="DAV:"><d:prop><d:resourcetype/><d:getcontentlength/></d:prop></d:propfind>"#;

/// WebDAV client authenticating with HTTP basic auth.
pub struct WebDavClient {
    client: Client,
    /// Base URL, always ending in `/`.
    base: Url,
    login: String,
    password: String,
    /// Collections known to exist, so MKCOL is issued once per path.
    known_collections: Mutex<HashSet<String>>,
}

impl WebDavClient {
    /// Create a new WebDAV client. No request is sent until the first operation.
    pub fn new(config: &StorageConfig, timeout: Duration) -> Result<Self, StorageError> {
        let mut base = config.endpoint()?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StorageError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base,
            login: config.login.clone(),
            password: config.password.clone(),
            known_collections: Mutex::new(HashSet::new()),
        })
    }

    /// Resolves a key to a URL, percent-encoding each path segment.
    fn url_for(&self, key: &str, collection: bool) -> Result<Url, StorageError> {
        let mut relative = key
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| urlencoding::encode(s).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        if collection && !relative.is_empty() {
            relative.push('/');
        }

        self.base
            .join(&relative)
            .map_err(|e| StorageError::InvalidUrl(format!("{}: {}", key, e)))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .basic_auth(&self.login, Some(&self.password))
    }

    /// Creates every missing parent collection of `key`.
    async fn ensure_parents(&self, key: &str) -> Result<(), StorageError> {
        let segments: Vec<&str> = key.split('/').filter(|s| !s.is_empty()).collect();
        if segments.len() < 2 {
            return Ok(());
        }

        let mkcol = dav_method("MKCOL")?;
        let mut known = self.known_collections.lock().await;

        for depth in 1..segments.len() {
            let collection = segments[..depth].join("/");
            if known.contains(&collection) {
                continue;
            }

            let url = self.url_for(&collection, true)?;
            let response = self
                .request(mkcol.clone(), url)
                .send()
                .await
                .map_err(map_request_error)?;

            // 405: the collection already exists
            let status = response.status();
            if status != StatusCode::METHOD_NOT_ALLOWED {
                check_status(status, &collection)?;
            }
            debug!(collection = %collection, status = %status, "WebDAV MKCOL");
            known.insert(collection);
        }

        Ok(())
    }
}

#[async_trait]
impl StorageClient for WebDavClient {
    fn name(&self) -> &str {
        "webdav"
    }

    async fn list(&self, collection: &str) -> Result<Vec<String>, StorageError> {
        let url = self.url_for(collection, true)?;
        let response = self
            .request(dav_method("PROPFIND")?, url)
            .header("Depth", "1")
            .header(CONTENT_TYPE, "application/xml; charset=utf-8")
            .body(PROPFIND_BODY)
            .send()
            .await
            .map_err(map_request_error)?;

        check_status(response.status(), collection)?;

        let body = response.text().await.map_err(map_request_error)?;
        let names = parse_multistatus(&body)?;
        debug!(collection = %collection, count = names.len(), "WebDAV PROPFIND");
        Ok(names)
    }

    async fn fetch(&self, key: &str, dest: &Path) -> Result<u64, StorageError> {
        let url = self.url_for(key, false)?;
        let response = self
            .request(Method::GET, url)
            .send()
            .await
            .map_err(map_request_error)?;

        check_status(response.status(), key)?;

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::File::create(dest).await?;
        let mut stream = response.bytes_stream();
        let mut total = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_request_error)?;
            file.write_all(&chunk).await?;
            total += chunk.len() as u64;
        }
        file.flush().await?;

        debug!(key = %key, bytes = total, "WebDAV GET");
        Ok(total)
    }

    async fn put(&self, key: &str, src: &Path) -> Result<u64, StorageError> {
        self.ensure_parents(key).await?;

        let body = tokio::fs::read(src).await?;
        let size = body.len() as u64;
        let url = self.url_for(key, false)?;

        let response = self
            .request(Method::PUT, url)
            .body(body)
            .send()
            .await
            .map_err(map_request_error)?;

        check_status(response.status(), key)?;

        debug!(key = %key, bytes = size, "WebDAV PUT");
        Ok(size)
    }
}

/// Connector producing [`WebDavClient`]s for job requests.
pub struct WebDavConnector {
    timeout: Duration,
}

impl WebDavConnector {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl StorageConnector for WebDavConnector {
    fn connect(&self, config: &StorageConfig) -> Result<Arc<dyn StorageClient>, StorageError> {
        create_storage_client(config, self.timeout).map(Arc::from)
    }
}

fn dav_method(name: &str) -> Result<Method, StorageError> {
    Method::from_bytes(name.as_bytes())
        .map_err(|e| StorageError::Internal(format!("Invalid HTTP method {}: {}", name, e)))
}

fn map_request_error(e: reqwest::Error) -> StorageError {
    if e.is_timeout() {
        StorageError::Timeout
    } else if e.is_connect() {
        StorageError::ConnectionFailed(e.to_string())
    } else {
        StorageError::ApiError(e.to_string())
    }
}

fn check_status(status: StatusCode, key: &str) -> Result<(), StorageError> {
    if status.is_success() {
        return Ok(());
    }

    match status.as_u16() {
        401 | 403 => Err(StorageError::AuthenticationFailed(format!(
            "HTTP {} for {}",
            status, key
        ))),
        404 => Err(StorageError::NotFound(key.to_string())),
        _ => Err(StorageError::ApiError(format!("HTTP {} for {}", status, key))),
    }
}

static RESPONSE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(?:[a-z0-9_-]+:)?response\b[^>]*>(.*?)</(?:[a-z0-9_-]+:)?response\s*>")
        .unwrap()
});

static HREF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(?:[a-z0-9_-]+:)?href\s*>([^<]*)</(?:[a-z0-9_-]+:)?href\s*>").unwrap()
});

static COLLECTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<(?:[a-z0-9_-]+:)?collection\s*/?>").unwrap());

/// Extracts file names from a PROPFIND multistatus body.
///
/// Collections, including the listed collection itself, are skipped.
fn parse_multistatus(body: &str) -> Result<Vec<String>, StorageError> {
    let mut names = Vec::new();
    for caps in RESPONSE_RE.captures_iter(body) {
        let Some(block) = caps.get(1).map(|m| m.as_str()) else {
            continue;
        };
        if COLLECTION_RE.is_match(block) {
            continue;
        }
        let Some(href) = HREF_RE
            .captures(block)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim())
        else {
            continue;
        };

        let decoded = urlencoding::decode(href)
            .map_err(|e| StorageError::ApiError(format!("Invalid href {}: {}", href, e)))?;
        if let Some(name) = decoded.trim_end_matches('/').rsplit('/').next() {
            if !name.is_empty() {
                names.push(name.to_string());
            }
        }
    }

    names.sort();
    names.dedup();
    Ok(names)
}
