//! Client-side cache behind the "copy page" action
//!
//! Export text is fetched once per full export URL and reused afterwards.
//! Entries are never evicted; when two fills race, the first one stored
//! wins and both callers see it.

use crate::runtime::TransportError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Shared map from export URL to export text
#[derive(Debug, Clone, Default)]
pub struct ExportCache {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl ExportCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> Option<String> {
        self.lock().get(url).cloned()
    }

    /// Store `text` unless the URL is already cached; returns the cached value
    pub fn insert(&self, url: &str, text: String) -> String {
        self.lock().entry(url.to_string()).or_insert(text).clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // The map stays consistent even if a holder panicked
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Fetches export text by URL
#[async_trait]
pub trait ExportFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, TransportError>;
}

/// Fetches exports from a running docs server
pub struct HttpExportFetcher {
    client: reqwest::Client,
}

impl HttpExportFetcher {
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| TransportError::Connect(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ExportFetcher for HttpExportFetcher {
    async fn fetch(&self, url: &str) -> Result<String, TransportError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(TransportError::Status {
                status: status.as_u16(),
                message: body,
            })
        }
    }
}

/// The copy affordance: resolve a page's export text, hitting the network
/// only on the first copy of each URL
pub struct CopyAction {
    origin: String,
    cache: ExportCache,
    fetcher: Arc<dyn ExportFetcher>,
}

impl CopyAction {
    pub fn new(origin: &str, cache: ExportCache, fetcher: Arc<dyn ExportFetcher>) -> Self {
        Self {
            origin: origin.trim_end_matches('/').to_string(),
            cache,
            fetcher,
        }
    }

    /// Full URL for an export path such as `/llms.mdx/page`
    pub fn url_for(&self, export_path: &str) -> String {
        format!("{}{export_path}", self.origin)
    }

    /// Export text for `export_path`. Failed fetches are not cached.
    pub async fn copy(&self, export_path: &str) -> Result<String, TransportError> {
        let url = self.url_for(export_path);
        if let Some(text) = self.cache.get(&url) {
            tracing::debug!(%url, "Export served from cache");
            return Ok(text);
        }

        let text = self.fetcher.fetch(&url).await?;
        Ok(self.cache.insert(&url, text))
    }
}
