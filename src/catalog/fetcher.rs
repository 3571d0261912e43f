use crate::error::{ApiError, FetchError};
use crate::types::CatalogEntry;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Source of a remote catalog. Treated as an opaque fallible call.
#[async_trait]
pub trait RemoteCatalogFetcher: Send + Sync {
    async fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>, FetchError>;
}

/// Catalog documents are served either as a bare array or wrapped.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    Bare(Vec<CatalogEntry>),
    Wrapped { entries: Vec<CatalogEntry> },
}

impl CatalogDocument {
    fn into_entries(self) -> Vec<CatalogEntry> {
        match self {
            CatalogDocument::Bare(entries) | CatalogDocument::Wrapped { entries } => entries,
        }
    }
}

pub struct HttpCatalogFetcher {
    client: reqwest::Client,
    url: String,
}

impl HttpCatalogFetcher {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RemoteCatalogFetcher for HttpCatalogFetcher {
    async fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>, FetchError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }
        let document: CatalogDocument = response.json().await?;
        let entries = document.into_entries();
        debug!(url = %self.url, entries = entries.len(), "Fetched remote catalog");
        Ok(entries)
    }
}

/// Remote source that is switched off; always yields an empty catalog.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledCatalogFetcher;

#[async_trait]
impl RemoteCatalogFetcher for DisabledCatalogFetcher {
    async fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>, FetchError> {
        Ok(Vec::new())
    }
}
