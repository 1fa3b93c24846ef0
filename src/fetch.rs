//! Fetch+Cache: one GET per URL per TTL window.

use crate::cache::{CacheKey, CacheManager, CacheStats};
use crate::transport::{xml, Transport};
use crate::{Error, ErrorContext, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// How the response body is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Json,
    Xml,
}

impl ResponseFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseFormat::Json => "json",
            ResponseFormat::Xml => "xml",
        }
    }
}

/// Shared fetch service injected into every resolver.
///
/// The cache key is derived from the URL alone; requesting one URL in both
/// formats would reuse whichever shape was stored first.
pub struct FetchCache {
    transport: Arc<dyn Transport>,
    cache: CacheManager,
}

impl FetchCache {
    pub fn new(transport: Arc<dyn Transport>, cache: CacheManager) -> Self {
        Self { transport, cache }
    }

    /// Return the parsed body of `url`, from cache when a live entry exists.
    ///
    /// Transport failures and unparsable bodies are returned as errors and
    /// leave the cache untouched. No retries.
    pub async fn fetch(&self, url: &str, format: ResponseFormat) -> Result<Value> {
        let key = CacheKey::for_url(url);
        if let Some(cached) = self.cache.get::<Value>(&key).await? {
            debug!(url = %url, "cache hit");
            return Ok(cached);
        }
        debug!(url = %url, format = format.as_str(), "cache miss, fetching");

        let body = self
            .transport
            .get(url)
            .await
            .map_err(|e| Error::fetch(url, e))?;
        let value = parse_body(url, &body, format)?;
        self.cache.set(&key, &value).await?;
        Ok(value)
    }

    /// [`fetch`](Self::fetch) decoded into a per-endpoint schema.
    pub async fn fetch_as<T: DeserializeOwned>(
        &self,
        url: &str,
        format: ResponseFormat,
    ) -> Result<T> {
        let value = self.fetch(url, format).await?;
        decode(url, value)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

fn parse_body(url: &str, body: &str, format: ResponseFormat) -> Result<Value> {
    let parsed = match format {
        ResponseFormat::Json => serde_json::from_str(body).map_err(|e| e.to_string()),
        ResponseFormat::Xml => xml::to_json(body).map_err(|e| e.to_string()),
    };
    parsed.map_err(|message| Error::Decode {
        url: url.to_string(),
        format: format.as_str(),
        message,
        body: body.to_string(),
    })
}

/// Decode a parsed payload; a shape mismatch is missing data, not a crash.
pub fn decode<T: DeserializeOwned>(url: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| {
        Error::missing_with_context(
            format!("Unexpected response from {}", url),
            ErrorContext::new().with_details(e.to_string()),
        )
    })
}
