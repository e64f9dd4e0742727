//! Blocking HTTP client for fetching entries from a log query endpoint.

use super::decode::decode_entries;
use super::EntrySource;
use crate::model::LogEntry;
use crate::utils::config::DEFAULT_HTTP_TIMEOUT;
use crate::utils::error::SourceError;
use log::{debug, info};
use reqwest::blocking::Client;
use std::time::Duration;

/// Entry source backed by an HTTP GET endpoint
pub struct HttpSource {
    client: Client,
    url: String,
}

impl HttpSource {
    /// Create a new HTTP source with the default timeout
    pub fn new(url: impl Into<String>) -> Result<Self, SourceError> {
        Self::with_timeout(url, DEFAULT_HTTP_TIMEOUT)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let url = url.into();
        validate_url(&url)?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SourceError::RequestFailed)?;

        Ok(Self { client, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl EntrySource for HttpSource {
    fn load(&self) -> Result<Vec<LogEntry>, SourceError> {
        info!("Fetching entries from: {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .map_err(SourceError::RequestFailed)?;

        // Check HTTP status
        if !response.status().is_success() {
            return Err(SourceError::InvalidResponse(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().unwrap_or_default()
            )));
        }

        let payload: serde_json::Value = response.json().map_err(SourceError::RequestFailed)?;

        let entries = decode_entries(&payload)?;
        debug!("Fetched {} entries", entries.len());

        Ok(entries)
    }

    fn describe(&self) -> String {
        format!("url {}", self.url)
    }
}

/// Reject URLs the client cannot fetch
fn validate_url(url: &str) -> Result<(), SourceError> {
    if url.is_empty() {
        return Err(SourceError::InvalidUrl("URL cannot be empty".to_string()));
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(SourceError::InvalidUrl(format!(
            "URL must start with http:// or https:// (got {})",
            url
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("http://localhost:8080/entries").is_ok());
        assert!(validate_url("https://logs.example.com/api").is_ok());
        assert!(validate_url("").is_err());
        assert!(validate_url("ftp://logs.example.com").is_err());
    }

    #[test]
    fn test_new_rejects_bad_scheme() {
        assert!(HttpSource::new("file:///tmp/x.json").is_err());
    }

    #[test]
    fn test_describe() {
        let source = HttpSource::new("http://localhost:8080/entries").unwrap();
        assert_eq!(source.describe(), "url http://localhost:8080/entries");
        assert_eq!(source.url(), "http://localhost:8080/entries");
    }
}
