//! Types for connecting to the Minarets catalog API.

use crate::error::{ClientError, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Configuration for connecting to the catalog API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the API (e.g., "https://api.minarets.io")
    pub url: String,
    /// Bearer token sent with every request when present
    #[serde(default)]
    pub api_token: Option<String>,
}

impl ClientConfig {
    /// Create a config with just the URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_token: None,
        }
    }

    /// Create a config with an API token.
    pub fn with_token(url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_token: Some(api_token.into()),
        }
    }

    /// Validate the URL and strip trailing slashes.
    pub fn normalized(self) -> Result<Self> {
        if self.url.trim().is_empty() {
            return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let url = self.url.trim().trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        Url::parse(&url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;

        let api_token = self.api_token.filter(|token| !token.trim().is_empty());
        Ok(Self { url, api_token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_trailing_slashes() {
        let config = ClientConfig::new("https://api.example.com//").normalized().unwrap();
        assert_eq!(config.url, "https://api.example.com");
    }

    #[test]
    fn rejects_bad_urls() {
        assert!(ClientConfig::new("").normalized().is_err());
        assert!(ClientConfig::new("not-a-url").normalized().is_err());
        assert!(ClientConfig::new("ftp://example.com").normalized().is_err());
        assert!(ClientConfig::new("http://").normalized().is_err());
    }

    #[test]
    fn blank_token_is_dropped() {
        let config = ClientConfig::with_token("https://api.example.com", "  ")
            .normalized()
            .unwrap();
        assert!(config.api_token.is_none());
    }
}
