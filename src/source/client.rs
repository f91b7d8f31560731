//! HTTP client shared foundation
//!
//! This module provides a shared HTTP client with:
//! - Configurable timeout and User-Agent
//! - Optional bearer token for authenticated APIs
//! - Exponential backoff retry on transport errors and HTTP 429

use crate::error::SourceError;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Default timeout for HTTP requests (30 seconds)
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("chartbump/", env!("CARGO_PKG_VERSION"));

/// Maximum number of retry attempts
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (in milliseconds)
const BASE_DELAY_MS: u64 = 100;

/// HTTP client wrapper with retry logic
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    max_retries: u32,
    bearer_token: Option<String>,
    accept: Option<&'static str>,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, SourceError> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| SourceError::Http {
                url: String::new(),
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            max_retries: MAX_RETRIES,
            bearer_token: None,
            accept: None,
        })
    }

    /// Client for talking to a local test server: no proxy, no retries
    #[cfg(test)]
    pub(crate) fn for_local_tests() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .user_agent(DEFAULT_USER_AGENT)
            .no_proxy()
            .build()
            .unwrap();

        Self {
            client,
            max_retries: 0,
            bearer_token: None,
            accept: None,
        }
    }

    /// Authenticate every request with a bearer token
    pub fn with_bearer_token(mut self, token: Option<String>) -> Self {
        self.bearer_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    /// Send an `Accept` header with every request
    pub fn with_accept(mut self, media_type: &'static str) -> Self {
        self.accept = Some(media_type);
        self
    }

    /// Perform a GET request with retry logic
    ///
    /// `target` names the thing being looked up and is only used in errors.
    pub async fn get(&self, url: &str, target: &str) -> Result<reqwest::Response, SourceError> {
        let mut last_error = None;
        let mut delay = BASE_DELAY_MS;

        for attempt in 0..=self.max_retries {
            let mut request = self.client.get(url);
            if let Some(token) = &self.bearer_token {
                request = request.bearer_auth(token);
            }
            if let Some(accept) = self.accept {
                request = request.header(reqwest::header::ACCEPT, accept);
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();

                    if status == StatusCode::TOO_MANY_REQUESTS && attempt < self.max_retries {
                        log::debug!("rate limited by {}, retrying in {}ms", url, delay);
                        last_error = Some(SourceError::Status {
                            target: target.to_string(),
                            status: status.as_u16(),
                        });
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                        delay *= 2;
                        continue;
                    }

                    if !status.is_success() {
                        return Err(SourceError::Status {
                            target: target.to_string(),
                            status: status.as_u16(),
                        });
                    }

                    return Ok(response);
                }
                Err(e) => {
                    let message = if e.is_timeout() {
                        "request timed out".to_string()
                    } else {
                        e.to_string()
                    };
                    last_error = Some(SourceError::Http {
                        url: url.to_string(),
                        message,
                    });

                    if attempt < self.max_retries {
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                        delay *= 2;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| SourceError::Http {
            url: url.to_string(),
            message: "unknown error".to_string(),
        }))
    }

    /// Perform a GET request and parse the JSON body
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        target: &str,
        source_name: &str,
    ) -> Result<T, SourceError> {
        let response = self.get(url, target).await?;
        response.json::<T>().await.map_err(|e| {
            SourceError::invalid_response(
                source_name,
                target,
                format!("failed to parse JSON: {}", e),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_client_creation() {
        assert!(HttpClient::new().is_ok());
    }

    #[test]
    fn test_http_client_with_config() {
        let client = HttpClient::with_config(Duration::from_secs(5), "test-agent/1.0");
        assert!(client.is_ok());
    }

    #[test]
    fn test_blank_token_is_ignored() {
        let client = HttpClient::new()
            .unwrap()
            .with_bearer_token(Some("  ".to_string()));
        assert!(client.bearer_token.is_none());

        let client = HttpClient::new()
            .unwrap()
            .with_bearer_token(Some("ghp_x".to_string()));
        assert_eq!(client.bearer_token.as_deref(), Some("ghp_x"));
    }

    #[test]
    fn test_default_constants() {
        assert_eq!(DEFAULT_TIMEOUT, Duration::from_secs(30));
        assert!(DEFAULT_USER_AGENT.starts_with("chartbump/"));
        assert_eq!(MAX_RETRIES, 3);
        assert_eq!(BASE_DELAY_MS, 100);
    }
}
