//! HTTP client shared foundation
//!
//! This module provides a shared HTTP client with:
//! - Configurable timeout and User-Agent
//! - Exponential backoff retry logic (max 3 retries)
//! - Rate limit error handling

use crate::error::RegistryError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("ts-typie/", env!("CARGO_PKG_VERSION"));

/// Abbreviated metadata is enough to learn whether a package exists
const METADATA_ACCEPT: &str =
    "application/vnd.npm.install-v1+json; q=1.0, application/json; q=0.8, */*";

/// Maximum number of retry attempts
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (in milliseconds)
const BASE_DELAY_MS: u64 = 100;

/// HTTP client wrapper with retry logic
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    max_retries: u32,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, RegistryError> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, RegistryError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(METADATA_ACCEPT));

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .default_headers(headers)
            .build()
            .map_err(|e| RegistryError::ClientBuild {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            max_retries: MAX_RETRIES,
        })
    }

    /// Set the maximum number of retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Perform a GET request with retry logic and error context
    ///
    /// 404 maps to `PackageNotFound`, any other non-success status to
    /// `UnexpectedStatus`. Rate limiting, timeouts and connection errors
    /// are retried with exponential backoff.
    pub async fn get_with_context(
        &self,
        url: &str,
        package: &str,
        registry: &str,
    ) -> Result<reqwest::Response, RegistryError> {
        let mut last_error = None;
        let mut delay = BASE_DELAY_MS;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                tracing::debug!("retrying {} (attempt {})", package, attempt + 1);
                tokio::time::sleep(Duration::from_millis(delay)).await;
                delay *= 2;
            }

            let error = match self.client.get(url).send().await {
                Ok(response) => match response.status() {
                    status if status.is_success() => return Ok(response),
                    StatusCode::TOO_MANY_REQUESTS => RegistryError::RateLimitExceeded {
                        registry: registry.to_string(),
                    },
                    StatusCode::NOT_FOUND => RegistryError::package_not_found(package, registry),
                    status => RegistryError::UnexpectedStatus {
                        package: package.to_string(),
                        registry: registry.to_string(),
                        status: status.as_u16(),
                    },
                },
                Err(e) if e.is_timeout() => RegistryError::timeout(package, registry),
                Err(e) => RegistryError::network_error(package, registry, e.to_string()),
            };

            if !error.is_transient() {
                return Err(error);
            }
            last_error = Some(error);
        }

        Err(last_error
            .unwrap_or_else(|| RegistryError::network_error(package, registry, "unknown error")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_http_client_creation() {
        let client = HttpClient::new();
        assert!(client.is_ok());
    }

    #[test]
    fn test_http_client_with_config() {
        let client = HttpClient::with_config(Duration::from_secs(60), "test-agent/1.0");
        assert!(client.is_ok());
    }

    #[test]
    fn test_http_client_with_max_retries() {
        let client = HttpClient::new().unwrap().with_max_retries(5);
        assert_eq!(client.max_retries, 5);
    }

    #[test]
    fn test_default_constants() {
        assert_eq!(DEFAULT_TIMEOUT, Duration::from_secs(30));
        assert!(DEFAULT_USER_AGENT.starts_with("ts-typie/"));
        assert_eq!(MAX_RETRIES, 3);
        assert_eq!(BASE_DELAY_MS, 100);
    }

    #[tokio::test]
    async fn test_get_success_sends_headers() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/@types/node")
                    .header_exists("accept")
                    .header_exists("user-agent");
                then.status(200).body("{}");
            })
            .await;

        let client = HttpClient::new().unwrap();
        let result = client
            .get_with_context(&server.url("/@types/node"), "@types/node", "test")
            .await;

        assert!(result.is_ok());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/@types/missing");
                then.status(404);
            })
            .await;

        let client = HttpClient::new().unwrap();
        let err = client
            .get_with_context(&server.url("/@types/missing"), "@types/missing", "test")
            .await
            .unwrap_err();

        assert!(matches!(err, RegistryError::PackageNotFound { .. }));
    }

    #[tokio::test]
    async fn test_get_unexpected_status_is_not_retried() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/@types/broken");
                then.status(500);
            })
            .await;

        let client = HttpClient::new().unwrap();
        let err = client
            .get_with_context(&server.url("/@types/broken"), "@types/broken", "test")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RegistryError::UnexpectedStatus { status: 500, .. }
        ));
        mock.assert_calls_async(1).await;
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/@types/missing");
                then.status(404);
            })
            .await;

        let client = HttpClient::new().unwrap().with_max_retries(3);
        let err = client
            .get_with_context(&server.url("/@types/missing"), "@types/missing", "test")
            .await
            .unwrap_err();

        assert!(!err.is_transient());
        mock.assert_calls_async(1).await;
    }

    #[tokio::test]
    async fn test_rate_limit_is_retried() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/@types/busy");
                then.status(429);
            })
            .await;

        let client = HttpClient::new().unwrap().with_max_retries(2);
        let err = client
            .get_with_context(&server.url("/@types/busy"), "@types/busy", "test")
            .await
            .unwrap_err();

        assert!(matches!(err, RegistryError::RateLimitExceeded { .. }));
        mock.assert_calls_async(3).await;
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let client = HttpClient::new().unwrap().with_max_retries(1);
        let err = client
            .get_with_context("http://127.0.0.1:1/@types/node", "@types/node", "test")
            .await
            .unwrap_err();

        assert!(matches!(err, RegistryError::NetworkError { .. }));
        assert!(err.is_transient());
    }
}
