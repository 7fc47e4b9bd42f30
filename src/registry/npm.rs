//! npm Registry adapter
//!
//! Looks packages up in any npm-compatible registry.
//! API endpoint: {registry}/{package}

use crate::error::RegistryError;
use crate::registry::{HttpClient, TypesRegistry};
use async_trait::async_trait;

/// npm-compatible registry adapter
pub struct NpmRegistry {
    client: HttpClient,
    base_url: String,
}

impl NpmRegistry {
    /// Create an adapter for the registry at `base_url`
    pub fn new(client: HttpClient, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Build the URL for a package
    fn build_url(&self, package: &str) -> String {
        format!("{}/{}", self.base_url, package)
    }
}

#[async_trait]
impl TypesRegistry for NpmRegistry {
    fn registry_url(&self) -> &str {
        &self.base_url
    }

    async fn exists(&self, package: &str) -> Result<bool, RegistryError> {
        let url = self.build_url(package);
        tracing::debug!("GET {}", url);

        match self
            .client
            .get_with_context(&url, package, &self.base_url)
            .await
        {
            Ok(_) => Ok(true),
            Err(RegistryError::PackageNotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn registry(base_url: &str) -> NpmRegistry {
        NpmRegistry::new(HttpClient::new().unwrap().with_max_retries(0), base_url)
    }

    #[test]
    fn test_build_url() {
        let registry = registry("https://registry.npmjs.org");
        assert_eq!(
            registry.build_url("@types/node"),
            "https://registry.npmjs.org/@types/node"
        );
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let registry = registry("https://npm.example.com/repo/");
        assert_eq!(registry.registry_url(), "https://npm.example.com/repo");
        assert_eq!(
            registry.build_url("@types/babel__core"),
            "https://npm.example.com/repo/@types/babel__core"
        );
    }

    #[tokio::test]
    async fn test_exists_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/@types/left-pad");
                then.status(200).body("{}");
            })
            .await;

        let registry = registry(&server.base_url());
        assert!(registry.exists("@types/left-pad").await.unwrap());
    }

    #[tokio::test]
    async fn test_exists_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/@types/node");
                then.status(404);
            })
            .await;

        let registry = registry(&server.base_url());
        assert!(!registry.exists("@types/node").await.unwrap());
    }

    #[tokio::test]
    async fn test_exists_server_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/@types/args");
                then.status(503);
            })
            .await;

        let registry = registry(&server.base_url());
        let err = registry.exists("@types/args").await.unwrap_err();
        assert!(matches!(
            err,
            RegistryError::UnexpectedStatus { status: 503, .. }
        ));
    }
}
