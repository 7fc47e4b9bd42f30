//! Registry access for `@types/*` lookups
//!
//! This module provides:
//! - HTTP client shared foundation with retry logic
//! - npm-compatible registry adapter
//! - Bounded concurrent prober producing a `ProbeReport`

mod client;
mod npm;
mod prober;

pub use client::{HttpClient, DEFAULT_TIMEOUT};
pub use npm::NpmRegistry;
pub use prober::{Prober, DEFAULT_CONCURRENCY};

use crate::error::RegistryError;
use async_trait::async_trait;

/// Trait for registries that can answer whether a package exists
#[async_trait]
pub trait TypesRegistry: Send + Sync {
    /// Base URL of the registry
    fn registry_url(&self) -> &str;

    /// Returns `Ok(true)` if the package exists, `Ok(false)` if the registry says it does not
    async fn exists(&self, package: &str) -> Result<bool, RegistryError>;
}
