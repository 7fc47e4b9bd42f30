//! Concurrent registry probing
//!
//! Fans out one lookup per candidate on a `JoinSet`, bounded by a
//! semaphore, and joins every lookup before reporting.

use super::TypesRegistry;
use crate::domain::{ProbeOutcome, ProbeReport};
use crate::progress::LookupProgress;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Default number of lookups in flight at once
pub const DEFAULT_CONCURRENCY: usize = 16;

/// Looks up candidate packages in a registry
pub struct Prober {
    registry: Arc<dyn TypesRegistry>,
    semaphore: Arc<Semaphore>,
}

impl Prober {
    /// Create a prober allowing at most `concurrency` lookups in flight
    pub fn new(registry: Arc<dyn TypesRegistry>, concurrency: usize) -> Self {
        Self {
            registry,
            semaphore: Arc::new(Semaphore::new(concurrency.max(1))),
        }
    }

    /// Look up every package; the report does not depend on completion order
    pub async fn probe_all(&self, packages: &[String], progress: &LookupProgress) -> ProbeReport {
        let mut tasks = JoinSet::new();
        let mut pending = HashMap::new();

        for package in packages {
            let registry = Arc::clone(&self.registry);
            let semaphore = Arc::clone(&self.semaphore);
            let name = package.clone();

            let handle = tasks.spawn(async move {
                let outcome = match semaphore.acquire_owned().await {
                    Ok(_permit) => probe_one(registry.as_ref(), &name).await,
                    Err(e) => ProbeOutcome::Failed(e.to_string()),
                };
                (name, outcome)
            });
            pending.insert(handle.id(), package.clone());
        }

        let mut outcomes = Vec::with_capacity(packages.len());
        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((id, (name, outcome))) => {
                    pending.remove(&id);
                    progress.looked_up(&name);
                    outcomes.push((name, outcome));
                }
                Err(e) => {
                    if let Some(name) = pending.remove(&e.id()) {
                        tracing::warn!("lookup task for {} did not complete: {}", name, e);
                        progress.looked_up(&name);
                        outcomes.push((name, ProbeOutcome::Failed(e.to_string())));
                    }
                }
            }
        }

        ProbeReport::from_outcomes(outcomes)
    }
}

async fn probe_one(registry: &dyn TypesRegistry, package: &str) -> ProbeOutcome {
    match registry.exists(package).await {
        Ok(true) => ProbeOutcome::Found,
        Ok(false) => ProbeOutcome::NotFound,
        Err(e) => {
            tracing::debug!("lookup of {} failed: {}", package, e);
            ProbeOutcome::Failed(e.to_string())
        }
    }
}
