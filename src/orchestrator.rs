//! Orchestrator for the analysis pipeline
//!
//! This module provides:
//! - Workflow coordination: classify → probe → plan
//! - Parallel registry lookups with a concurrency limit
//! - Progress display while the registry is queried

use crate::classifier::Classifier;
use crate::config::Settings;
use crate::domain::{Classification, ProbeReport, ReconcilePlan};
use crate::error::AppError;
use crate::progress::LookupProgress;
use crate::registry::{HttpClient, NpmRegistry, Prober, TypesRegistry};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Everything learned about a project before any command runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    /// Project root
    pub root: PathBuf,
    /// Registry the lookups went to
    pub registry: String,
    /// Dependencies by typing status
    pub classification: Classification,
    /// Registry lookups of the missing types packages
    pub probes: ProbeReport,
    /// What the package manager is asked to do
    pub plan: ReconcilePlan,
}

impl Analysis {
    /// Returns true if some lookups could not be completed
    pub fn has_failures(&self) -> bool {
        self.probes.has_failures()
    }
}

/// Orchestrator for the analysis pipeline
pub struct Orchestrator {
    /// Resolved settings for this run
    settings: Settings,
    /// Registry the missing packages are looked up in
    registry: Arc<dyn TypesRegistry>,
    /// Whether to draw the progress bar
    show_progress: bool,
}

impl Orchestrator {
    /// Create an orchestrator querying the configured npm registry
    pub fn new(settings: Settings, show_progress: bool) -> Result<Self, AppError> {
        let client = HttpClient::new()?;
        let registry = Arc::new(NpmRegistry::new(client, settings.registry.clone()));

        Ok(Self {
            settings,
            registry,
            show_progress,
        })
    }

    /// Create an orchestrator with a custom registry (for testing)
    pub fn with_registry(settings: Settings, registry: Arc<dyn TypesRegistry>) -> Self {
        Self {
            settings,
            registry,
            show_progress: false,
        }
    }

    /// Classify the project, look up its missing types packages and build the plan
    pub async fn analyze(&self) -> Result<Analysis, AppError> {
        let mut progress = LookupProgress::new(self.show_progress);

        // Step 1: Classify declared dependencies
        progress.reading_manifest(&self.settings.root);
        let classifier = Classifier::new(self.settings.exempt.iter().cloned());
        let classification = classifier.classify(&self.settings.root);
        progress.finish();
        let classification = classification?;

        // Step 2: Look up missing types packages
        tracing::info!(
            "looking up {} packages in {}",
            classification.missing.len(),
            self.registry.registry_url()
        );
        progress.lookups(classification.missing.len());
        let prober = Prober::new(Arc::clone(&self.registry), self.settings.concurrency);
        let probes = prober.probe_all(&classification.missing, &progress).await;
        progress.finish();

        // Step 3: Build the plan
        let plan = ReconcilePlan::new(&classification, &probes);

        Ok(Analysis {
            root: self.settings.root.clone(),
            registry: self.registry.registry_url().to_string(),
            classification,
            probes,
            plan,
        })
    }
}
