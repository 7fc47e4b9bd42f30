//! Reconcile plan: what to uninstall and what to install

use super::{Classification, ProbeReport};
use serde::{Deserialize, Serialize};

/// Package lists handed to the package manager
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcilePlan {
    /// Deprecated and unused types packages, sorted and deduplicated
    pub uninstall: Vec<String>,
    /// Types packages confirmed by the registry
    pub install: Vec<String>,
}

impl ReconcilePlan {
    /// Builds the plan from a classification and the registry probes of its `missing` list
    ///
    /// Only packages the registry confirmed are installed; failed probes are left out.
    pub fn new(classification: &Classification, probes: &ProbeReport) -> Self {
        Self {
            uninstall: classification.uninstall_candidates(),
            install: probes.found.clone(),
        }
    }

    /// Returns true if no command needs to run
    pub fn is_empty(&self) -> bool {
        self.uninstall.is_empty() && self.install.is_empty()
    }
}
