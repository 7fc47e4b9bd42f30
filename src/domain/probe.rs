//! Registry probe outcomes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of looking up one types package in the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// The registry confirmed the package exists
    Found,
    /// The registry answered that the package does not exist
    NotFound,
    /// The lookup could not be completed
    Failed(String),
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Found => write!(f, "found"),
            ProbeOutcome::NotFound => write!(f, "not found"),
            ProbeOutcome::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// A probe that could not be completed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeFailure {
    /// Types package name
    pub name: String,
    /// Why the lookup failed
    pub reason: String,
}

/// Probe outcomes grouped by status, each group sorted by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeReport {
    pub found: Vec<String>,
    pub not_found: Vec<String>,
    pub failed: Vec<ProbeFailure>,
}

impl ProbeReport {
    /// Groups outcomes; the arrival order of outcomes does not matter
    pub fn from_outcomes(outcomes: impl IntoIterator<Item = (String, ProbeOutcome)>) -> Self {
        let mut report = ProbeReport::default();

        for (name, outcome) in outcomes {
            match outcome {
                ProbeOutcome::Found => report.found.push(name),
                ProbeOutcome::NotFound => report.not_found.push(name),
                ProbeOutcome::Failed(reason) => report.failed.push(ProbeFailure { name, reason }),
            }
        }

        report.found.sort();
        report.not_found.sort();
        report.failed.sort_by(|a, b| a.name.cmp(&b.name));
        report
    }

    /// Returns true if at least one lookup failed
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Total number of probed packages
    pub fn total(&self) -> usize {
        self.found.len() + self.not_found.len() + self.failed.len()
    }
}
