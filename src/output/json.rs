//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of the analysis
//! - The plan the package manager is given

use crate::domain::ProbeFailure;
use crate::orchestrator::Analysis;
use crate::output::{OutputFormatter, Verbosity};
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
    /// Whether this is a dry-run
    dry_run: bool,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity, dry_run: bool) -> Self {
        Self { verbosity, dry_run }
    }
}

/// JSON representation of the full result
#[derive(Serialize)]
struct JsonOutput<'a> {
    /// Whether this was a dry-run
    dry_run: bool,
    /// Project root
    root: String,
    /// Registry the lookups went to
    registry: &'a str,
    /// Summary statistics
    summary: JsonSummary,
    /// Dependency classification
    classification: JsonClassification<'a>,
    /// Registry lookups
    lookups: JsonLookups<'a>,
    /// Packages handed to the package manager
    plan: JsonPlan<'a>,
}

/// JSON representation of summary statistics
#[derive(Serialize)]
struct JsonSummary {
    looked_up: usize,
    install: usize,
    uninstall: usize,
    not_found: usize,
    failed: usize,
}

/// JSON representation of the classification
#[derive(Serialize)]
struct JsonClassification<'a> {
    missing: &'a [String],
    deprecated: &'a [String],
    unused: &'a [String],
    /// Only in verbose mode
    #[serde(skip_serializing_if = "Option::is_none")]
    already_typed: Option<&'a [String]>,
    /// Only in verbose mode
    #[serde(skip_serializing_if = "Option::is_none")]
    self_typed: Option<&'a [String]>,
}

/// JSON representation of the registry lookups
#[derive(Serialize)]
struct JsonLookups<'a> {
    found: &'a [String],
    not_found: &'a [String],
    failed: &'a [ProbeFailure],
}

/// JSON representation of the plan
#[derive(Serialize)]
struct JsonPlan<'a> {
    uninstall: &'a [String],
    install: &'a [String],
}

impl JsonFormatter {
    /// Convert the analysis to its JSON representation
    fn to_json<'a>(&self, analysis: &'a Analysis) -> JsonOutput<'a> {
        let classification = &analysis.classification;
        let probes = &analysis.probes;
        let verbose = self.verbosity == Verbosity::Verbose;

        JsonOutput {
            dry_run: self.dry_run,
            root: analysis.root.display().to_string(),
            registry: &analysis.registry,
            summary: JsonSummary {
                looked_up: probes.total(),
                install: analysis.plan.install.len(),
                uninstall: analysis.plan.uninstall.len(),
                not_found: probes.not_found.len(),
                failed: probes.failed.len(),
            },
            classification: JsonClassification {
                missing: &classification.missing,
                deprecated: &classification.deprecated,
                unused: &classification.unused,
                already_typed: verbose.then_some(classification.already_typed.as_slice()),
                self_typed: verbose.then_some(classification.self_typed.as_slice()),
            },
            lookups: JsonLookups {
                found: &probes.found,
                not_found: &probes.not_found,
                failed: &probes.failed,
            },
            plan: JsonPlan {
                uninstall: &analysis.plan.uninstall,
                install: &analysis.plan.install,
            },
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, analysis: &Analysis, writer: &mut dyn Write) -> std::io::Result<()> {
        let output = self.to_json(analysis);
        let json = serde_json::to_string_pretty(&output).map_err(std::io::Error::other)?;
        writeln!(writer, "{}", json)
    }

    /// The report is the only JSON document on stdout
    fn format_completion(&self, _elapsed: Duration, _writer: &mut dyn Write) -> std::io::Result<()> {
        Ok(())
    }
}
