//! Text output formatter for human-readable display
//!
//! This module provides:
//! - One line per package that will be uninstalled or installed
//! - Lookups that found nothing or failed
//! - Already typed and self typed dependencies in verbose mode
//! - Summary with counts

use crate::orchestrator::Analysis;
use crate::output::{OutputFormatter, Verbosity};
use colored::Colorize;
use std::io::Write;
use std::time::Duration;

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether this is a dry-run
    dry_run: bool,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity, dry_run: bool) -> Self {
        Self {
            verbosity,
            dry_run,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, dry_run: bool, color: bool) -> Self {
        Self {
            verbosity,
            dry_run,
            color,
        }
    }

    /// Get the dry-run prefix if applicable
    fn dry_run_prefix(&self) -> String {
        if self.dry_run {
            if self.color {
                format!("{} ", "(dry-run)".cyan())
            } else {
                "(dry-run) ".to_string()
            }
        } else {
            String::new()
        }
    }

    /// Write a labelled, comma separated list of dependency names
    fn format_name_list(
        &self,
        label: &str,
        names: &[String],
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if names.is_empty() {
            return Ok(());
        }

        let list = names.join(", ");
        if self.color {
            writeln!(writer, "{} {}", label.dimmed(), list.dimmed())
        } else {
            writeln!(writer, "{} {}", label, list)
        }
    }

    /// Write the uninstall lines
    fn format_uninstalls(&self, analysis: &Analysis, writer: &mut dyn Write) -> std::io::Result<()> {
        let prefix = self.dry_run_prefix();
        let classification = &analysis.classification;

        let reasons = classification
            .deprecated
            .iter()
            .map(|name| (name, "deprecated"))
            .chain(classification.unused.iter().map(|name| (name, "unused")));

        for (name, reason) in reasons {
            if self.color {
                writeln!(
                    writer,
                    "{}{} is {}. Uninstalling...",
                    prefix,
                    name.bold(),
                    reason.red()
                )?;
            } else {
                writeln!(writer, "{}{} is {}. Uninstalling...", prefix, name, reason)?;
            }
        }

        Ok(())
    }

    /// Write the lookups that will not lead to an install
    fn format_lookup_misses(
        &self,
        analysis: &Analysis,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if self.verbosity != Verbosity::Quiet {
            for name in &analysis.probes.not_found {
                if self.color {
                    writeln!(writer, "{}", format!("No types available for {}", name).dimmed())?;
                } else {
                    writeln!(writer, "No types available for {}", name)?;
                }
            }
        }

        // Failures are shown even in quiet mode
        for failure in &analysis.probes.failed {
            if self.color {
                writeln!(
                    writer,
                    "{} {}: {}",
                    "Could not look up".yellow(),
                    failure.name.bold(),
                    failure.reason
                )?;
            } else {
                writeln!(writer, "Could not look up {}: {}", failure.name, failure.reason)?;
            }
        }

        Ok(())
    }

    /// Write the install lines
    fn format_installs(&self, analysis: &Analysis, writer: &mut dyn Write) -> std::io::Result<()> {
        let prefix = self.dry_run_prefix();

        for name in &analysis.plan.install {
            if self.color {
                writeln!(writer, "{}{} {}", prefix, "Installing".green(), name.bold())?;
            } else {
                writeln!(writer, "{}Installing {}", prefix, name)?;
            }
        }

        Ok(())
    }

    /// Write the summary line
    fn format_summary(&self, analysis: &Analysis, writer: &mut dyn Write) -> std::io::Result<()> {
        let prefix = self.dry_run_prefix();
        let plan = &analysis.plan;
        let probes = &analysis.probes;

        let failed = if probes.has_failures() {
            format!(
                ", {} of {} lookups failed",
                probes.failed.len(),
                probes.total()
            )
        } else {
            String::new()
        };

        if plan.is_empty() {
            let done = if probes.has_failures() {
                "Nothing to install"
            } else {
                "Nothing needs to be installed"
            };
            return if self.color {
                writeln!(writer, "{}{}{}", prefix, done.green(), failed.yellow())
            } else {
                writeln!(writer, "{}{}{}", prefix, done, failed)
            };
        }

        let install_count = plan.install.len();
        let uninstall_count = plan.uninstall.len();

        if self.color {
            writeln!(
                writer,
                "{}{} to install, {} to uninstall{}",
                prefix,
                install_count.to_string().green(),
                uninstall_count.to_string().red(),
                failed.yellow()
            )
        } else {
            writeln!(
                writer,
                "{}{} to install, {} to uninstall{}",
                prefix, install_count, uninstall_count, failed
            )
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, analysis: &Analysis, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.verbosity == Verbosity::Verbose {
            self.format_name_list("Project:", &[analysis.root.display().to_string()], writer)?;
            self.format_name_list("Registry:", &[analysis.registry.clone()], writer)?;
            self.format_name_list(
                "Already typed:",
                &analysis.classification.already_typed,
                writer,
            )?;
            self.format_name_list("Self typed:", &analysis.classification.self_typed, writer)?;
        }

        if self.verbosity != Verbosity::Quiet {
            self.format_uninstalls(analysis, writer)?;
        }
        self.format_lookup_misses(analysis, writer)?;
        if self.verbosity != Verbosity::Quiet {
            self.format_installs(analysis, writer)?;
        }

        self.format_summary(analysis, writer)
    }

    fn format_completion(&self, elapsed: Duration, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.verbosity == Verbosity::Quiet {
            return Ok(());
        }

        let message = format!("All types are OK. Done in {:.2}s", elapsed.as_secs_f64());
        if self.color {
            writeln!(writer, "{}", message.green().bold())
        } else {
            writeln!(writer, "{}", message)
        }
    }
}
