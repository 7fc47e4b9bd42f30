//! CLI argument parsing module for ts-typie

use crate::package_manager::PackageTool;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Parse a concurrency limit (a positive integer)
fn parse_concurrency(s: &str) -> Result<usize, String> {
    let value: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid number: {}", s))?;

    if value == 0 {
        return Err("concurrency must be at least 1".to_string());
    }

    Ok(value)
}

/// Install missing @types packages and remove the ones no longer needed
#[derive(Parser, Debug, Clone)]
#[command(
    name = "ts-typie",
    version,
    about = "Install missing @types packages and remove the ones no longer needed"
)]
pub struct CliArgs {
    /// Project directory (default: current directory; parents are searched for package.json)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    // Package manager options
    /// Package manager to run (default: first of yarn, npm found on PATH)
    #[arg(short, long, value_enum)]
    pub tool: Option<PackageTool>,

    /// Registry to look @types packages up in
    #[arg(long, value_name = "URL")]
    pub registry: Option<String>,

    /// Never treat this dependency as shipping its own types (can be specified multiple times)
    #[arg(long, value_name = "NAME", action = ArgAction::Append)]
    pub exempt: Vec<String>,

    /// Maximum number of registry lookups in flight
    #[arg(long, value_name = "N", value_parser = parse_concurrency)]
    pub concurrency: Option<usize>,

    // General options
    /// Dry run mode - show what would be installed and removed without running the package manager
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,

    // Output options
    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,
}

impl CliArgs {
    /// Whether the spinner should be shown
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.json
    }
}
