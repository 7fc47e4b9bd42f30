//! ts-typie - installs missing `@types/*` packages and removes the ones no longer needed
//!
//! Reads package.json, asks the registry which type packages exist and runs
//! yarn or npm to reconcile them.

use clap::Parser;
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use ts_typie::cli::CliArgs;
use ts_typie::config::{Settings, Sources};
use ts_typie::manifest::find_project_root;
use ts_typie::orchestrator::Orchestrator;
use ts_typie::output::{create_formatter, OutputConfig};
use ts_typie::package_manager::{PackageTool, Reconciler, SystemCommandRunner};

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("ts_typie=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ts_typie=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    tracing::debug!("ts-typie starting with args: {:?}", args);

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let started = Instant::now();

    // Resolve the project and its settings
    let root = find_project_root(&args.path)?;
    let settings = Settings::resolve(&args, &root, &Sources::from_environment())?;

    // The tool is needed even in dry-run mode, so a missing one fails early
    let tool = settings.package_tool(PackageTool::detect_on_path)?;
    tracing::debug!("using {} in {}", tool, root.display());

    // Classify, look up and plan
    let orchestrator = Orchestrator::new(settings, args.show_progress())?;
    let analysis = orchestrator.analyze().await?;

    // Create output formatter based on CLI options
    let output_config = OutputConfig::from_cli(args.json, args.verbose, args.quiet, args.dry_run)
        .with_color(io::stdout().is_terminal());
    let formatter = create_formatter(output_config);

    // Report before anything is changed
    {
        let mut stdout = io::stdout().lock();
        formatter.format(&analysis, &mut stdout)?;
        stdout.flush()?;
    }

    if !args.dry_run {
        let runner = SystemCommandRunner::with_stdout_to_stderr(args.json);
        let reconciler = Reconciler::new(tool, runner);
        reconciler.apply(&analysis.plan, &analysis.root)?;

        let mut stdout = io::stdout().lock();
        formatter.format_completion(started.elapsed(), &mut stdout)?;
        stdout.flush()?;
    }

    if analysis.has_failures() {
        // Partial success - some lookups could not be completed
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
