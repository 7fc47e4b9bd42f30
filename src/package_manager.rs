//! Package manager integration for reconciling `@types/*` packages
//!
//! This module provides:
//! - The supported package manager tools and their command templates
//! - Detection of the first tool available on PATH
//! - A runner abstraction over process execution
//! - The reconciler issuing the uninstall and install batches

use crate::domain::ReconcilePlan;
use crate::error::ToolError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Supported package manager tools, in detection order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PackageTool {
    Yarn,
    Npm,
}

impl PackageTool {
    /// Returns all supported tools; the first one found is the default
    pub fn all() -> &'static [PackageTool] {
        &[PackageTool::Yarn, PackageTool::Npm]
    }

    /// Executable name
    pub fn program(&self) -> &'static str {
        match self {
            PackageTool::Yarn => "yarn",
            PackageTool::Npm => "npm",
        }
    }

    /// Command prefix adding packages as development dependencies
    pub fn install_command(&self) -> &'static [&'static str] {
        match self {
            PackageTool::Yarn => &["yarn", "add", "-D"],
            PackageTool::Npm => &["npm", "install", "-D"],
        }
    }

    /// Command prefix removing packages
    pub fn uninstall_command(&self) -> &'static [&'static str] {
        match self {
            PackageTool::Yarn => &["yarn", "remove"],
            PackageTool::Npm => &["npm", "uninstall"],
        }
    }

    /// Returns the first tool for which `is_available` holds
    pub fn detect<F>(is_available: F) -> Option<Self>
    where
        F: Fn(&str) -> bool,
    {
        Self::all()
            .iter()
            .copied()
            .find(|tool| is_available(tool.program()))
    }

    /// Returns the first tool found on PATH
    pub fn detect_on_path() -> Option<Self> {
        Self::detect(|program| which::which(program).is_ok())
    }

    /// Use `explicit` if given, otherwise detect with `detect`
    pub fn resolve<F>(explicit: Option<PackageTool>, detect: F) -> Result<Self, ToolError>
    where
        F: FnOnce() -> Option<PackageTool>,
    {
        if let Some(tool) = explicit {
            return Ok(tool);
        }

        detect().ok_or_else(|| ToolError::NoneAvailable {
            tried: Self::all()
                .iter()
                .map(|t| t.program())
                .collect::<Vec<_>>()
                .join(", "),
        })
    }
}

impl fmt::Display for PackageTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program())
    }
}

/// Exit status of a finished command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    /// Whether the command exited successfully
    pub success: bool,
    /// Exit code, if the command was not terminated by a signal
    pub code: Option<i32>,
}

impl CommandStatus {
    /// A successful exit
    pub fn success() -> Self {
        Self {
            success: true,
            code: Some(0),
        }
    }

    /// A failed exit with the given code
    pub fn failure(code: i32) -> Self {
        Self {
            success: false,
            code: Some(code),
        }
    }
}

/// Trait for running package manager commands
pub trait CommandRunner {
    /// Run `command` (program followed by arguments) in `working_dir`
    fn run(&self, command: &[String], working_dir: &Path) -> std::io::Result<CommandStatus>;
}

/// Runner that executes real processes
#[derive(Debug, Default)]
pub struct SystemCommandRunner {
    /// Send the child's stdout to our stderr (keeps machine-readable stdout clean)
    stdout_to_stderr: bool,
}

impl SystemCommandRunner {
    /// Create a runner inheriting stdio
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a runner whose child stdout is redirected to stderr
    pub fn with_stdout_to_stderr(stdout_to_stderr: bool) -> Self {
        Self { stdout_to_stderr }
    }

    /// Resolve the program through PATH (picks up `npm.cmd` and friends on Windows)
    fn resolve_program(program: &str) -> PathBuf {
        which::which(program).unwrap_or_else(|_| PathBuf::from(program))
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, command: &[String], working_dir: &Path) -> std::io::Result<CommandStatus> {
        let Some((program, args)) = command.split_first() else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Empty command",
            ));
        };

        let mut cmd = Command::new(Self::resolve_program(program));
        cmd.args(args).current_dir(working_dir);
        if self.stdout_to_stderr {
            cmd.stdout(Stdio::from(std::io::stderr()));
        }

        let status = cmd.status()?;
        Ok(CommandStatus {
            success: status.success(),
            code: status.code(),
        })
    }
}

/// Issues the uninstall and install batches of a plan through one tool
pub struct Reconciler<R> {
    tool: PackageTool,
    runner: R,
}

impl<R: CommandRunner> Reconciler<R> {
    /// Create a reconciler for the selected tool
    pub fn new(tool: PackageTool, runner: R) -> Self {
        Self { tool, runner }
    }

    /// Commands the plan translates to, uninstall batch first; empty lists produce no command
    pub fn commands(&self, plan: &ReconcilePlan) -> Vec<Vec<String>> {
        let batches = [
            (self.tool.uninstall_command(), &plan.uninstall),
            (self.tool.install_command(), &plan.install),
        ];

        batches
            .into_iter()
            .filter(|(_, packages)| !packages.is_empty())
            .map(|(prefix, packages)| {
                prefix
                    .iter()
                    .map(|part| part.to_string())
                    .chain(packages.iter().cloned())
                    .collect()
            })
            .collect()
    }

    /// Run the plan's commands in order, stopping at the first failure
    ///
    /// Returns the command lines that ran.
    pub fn apply(&self, plan: &ReconcilePlan, working_dir: &Path) -> Result<Vec<String>, ToolError> {
        let mut executed = Vec::new();

        for command in self.commands(plan) {
            let command_str = command.join(" ");
            tracing::info!("running {}", command_str);

            let status = self
                .runner
                .run(&command, working_dir)
                .map_err(|source| ToolError::SpawnFailed {
                    command: command_str.clone(),
                    source,
                })?;

            if !status.success {
                return Err(ToolError::CommandFailed {
                    command: command_str,
                    code: status.code,
                });
            }

            executed.push(command_str);
        }

        Ok(executed)
    }
}
