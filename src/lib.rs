//! ts-typie - keeps a project's `@types/*` packages in line with its dependencies
//!
//! This library provides the core functionality:
//! - Classifying declared dependencies by typing status
//! - Looking up missing `@types/*` packages in an npm-compatible registry
//! - Planning and running the uninstall and install commands (yarn or npm)

pub mod classifier;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod package_manager;
pub mod progress;
pub mod registry;
