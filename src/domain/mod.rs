//! Core domain models for ts-typie
//!
//! This module contains the fundamental types used throughout the application:
//! - Naming rules for `@types/*` packages
//! - Classification of declared dependencies
//! - Registry probe outcomes
//! - The reconcile plan handed to the package manager

mod classification;
mod names;
mod plan;
mod probe;

pub use classification::Classification;
pub use names::{is_types_package, types_name, HOST_RUNTIME, TYPES_NAMESPACE};
pub use plan::ReconcilePlan;
pub use probe::{ProbeFailure, ProbeOutcome, ProbeReport};
