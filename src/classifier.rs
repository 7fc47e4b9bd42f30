//! Dependency classification
//!
//! Partitions the declared dependencies of a project into:
//! - already typed: a matching `@types/*` package is declared
//! - self typed: the installed package ships its own declarations
//! - missing: neither of the above, so the registry is asked for types
//! - deprecated: self typed but an `@types/*` package is still declared
//! - unused: an `@types/*` package whose dependency is no longer declared
//!
//! The host runtime (`node`) is always treated as a declared dependency.

use crate::domain::{is_types_package, types_name, Classification, HOST_RUNTIME};
use crate::error::ManifestError;
use crate::manifest::{declares_own_types, PackageManifest};
use std::collections::{BTreeSet, HashSet};
use std::path::Path;

/// Dependencies never trusted to be self typed, unless configured otherwise
pub const DEFAULT_EXEMPT: &[&str] = &["jest"];

/// Classifies a project's dependencies by typing status
#[derive(Debug, Clone)]
pub struct Classifier {
    /// Names excluded from self-typed detection
    exempt: BTreeSet<String>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(DEFAULT_EXEMPT.iter().copied())
    }
}

impl Classifier {
    /// Create a classifier with the given self-typed exemptions
    pub fn new<I, S>(exempt: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            exempt: exempt.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if `dependency` is excluded from self-typed detection
    pub fn is_exempt(&self, dependency: &str) -> bool {
        self.exempt.contains(dependency)
    }

    /// Classify the project rooted at `root`
    ///
    /// Fails only if the project's package.json cannot be read or parsed.
    pub fn classify(&self, root: &Path) -> Result<Classification, ManifestError> {
        let manifest = PackageManifest::read(root)?;
        Ok(self.classify_manifest(&manifest, |dep| declares_own_types(root, dep)))
    }

    /// Classify an already parsed manifest
    ///
    /// `ships_types` reports whether the installed copy of a dependency
    /// carries its own declarations.
    pub fn classify_manifest<F>(&self, manifest: &PackageManifest, ships_types: F) -> Classification
    where
        F: Fn(&str) -> bool,
    {
        let all = manifest.dependency_set(HOST_RUNTIME);
        let (types_all, deps_all): (Vec<&str>, Vec<&str>) =
            all.iter().map(String::as_str).partition(|name| is_types_package(name));

        let declared_types: HashSet<&str> = types_all.iter().copied().collect();
        // types packages the declared dependencies would use
        let wanted_types: HashSet<String> = deps_all.iter().map(|dep| types_name(dep)).collect();

        let already_typed: HashSet<&str> = deps_all
            .iter()
            .copied()
            .filter(|dep| declared_types.contains(types_name(dep).as_str()))
            .collect();

        let self_typed: HashSet<&str> = deps_all
            .iter()
            .copied()
            .filter(|dep| !self.is_exempt(dep) && ships_types(dep))
            .collect();

        let missing = sorted(
            deps_all
                .iter()
                .filter(|dep| !self_typed.contains(*dep) && !already_typed.contains(*dep))
                .map(|dep| types_name(dep)),
        );

        let deprecated = sorted(
            already_typed
                .iter()
                .filter(|dep| self_typed.contains(*dep))
                .map(|dep| types_name(dep)),
        );

        let unused = sorted(
            types_all
                .iter()
                .filter(|types| !wanted_types.contains(**types))
                .map(|types| types.to_string()),
        );

        tracing::debug!(
            "classified {} dependencies: {} missing, {} deprecated, {} unused",
            deps_all.len(),
            missing.len(),
            deprecated.len(),
            unused.len()
        );

        Classification {
            missing,
            deprecated,
            unused,
            already_typed: sorted(already_typed.into_iter().map(str::to_string)),
            self_typed: sorted(self_typed.into_iter().map(str::to_string)),
        }
    }
}

fn sorted(names: impl Iterator<Item = String>) -> Vec<String> {
    let mut names: Vec<String> = names.collect();
    names.sort();
    names.dedup();
    names
}
