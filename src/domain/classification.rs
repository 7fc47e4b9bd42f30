//! Classification of declared dependencies by their typing status

use serde::{Deserialize, Serialize};

/// Outcome of classifying a project's dependencies
///
/// `missing`, `deprecated` and `unused` hold `@types/*` package names;
/// `already_typed` and `self_typed` hold the plain dependency names they
/// were derived from and exist for reporting only. Every list is sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Types packages that may need installing (to be probed against the registry)
    pub missing: Vec<String>,
    /// Installed types packages made redundant by a self-typed dependency
    pub deprecated: Vec<String>,
    /// Installed types packages whose dependency is gone from the manifest
    pub unused: Vec<String>,
    /// Dependencies that already have a types package declared
    pub already_typed: Vec<String>,
    /// Dependencies that ship their own declarations
    pub self_typed: Vec<String>,
}

impl Classification {
    /// Returns the sorted, deduplicated union of `deprecated` and `unused`
    pub fn uninstall_candidates(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .deprecated
            .iter()
            .chain(self.unused.iter())
            .cloned()
            .collect();
        names.sort();
        names.dedup();
        names
    }
}
