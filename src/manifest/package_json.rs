//! package.json reader
//!
//! Only the keys of `dependencies` and `devDependencies` matter; version
//! specifiers are never interpreted.

use crate::error::ManifestError;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;

/// Manifest filename looked up in the project root
pub const MANIFEST_FILENAME: &str = "package.json";

/// Dependency names declared by a package.json
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageManifest {
    /// Keys of `dependencies`
    pub dependencies: Vec<String>,
    /// Keys of `devDependencies`
    pub dev_dependencies: Vec<String>,
}

impl PackageManifest {
    /// Parse manifest content; `path` is only used for error context
    pub fn parse(content: &str, path: &Path) -> Result<Self, ManifestError> {
        let json: Value = serde_json::from_str(content)
            .map_err(|e| ManifestError::json_parse_error(path, e.to_string()))?;

        Ok(Self {
            dependencies: object_keys(&json, "dependencies"),
            dev_dependencies: object_keys(&json, "devDependencies"),
        })
    }

    /// Read and parse `<root>/package.json`
    pub fn read(root: &Path) -> Result<Self, ManifestError> {
        let path = root.join(MANIFEST_FILENAME);
        let content =
            std::fs::read_to_string(&path).map_err(|e| ManifestError::read_error(&path, e))?;
        Self::parse(&content, &path)
    }

    /// Returns the deduplicated dependency set, led by `host_runtime`
    pub fn dependency_set(&self, host_runtime: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        std::iter::once(host_runtime)
            .chain(self.dependencies.iter().map(String::as_str))
            .chain(self.dev_dependencies.iter().map(String::as_str))
            .filter(|name| seen.insert(*name))
            .map(str::to_string)
            .collect()
    }
}

/// Keys of `json[field]`; anything other than an object counts as empty
fn object_keys(json: &Value, field: &str) -> Vec<String> {
    json.get(field)
        .and_then(|v| v.as_object())
        .map(|deps| deps.keys().cloned().collect())
        .unwrap_or_default()
}
