//! Metadata of installed packages under node_modules
//!
//! A package is self-typed when its own package.json points at a
//! declaration entry (`types` / `typings`) or lists a `.d.ts` file in
//! `files`. Missing or malformed metadata is never an error here; it simply
//! carries no typing signal.

use super::MANIFEST_FILENAME;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Directory holding installed packages, relative to the project root
pub const INSTALLED_PACKAGES_DIR: &str = "node_modules";

/// Suffix of TypeScript declaration files
const DECLARATION_SUFFIX: &str = ".d.ts";

/// Fields naming a declaration entry point
const TYPES_ENTRY_FIELDS: [&str; 2] = ["types", "typings"];

/// Path of the installed package.json for `dependency`
pub fn installed_metadata_path(root: &Path, dependency: &str) -> PathBuf {
    let mut path = root.join(INSTALLED_PACKAGES_DIR);
    // scoped names span two directories
    for segment in dependency.split('/') {
        path.push(segment);
    }
    path.push(MANIFEST_FILENAME);
    path
}

/// Returns true if the installed copy of `dependency` ships its own declarations
pub fn declares_own_types(root: &Path, dependency: &str) -> bool {
    let path = installed_metadata_path(root, dependency);

    let Ok(content) = std::fs::read_to_string(&path) else {
        return false;
    };

    match serde_json::from_str::<Value>(&content) {
        Ok(metadata) => has_types_signal(&metadata),
        Err(e) => {
            tracing::debug!("ignoring unreadable metadata {}: {}", path.display(), e);
            false
        }
    }
}

/// Inspect a parsed package.json for typing signals
pub fn has_types_signal(metadata: &Value) -> bool {
    let has_entry = TYPES_ENTRY_FIELDS.iter().any(|field| {
        metadata
            .get(field)
            .and_then(|v| v.as_str())
            .is_some_and(|entry| !entry.is_empty())
    });

    has_entry || lists_declaration_file(metadata)
}

fn lists_declaration_file(metadata: &Value) -> bool {
    metadata
        .get("files")
        .and_then(|v| v.as_array())
        .is_some_and(|files| {
            files
                .iter()
                .filter_map(|f| f.as_str())
                .any(|f| f.ends_with(DECLARATION_SUFFIX))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn install(root: &Path, dependency: &str, metadata: &str) {
        let path = installed_metadata_path(root, dependency);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, metadata).unwrap();
    }

    #[test]
    fn test_types_field() {
        assert!(has_types_signal(&json!({"types": "index.d.ts"})));
    }

    #[test]
    fn test_typings_field() {
        assert!(has_types_signal(&json!({"typings": "./dist/main.d.ts"})));
    }

    #[test]
    fn test_empty_types_field_is_no_signal() {
        assert!(!has_types_signal(&json!({"types": ""})));
    }

    #[test]
    fn test_non_string_types_field_is_no_signal() {
        assert!(!has_types_signal(&json!({"types": true})));
    }

    #[test]
    fn test_files_with_declaration() {
        assert!(has_types_signal(
            &json!({"files": ["index.js", "index.d.ts"]})
        ));
        assert!(has_types_signal(&json!({"files": ["dist/**/*.d.ts"]})));
    }

    #[test]
    fn test_files_without_declaration() {
        assert!(!has_types_signal(&json!({"files": ["index.js", "lib/"]})));
        assert!(!has_types_signal(&json!({"files": ["index.d.ts.map"]})));
    }

    #[test]
    fn test_no_signal() {
        assert!(!has_types_signal(&json!({"name": "left-pad", "main": "index.js"})));
    }

    #[test]
    fn test_metadata_path_scoped() {
        let path = installed_metadata_path(Path::new("/project"), "@babel/core");
        assert_eq!(
            path,
            Path::new("/project")
                .join("node_modules")
                .join("@babel")
                .join("core")
                .join("package.json")
        );
    }

    #[test]
    fn test_declares_own_types_installed() {
        let dir = TempDir::new().unwrap();
        install(dir.path(), "chalk", r#"{"name": "chalk", "types": "index.d.ts"}"#);
        assert!(declares_own_types(dir.path(), "chalk"));
    }

    #[test]
    fn test_declares_own_types_not_installed() {
        let dir = TempDir::new().unwrap();
        assert!(!declares_own_types(dir.path(), "chalk"));
    }

    #[test]
    fn test_declares_own_types_malformed_metadata() {
        let dir = TempDir::new().unwrap();
        install(dir.path(), "broken", "{ not json");
        assert!(!declares_own_types(dir.path(), "broken"));
    }

    #[test]
    fn test_declares_own_types_scoped() {
        let dir = TempDir::new().unwrap();
        install(
            dir.path(),
            "@scope/typed",
            r#"{"files": ["dist/index.js", "dist/index.d.ts"]}"#,
        );
        assert!(declares_own_types(dir.path(), "@scope/typed"));
    }
}
