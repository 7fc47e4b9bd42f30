//! Manifest discovery and reading
//!
//! This module provides functionality to:
//! - Locate the project root (nearest directory with a package.json)
//! - Read the dependency names a package.json declares
//! - Inspect installed packages for bundled type declarations

mod installed;
mod locate;
mod package_json;

pub use installed::{
    declares_own_types, has_types_signal, installed_metadata_path, INSTALLED_PACKAGES_DIR,
};
pub use locate::find_project_root;
pub use package_json::{PackageManifest, MANIFEST_FILENAME};
