//! Project root lookup

use super::MANIFEST_FILENAME;
use crate::error::ManifestError;
use std::path::{Path, PathBuf};

/// Find the nearest directory at or above `start` that contains a package.json
pub fn find_project_root(start: &Path) -> Result<PathBuf, ManifestError> {
    let start = std::path::absolute(start).map_err(|e| ManifestError::read_error(start, e))?;

    start
        .ancestors()
        .find(|dir| dir.join(MANIFEST_FILENAME).is_file())
        .map(Path::to_path_buf)
        .ok_or_else(|| ManifestError::not_found(&start))
}
