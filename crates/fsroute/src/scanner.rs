//! Recursive discovery of route files

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::convention::Convention;
use crate::error::RouteError;

/// Finds every route file under `root`
///
/// Entries are visited sorted by file name, so the result is stable for a
/// given tree. Symlinked files are included; symlinked directories are not
/// descended into.
///
/// # Errors
///
/// [`RouteError::NotFound`] if `root` is missing or not a directory,
/// [`RouteError::Scan`] if a directory cannot be read.
pub fn scan(root: &Path, convention: &Convention) -> Result<Vec<PathBuf>, RouteError> {
    if !root.is_dir() {
        return Err(RouteError::NotFound {
            path: root.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.path().is_file() && convention.matches(entry.path()) {
            files.push(entry.into_path());
        }
    }

    debug!(root = %root.display(), count = files.len(), "scanned route files");

    Ok(files)
}
