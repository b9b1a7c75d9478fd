//! Filesystem helpers that map `std::io` failures to [`CoreError::Filesystem`].

use crate::error::CoreError;
use std::fs;
use std::io;
use std::path::Path;

/// Creates `path` and any missing parents.
///
/// Succeeds when the directory already exists. Fails when something other than a
/// directory occupies the path.
pub fn ensure_dir_exists(path: &Path) -> Result<(), CoreError> {
    if path.exists() {
        if path.is_dir() {
            return Ok(());
        }
        return Err(CoreError::Filesystem {
            message: "Path exists but is not a directory".to_string(),
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::AlreadyExists, "Path exists but is not a directory"),
        });
    }
    fs::create_dir_all(path).map_err(|e| CoreError::Filesystem {
        message: "Failed to create directory".to_string(),
        path: path.to_path_buf(),
        source: e,
    })
}

/// Reads an optional file. A missing file yields `Ok(None)`.
pub fn read_optional_to_string(path: &Path) -> Result<Option<String>, io::Error> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
