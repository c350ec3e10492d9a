//! Cookie file discovery and import

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Extension that marks a file in the cookie directory as a cookie
pub const COOKIE_EXTENSION: &str = "txt";

/// List cookie filenames in `dir`.
///
/// A missing directory is the same as an empty one. Order is whatever the
/// directory walk yields — deliberately not sorted, because callers pair
/// the result positionally with the device list and sorting would change
/// every pairing. Entries that fail to stat are skipped.
pub fn list_cookie_files(dir: &Path) -> Vec<String> {
    if !dir.is_dir() {
        return Vec::new();
    }

    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .is_some_and(|ext| ext == COOKIE_EXTENSION)
        })
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .collect()
}

/// Copy cookie files into the cookie directory by basename, creating the
/// directory if it does not exist yet. Returns the destination paths.
pub fn import_cookies<P: AsRef<Path>>(files: &[P], dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let mut copied = Vec::with_capacity(files.len());
    for file in files {
        let file = file.as_ref();
        let name = file
            .file_name()
            .ok_or_else(|| Error::InvalidCookiePath(file.to_path_buf()))?;

        let dest = dir.join(name);
        fs::copy(file, &dest).map_err(|e| Error::FileRead {
            path: file.to_path_buf(),
            source: e,
        })?;
        copied.push(dest);
    }

    debug!(count = copied.len(), dir = %dir.display(), "imported cookie files");
    Ok(copied)
}
