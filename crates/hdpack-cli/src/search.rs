//! Finding archives that contain entries of a given type

use std::path::{Path, PathBuf};

use hdpack_formats::{ArchiveScanner, FormatResult, TypeHash};

/// One matching entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatch {
    /// Archive path
    pub path: PathBuf,
    /// Position of the entry in the archive's file table
    pub index: usize,
}

/// Look through the archives in `dir` for entries of `type_hash`
///
/// Scanning stops at the first match unless `all` is set; archives after it
/// are never read.
pub fn search(dir: &Path, type_hash: TypeHash, all: bool) -> FormatResult<Vec<SearchMatch>> {
    let mut matches = Vec::new();

    for (path, archive) in ArchiveScanner::new(dir)? {
        tracing::debug!(path = %path.display(), "checking archive");
        for (index, file) in archive.files().iter().enumerate() {
            if file.type_hash != type_hash {
                continue;
            }
            tracing::info!(path = %path.display(), index, "found match");
            matches.push(SearchMatch {
                path: path.clone(),
                index,
            });
            if !all {
                return Ok(matches);
            }
        }
    }

    Ok(matches)
}
