//! Lazy discovery of archives in a directory

use std::fs::ReadDir;
use std::path::{Path, PathBuf};

use crate::archive::Archive;
use crate::error::{FormatError, FormatResult};

/// Iterator over the archives found directly inside a directory
///
/// Archive files carry no extension, so entries with one are skipped, as
/// are subdirectories and files that fail to decode. Each archive is read
/// only when the iterator reaches it.
#[derive(Debug)]
pub struct ArchiveScanner {
    entries: ReadDir,
}

impl ArchiveScanner {
    /// Start scanning `dir`
    pub fn new(dir: &Path) -> FormatResult<Self> {
        let entries = std::fs::read_dir(dir).map_err(|source| FormatError::Open {
            path: dir.to_path_buf(),
            source,
        })?;
        Ok(Self { entries })
    }
}

fn is_candidate(path: &Path) -> bool {
    path.extension().is_none() && !path.is_dir()
}

impl Iterator for ArchiveScanner {
    type Item = (PathBuf, Archive);

    fn next(&mut self) -> Option<Self::Item> {
        for entry in self.entries.by_ref() {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    tracing::debug!(error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };
            if !is_candidate(&path) {
                continue;
            }

            match Archive::from_file(&path) {
                Ok(archive) => return Some((path, archive)),
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "skipping non-archive file");
                }
            }
        }
        None
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fixtures::{DirectEntry, direct_archive_bytes, packed_archive, packed_file};
    use crate::version::{ArchiveVersion, TYPE_LUA};
    use tempfile::TempDir;

    #[test]
    fn test_scan_skips_non_archives() {
        let dir = TempDir::new().expect("tempdir");
        let packed = packed_archive(vec![packed_file(TYPE_LUA, 1, &[b"x"])])
            .build()
            .expect("build");
        std::fs::write(dir.path().join("0123456789ABCDEF"), &packed).expect("write");
        std::fs::write(
            dir.path().join("FEDCBA9876543210"),
            direct_archive_bytes(7, &[DirectEntry::new(TYPE_LUA, 2, b"y")]),
        )
        .expect("write");
        std::fs::write(dir.path().join("notes.txt"), &packed).expect("write");
        std::fs::write(dir.path().join("garbage"), b"not an archive").expect("write");
        std::fs::create_dir(dir.path().join("nested")).expect("mkdir");

        let mut found: Vec<_> = ArchiveScanner::new(dir.path())
            .expect("scan")
            .map(|(path, archive)| {
                (
                    path.file_name().unwrap().to_string_lossy().into_owned(),
                    archive.version(),
                )
            })
            .collect();
        found.sort_by(|a, b| a.0.cmp(&b.0));

        assert_eq!(
            found,
            vec![
                ("0123456789ABCDEF".to_string(), ArchiveVersion::Packed),
                ("FEDCBA9876543210".to_string(), ArchiveVersion::Direct),
            ]
        );
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().expect("tempdir");
        assert!(matches!(
            ArchiveScanner::new(&dir.path().join("missing")),
            Err(FormatError::Open { .. })
        ));
    }
}
