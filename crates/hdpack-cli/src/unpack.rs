//! Extracting archive entries to files
//!
//! Each entry is written to `<out_dir>/<name>.<extension>`, where the name
//! comes from the name database (or the hex name hash) and the extension is
//! the known type name (or the hex type hash). Script entries are unwrapped
//! from their resource envelope; other entries are written raw, and only
//! when asked to.

use std::path::{Path, PathBuf};

use hdpack_formats::{Archive, ArchiveScanner, KnownType, ScriptResource, TYPE_LUA, TypeHash};
use hdpack_hashdb::NameDatabase;

use crate::error::UnpackError;

/// Outcome of unpacking one or more archives
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnpackReport {
    /// Archives processed
    pub archives: usize,
    /// Files written
    pub written: usize,
    /// Entries of other types that were not requested
    pub skipped: usize,
    /// Script entries whose envelope could not be decoded
    pub invalid: usize,
}

impl std::ops::AddAssign for UnpackReport {
    fn add_assign(&mut self, other: Self) {
        self.archives += other.archives;
        self.written += other.written;
        self.skipped += other.skipped;
        self.invalid += other.invalid;
    }
}

/// File extension used for entries of `type_hash`
pub fn type_extension(type_hash: TypeHash) -> String {
    KnownType::from_hash(type_hash)
        .map_or_else(|| format!("{type_hash:016X}"), |t| t.name().to_string())
}

fn write_output(path: &Path, data: &[u8]) -> Result<(), UnpackError> {
    let write_error = |source| UnpackError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }
    std::fs::write(path, data).map_err(write_error)
}

/// Extract the entries of a decoded archive into `out_dir`
pub fn unpack(
    archive: &Archive,
    out_dir: &Path,
    db: &NameDatabase,
    include_unknown: bool,
) -> Result<UnpackReport, UnpackError> {
    let mut report = UnpackReport {
        archives: 1,
        ..UnpackReport::default()
    };

    for file in archive.files() {
        let display_name = db.display_name(file.name_hash);
        let path: PathBuf = out_dir.join(format!(
            "{display_name}.{}",
            type_extension(file.type_hash)
        ));

        if file.type_hash == TYPE_LUA {
            match ScriptResource::parse(&file.inline_buffer()) {
                Ok(resource) => {
                    tracing::debug!(name = %display_name, format = %resource.format, "found script");
                    write_output(&path, &resource.data)?;
                    report.written += 1;
                }
                Err(e) => {
                    tracing::warn!(name = %display_name, error = %e, "invalid script resource");
                    report.invalid += 1;
                }
            }
        } else if include_unknown {
            tracing::debug!(name = %display_name, "writing raw entry");
            write_output(&path, &file.inline_buffer())?;
            report.written += 1;
        } else {
            report.skipped += 1;
        }
    }

    Ok(report)
}

/// Read the archive at `path` and extract it into `out_dir`
pub fn unpack_file(
    path: &Path,
    out_dir: &Path,
    db: &NameDatabase,
    include_unknown: bool,
) -> Result<UnpackReport, UnpackError> {
    let archive = Archive::from_file(path)?;
    tracing::info!(path = %path.display(), version = %archive.version(), "loaded archive");
    unpack(&archive, out_dir, db, include_unknown)
}

/// Extract every archive found in `dir` into `out_dir`
///
/// An archive that fails to extract is logged and skipped.
pub fn unpack_all(
    dir: &Path,
    out_dir: &Path,
    db: &NameDatabase,
    include_unknown: bool,
) -> Result<UnpackReport, UnpackError> {
    let mut total = UnpackReport::default();
    for (path, archive) in ArchiveScanner::new(dir)? {
        match unpack(&archive, out_dir, db, include_unknown) {
            Ok(report) => {
                tracing::info!(path = %path.display(), written = report.written, "unpacked archive");
                total += report;
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to unpack archive");
            }
        }
    }
    Ok(total)
}
