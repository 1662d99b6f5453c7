//! Patching script entries of packed archives
//!
//! For every script entry, a patch file named after the entry is looked up
//! in the patch directory. When one exists it is compiled, wrapped in a
//! resource envelope carrying the entry's current format tag, and stored as
//! the entry's first variant. Everything else is written back unchanged.

use std::path::{Path, PathBuf};

use hdpack_formats::{Archive, NameHash, PackedArchive, ScriptResource, TYPE_LUA};
use hdpack_hashdb::NameDatabase;

use crate::compiler::ScriptCompiler;
use crate::error::RepackError;

/// Extension of patch scripts
pub const PATCH_EXTENSION: &str = "lua";

/// Outcome of patching one archive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepackReport {
    /// Entries whose first variant was replaced
    pub patched: Vec<NameHash>,
    /// Entries with a patch file that could not be applied, and why
    pub failed: Vec<(NameHash, String)>,
}

impl RepackReport {
    /// Whether any patch failed
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Patch file for the entry displayed as `display_name`
pub fn patch_path(patch_dir: &Path, display_name: &str) -> PathBuf {
    patch_dir.join(format!("{display_name}.{PATCH_EXTENSION}"))
}

/// Apply patches to the script entries of `archive` in place
///
/// Failures are per entry: they are logged, recorded in the report and the
/// entry is left as it was.
pub fn patch_archive(
    archive: &mut PackedArchive,
    patch_dir: &Path,
    compiler: &dyn ScriptCompiler,
    db: &NameDatabase,
) -> RepackReport {
    let mut report = RepackReport::default();

    for file in archive.files.iter_mut().filter(|f| f.type_hash == TYPE_LUA) {
        let display_name = db.display_name(file.name_hash);
        let script = patch_path(patch_dir, &display_name);
        if !script.is_file() {
            continue;
        }

        tracing::info!(script = %script.display(), "compiling patch script");
        let result = compiler
            .compile(&script)
            .map_err(|e| e.to_string())
            .and_then(|bytecode| {
                let mut resource =
                    ScriptResource::parse(&file.inline_buffer()).map_err(|e| e.to_string())?;
                resource.data = bytecode;
                resource.build().map_err(|e| e.to_string())
            })
            .and_then(|envelope| {
                file.replace_variant(0, envelope)
                    .map(|_| ())
                    .ok_or_else(|| "entry has no variants".to_string())
            });

        match result {
            Ok(()) => {
                tracing::info!(name = %display_name, "patched script");
                report.patched.push(file.name_hash);
            }
            Err(reason) => {
                tracing::warn!(name = %display_name, %reason, "skipping script");
                report.failed.push((file.name_hash, reason));
            }
        }
    }

    report
}

/// Patch a decoded archive and write the result to `dest`
///
/// Only packed archives can be re-encoded; direct archives are rejected
/// before anything is compiled or written.
pub fn repack(
    archive: Archive,
    dest: &Path,
    patch_dir: &Path,
    compiler: &dyn ScriptCompiler,
    db: &NameDatabase,
) -> Result<RepackReport, RepackError> {
    let mut archive = archive
        .into_packed()
        .map_err(|other| RepackError::UnsupportedFormat(other.version()))?;

    let report = patch_archive(&mut archive, patch_dir, compiler, db);

    let bytes = archive.build().map_err(RepackError::Encode)?;
    std::fs::write(dest, bytes).map_err(|source| RepackError::Write {
        path: dest.to_path_buf(),
        source,
    })?;
    tracing::info!(
        dest = %dest.display(),
        patched = report.patched.len(),
        failed = report.failed.len(),
        "wrote patched archive"
    );
    Ok(report)
}

/// Read `original`, patch it from `patch_dir` and write it to `dest`
///
/// The patch directory is created if it does not exist yet.
pub fn repack_file(
    original: &Path,
    dest: &Path,
    patch_dir: &Path,
    compiler: &dyn ScriptCompiler,
    db: &NameDatabase,
) -> Result<RepackReport, RepackError> {
    std::fs::create_dir_all(patch_dir).map_err(|source| RepackError::PatchDirectory {
        path: patch_dir.to_path_buf(),
        source,
    })?;
    let archive = Archive::from_file(original)?;
    repack(archive, dest, patch_dir, compiler, db)
}
