//! Building target sets from a directory of archives

use std::path::Path;

use hdpack_formats::{ArchiveScanner, FormatResult};
use hdpack_hashdb::TargetSet;

/// Which keys to collect
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetKinds {
    /// Archive file names, parsed as hex
    pub packages: bool,
    /// Entry type hashes
    pub types: bool,
    /// Entry name hashes
    pub files: bool,
}

impl TargetKinds {
    /// Whether nothing would be collected
    pub const fn is_empty(&self) -> bool {
        !(self.packages || self.types || self.files)
    }
}

/// Collect the keys used by the archives in `dir`
pub fn collect_targets(dir: &Path, kinds: TargetKinds) -> FormatResult<TargetSet> {
    let mut targets = TargetSet::new();

    for (path, archive) in ArchiveScanner::new(dir)? {
        if kinds.packages {
            let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
            match u64::from_str_radix(&name, 16) {
                Ok(key) => {
                    targets.insert(key);
                }
                Err(_) => tracing::warn!(package = %name, "package has a non-hash name"),
            }
        }

        for file in archive.files() {
            if kinds.types {
                targets.insert(file.type_hash);
            }
            if kinds.files {
                targets.insert(file.name_hash);
            }
        }
    }

    tracing::debug!(entries = targets.len(), "collected targets");
    Ok(targets)
}
