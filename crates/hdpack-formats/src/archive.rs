//! Version-independent read view over packed and direct archives

use std::borrow::Cow;
use std::path::Path;

use crate::direct::DirectArchive;
use crate::error::{FormatError, FormatResult};
use crate::packed::{PackedArchive, Variant};
use crate::version::{ArchiveVersion, NameHash, TypeHash};

/// An archive of either version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Archive {
    /// Chunk-compressed packed archive
    Packed(PackedArchive),
    /// Single-buffer direct archive
    Direct(DirectArchive),
}

/// Type table entry as seen through [`Archive::types`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    /// Type hash
    pub type_hash: TypeHash,
}

/// File table entry as seen through [`Archive::files`]
#[derive(Debug, Clone, Copy)]
pub struct FileDescriptor<'a> {
    /// Name hash
    pub name_hash: NameHash,
    /// Type hash
    pub type_hash: TypeHash,
    content: FileContent<'a>,
}

#[derive(Debug, Clone, Copy)]
enum FileContent<'a> {
    Variants(&'a [Variant]),
    Inline(&'a [u8]),
}

impl<'a> FileDescriptor<'a> {
    /// File content: the inline buffer of a direct file, or the
    /// concatenated variants of a packed file
    ///
    /// Packed content is assembled on each call; direct content is borrowed.
    pub fn inline_buffer(&self) -> Cow<'a, [u8]> {
        match self.content {
            FileContent::Inline(data) => Cow::Borrowed(data),
            FileContent::Variants([single]) => Cow::Borrowed(&single.data),
            FileContent::Variants(variants) => {
                Cow::Owned(variants.iter().flat_map(|v| v.data.iter().copied()).collect())
            }
        }
    }

    /// Size of [`Self::inline_buffer`] without assembling it
    pub fn inline_size(&self) -> usize {
        match self.content {
            FileContent::Inline(data) => data.len(),
            FileContent::Variants(variants) => variants.iter().map(|v| v.data.len()).sum(),
        }
    }
}

impl Archive {
    /// Decode an archive, choosing the format from its version marker
    pub fn parse(data: &[u8]) -> FormatResult<Self> {
        match ArchiveVersion::detect(data)? {
            ArchiveVersion::Packed => PackedArchive::parse(data).map(Self::Packed),
            ArchiveVersion::Direct => DirectArchive::parse(data).map(Self::Direct),
        }
    }

    /// Read and decode an archive file
    pub fn from_file(path: &Path) -> FormatResult<Self> {
        let data = std::fs::read(path).map_err(|source| FormatError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&data)
    }

    /// Version marker
    pub fn version(&self) -> ArchiveVersion {
        match self {
            Self::Packed(_) => ArchiveVersion::Packed,
            Self::Direct(_) => ArchiveVersion::Direct,
        }
    }

    /// Header checksum; packed archives carry none and report 0
    pub fn checksum(&self) -> u32 {
        match self {
            Self::Packed(_) => 0,
            Self::Direct(archive) => archive.header.checksum,
        }
    }

    /// Type table in archive order
    pub fn types(&self) -> Vec<TypeDescriptor> {
        match self {
            Self::Packed(archive) => archive
                .types
                .iter()
                .map(|t| TypeDescriptor {
                    type_hash: t.type_hash,
                })
                .collect(),
            Self::Direct(archive) => archive
                .types
                .iter()
                .map(|t| TypeDescriptor {
                    type_hash: t.type_hash,
                })
                .collect(),
        }
    }

    /// File table in archive order
    pub fn files(&self) -> Vec<FileDescriptor<'_>> {
        match self {
            Self::Packed(archive) => archive
                .files
                .iter()
                .map(|f| FileDescriptor {
                    name_hash: f.name_hash,
                    type_hash: f.type_hash,
                    content: FileContent::Variants(&f.variants),
                })
                .collect(),
            Self::Direct(archive) => archive
                .files
                .iter()
                .map(|f| FileDescriptor {
                    name_hash: f.name_hash,
                    type_hash: f.type_hash,
                    content: FileContent::Inline(&f.inline_buffer),
                })
                .collect(),
        }
    }

    /// The packed archive, if this is one
    pub fn into_packed(self) -> Result<PackedArchive, Self> {
        match self {
            Self::Packed(archive) => Ok(archive),
            other @ Self::Direct(_) => Err(other),
        }
    }
}

impl From<PackedArchive> for Archive {
    fn from(archive: PackedArchive) -> Self {
        Self::Packed(archive)
    }
}

impl From<DirectArchive> for Archive {
    fn from(archive: DirectArchive) -> Self {
        Self::Direct(archive)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fixtures::{DirectEntry, direct_archive_bytes, packed_archive, packed_file};
    use crate::version::TYPE_LUA;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_packed_view() {
        let bytes = packed_archive(vec![
            packed_file(TYPE_LUA, 0xAA, &[b"head-", b"tail"]),
            packed_file(0x99, 0xBB, &[b"solo"]),
        ])
        .build()
        .expect("build");

        let archive = Archive::parse(&bytes).expect("parse");
        assert_eq!(archive.version(), ArchiveVersion::Packed);
        assert_eq!(archive.checksum(), 0);
        assert_eq!(
            archive.types(),
            vec![
                TypeDescriptor { type_hash: TYPE_LUA },
                TypeDescriptor { type_hash: 0x99 },
            ]
        );

        let files = archive.files();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].name_hash, 0xAA);
        assert_eq!(files[0].inline_size(), 9);
        assert_eq!(files[0].inline_buffer().as_ref(), b"head-tail");
        assert!(matches!(files[1].inline_buffer(), Cow::Borrowed(b) if b == b"solo"));
    }

    #[test]
    fn test_direct_view() {
        let bytes = direct_archive_bytes(0x1234, &[DirectEntry::new(TYPE_LUA, 0xCC, b"inline")]);
        let archive = Archive::parse(&bytes).expect("parse");
        assert_eq!(archive.version(), ArchiveVersion::Direct);
        assert_eq!(archive.checksum(), 0x1234);
        let files = archive.files();
        assert_eq!(files[0].type_hash, TYPE_LUA);
        assert_eq!(files[0].inline_buffer().as_ref(), b"inline");
        assert!(archive.into_packed().is_err());
    }

    #[test]
    fn test_unknown_marker_rejected() {
        let mut bytes = packed_archive(vec![]).build().expect("build");
        bytes[0..4].copy_from_slice(&0xF000_0010u32.to_le_bytes());
        assert!(matches!(
            Archive::parse(&bytes),
            Err(FormatError::UnknownVersion(0xF000_0010))
        ));
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(Archive::parse(&[]).is_err());
    }
}
