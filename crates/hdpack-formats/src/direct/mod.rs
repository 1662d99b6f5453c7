//! Direct archives (version `0xF0000011`)
//!
//! A direct archive is one uncompressed buffer: a 72-byte header, the type
//! table, the file table, then the data regions the file records point into.
//! Only the main content region is read; the stream, GPU and index-buffer
//! offsets are kept as parsed but never followed.
//!
//! Direct archives are decoded only. Nothing in this crate writes them.

use binrw::BinRead;
use binrw::io::{Cursor, SeekFrom};
use std::path::Path;

use crate::error::{FormatError, FormatResult};
use crate::version::{ArchiveVersion, NameHash, TypeHash};

/// Size of [`DirectHeader`] on disk
pub const DIRECT_HEADER_SIZE: usize = 72;
/// Size of [`DirectType`] on disk
pub const DIRECT_TYPE_SIZE: usize = 32;
/// Size of [`DirectFile`] on disk, inline content excluded
pub const DIRECT_FILE_SIZE: usize = 80;

/// Archive header (72 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct DirectHeader {
    /// Version marker, always [`ArchiveVersion::Direct`]
    #[br(try_map = |marker: u32| ArchiveVersion::try_from(marker))]
    #[br(assert(version == ArchiveVersion::Direct, FormatError::UnexpectedVersion {
        expected: ArchiveVersion::Direct,
        actual: version,
    }))]
    pub version: ArchiveVersion,
    /// Number of type records
    pub types_count: u32,
    /// Number of file records
    pub files_count: u32,
    /// Unknown
    pub unk00: u32,
    /// Archive checksum
    pub checksum: u32,
    /// Unknown
    pub unk01: u32,
    /// Unknown; looks like a hash but is not one
    pub unk02: u64,
    /// Size of the main data buffer
    pub buffer_size: u64,
    /// Size of the GPU data buffer
    pub gpu_buffer_size: u64,
    /// Unknown trailing fields
    pub reserved: [u32; 6],
}

/// Type record (32 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct DirectType {
    /// Unknown
    pub unk00: u32,
    /// Unknown
    pub unk01: u32,
    /// Type hash
    pub type_hash: TypeHash,
    /// Number of files of this type
    pub count: u32,
    /// Unknown
    pub unk02: u32,
    /// Content alignment
    pub alignment: u32,
    /// GPU content alignment
    pub gpu_alignment: u32,
}

/// File record (80 bytes), with its inline content
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct DirectFile {
    /// Name hash
    pub name_hash: NameHash,
    /// Type hash
    pub type_hash: TypeHash,
    /// Main content offset, aligned to `alignment`
    pub offset: u64,
    /// Unaligned auxiliary stream offset
    pub stream_offset: u64,
    /// GPU content offset, aligned to `gpu_alignment`
    pub gpu_offset: u64,
    /// Index buffer offset (0x200 aligned), unused
    pub buffer_offset: u64,
    /// GPU index buffer offset (0x600 aligned), unused
    pub gpu_buffer_offset: u64,
    /// Main content size
    pub size: u32,
    /// Stream size
    pub stream_size: u32,
    /// GPU stream size
    pub gpu_stream_size: u32,
    /// Content alignment
    pub alignment: u32,
    /// GPU content alignment
    pub gpu_alignment: u32,
    /// Index within the archive
    pub index: u32,

    /// Main content, read at `offset` without moving past this record
    #[br(count = size, seek_before = SeekFrom::Start(offset), restore_position)]
    pub inline_buffer: Vec<u8>,
}

/// Decoded direct archive
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct DirectArchive {
    /// Header
    pub header: DirectHeader,
    /// Type records
    #[br(count = header.types_count)]
    pub types: Vec<DirectType>,
    /// File records
    #[br(count = header.files_count)]
    pub files: Vec<DirectFile>,
}

impl DirectArchive {
    /// Decode a complete direct archive
    pub fn parse(data: &[u8]) -> FormatResult<Self> {
        let marker = ArchiveVersion::detect(data)?;
        if marker != ArchiveVersion::Direct {
            return Err(FormatError::UnexpectedVersion {
                expected: ArchiveVersion::Direct,
                actual: marker,
            });
        }

        let mut cursor = Cursor::new(data);
        let archive = Self::read(&mut cursor)?;
        tracing::debug!(
            types = archive.types.len(),
            files = archive.files.len(),
            checksum = archive.header.checksum,
            "parsed direct archive"
        );
        Ok(archive)
    }

    /// Read and decode a direct archive file
    pub fn from_file(path: &Path) -> FormatResult<Self> {
        let data = std::fs::read(path).map_err(|source| FormatError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&data)
    }
}
