//! Packed archives (version `0xF0000004`)
//!
//! A packed archive is a [chunk envelope](crate::chunked) around an exploded
//! buffer laid out strictly in sequence:
//!
//! ```text
//! entries count                     (u32 LE)
//! opaque header block               (256 bytes)
//! type records  x entries count     (type hash u64, name hash u64)
//! file records  x entries count:
//!     type hash                     (u64 LE)
//!     name hash                     (u64 LE)
//!     variants count V              (u32 LE)
//!     stream offset                 (u32 LE)
//!     variant headers x V           (unknown u32, size u32, stream size u32)
//!     variant buffers x V           (size bytes each, back to back)
//! ```
//!
//! Packed archives are the only kind that is written back. The encoder
//! recomputes every count and size from the live data, so a variant buffer
//! may be replaced with one of a different length.

mod file;
mod header;

pub use file::{PackedFile, Variant, VariantHeader};
pub use header::{HEADER_BLOCK_SIZE, HeaderBlock, PackedType};

use binrw::io::{Cursor, Read, Seek, Write};
use binrw::{BinRead, BinResult, BinWrite};
use std::path::Path;

use crate::chunked::ChunkEnvelope;
use crate::error::{FormatError, FormatResult};
use crate::version::ArchiveVersion;

/// Decoded packed archive
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackedArchive {
    /// Opaque header block
    pub header: HeaderBlock,
    /// Type records, one per entry
    pub types: Vec<PackedType>,
    /// File records, one per entry
    pub files: Vec<PackedFile>,
}

impl BinRead for PackedArchive {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<Self> {
        let entries_count = u32::read_options(reader, endian, ())?;
        let header = HeaderBlock::read_options(reader, endian, ())?;

        let types = (0..entries_count)
            .map(|_| PackedType::read_options(reader, endian, ()))
            .collect::<BinResult<Vec<_>>>()?;
        let files = (0..entries_count)
            .map(|_| PackedFile::read_options(reader, endian, ()))
            .collect::<BinResult<Vec<_>>>()?;

        Ok(Self {
            header,
            types,
            files,
        })
    }
}

impl BinWrite for PackedArchive {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<()> {
        let entries_count = self.entries_count().map_err(|e| e.into_binrw(0))?;

        entries_count.write_options(writer, endian, ())?;
        self.header.write_options(writer, endian, ())?;
        for record in &self.types {
            record.write_options(writer, endian, ())?;
        }
        for file in &self.files {
            file.write_options(writer, endian, ())?;
        }
        Ok(())
    }
}

impl PackedArchive {
    /// Decode a complete packed archive, envelope included
    pub fn parse(data: &[u8]) -> FormatResult<Self> {
        let envelope = ChunkEnvelope::parse(data)?;
        if envelope.version != ArchiveVersion::Packed {
            return Err(FormatError::UnexpectedVersion {
                expected: ArchiveVersion::Packed,
                actual: envelope.version,
            });
        }

        let payload = envelope.decompress()?;
        let archive = Self::parse_exploded(&payload)?;
        tracing::debug!(
            entries = archive.files.len(),
            exploded_size = payload.len(),
            "parsed packed archive"
        );
        Ok(archive)
    }

    /// Decode the exploded buffer found inside the envelope
    pub fn parse_exploded(payload: &[u8]) -> FormatResult<Self> {
        let mut cursor = Cursor::new(payload);
        Ok(Self::read_options(&mut cursor, binrw::Endian::Little, ())?)
    }

    /// Read and decode a packed archive file
    pub fn from_file(path: &Path) -> FormatResult<Self> {
        let data = std::fs::read(path).map_err(|source| FormatError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&data)
    }

    /// Serialize the exploded buffer
    pub fn build_exploded(&self) -> FormatResult<Vec<u8>> {
        let mut data = Vec::new();
        let mut cursor = Cursor::new(&mut data);
        self.write_options(&mut cursor, binrw::Endian::Little, ())?;
        Ok(data)
    }

    /// Serialize the archive, compressed and prefixed with its version marker
    pub fn build(&self) -> FormatResult<Vec<u8>> {
        let exploded = self.build_exploded()?;
        ChunkEnvelope::compress(ArchiveVersion::Packed, &exploded)?.build()
    }

    /// Number of entries shared by the type and file tables
    pub fn entries_count(&self) -> FormatResult<u32> {
        if self.types.len() != self.files.len() {
            return Err(FormatError::EntryCountMismatch {
                types: self.types.len(),
                files: self.files.len(),
            });
        }
        u32::try_from(self.files.len()).map_err(|_| FormatError::SizeOverflow {
            field: "entries",
            length: self.files.len(),
        })
    }
}
