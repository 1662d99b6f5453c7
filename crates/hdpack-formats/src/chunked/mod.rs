//! Chunked compression envelope wrapping packed archives
//!
//! ```text
//! [0x00] version marker        (u32 LE)
//! [0x04] uncompressed length   (u32 LE, advisory)
//! [0x08] reserved              (u32 LE, written as 0)
//! [0x0C] chunks until end of input:
//!        length L              (u32 LE)
//!        L bytes               literal when L == 65536, zlib otherwise
//! ```
//!
//! Decoding concatenates every chunk's output in order. Encoding splits the
//! payload into pieces of at most 64 KiB and deflates each of them.
//!
//! The two sides are not symmetric: a deflated piece that happens to be
//! exactly 65536 bytes long is written as-is and would be read back as a
//! literal chunk. The encoder logs a warning when that happens.

mod chunk;

pub use chunk::{CHUNK_SIZE, Chunk, MAX_DECOMPRESSION_SIZE};

use binrw::io::{Cursor, Read, Seek, SeekFrom, Write};
use binrw::{BinRead, BinResult, BinWrite};

use crate::error::{FormatError, FormatResult};
use crate::version::ArchiveVersion;

/// Decoded envelope: version marker, header fields and raw chunks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkEnvelope {
    /// Version marker preceding the envelope
    pub version: ArchiveVersion,
    /// Declared uncompressed length, not enforced
    pub declared_size: u32,
    /// Reserved header field
    pub reserved: u32,
    /// Chunks in stream order
    pub chunks: Vec<Chunk>,
}

impl BinRead for ChunkEnvelope {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<Self> {
        let marker_pos = reader.stream_position()?;
        let marker = u32::read_options(reader, endian, ())?;
        let version = ArchiveVersion::try_from(marker).map_err(|e| e.into_binrw(marker_pos))?;
        let declared_size = u32::read_options(reader, endian, ())?;
        let reserved = u32::read_options(reader, endian, ())?;

        let start = reader.stream_position()?;
        let end = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(start))?;

        let mut chunks = Vec::new();
        let mut pos = start;
        while pos < end {
            chunks.push(Chunk::read_options(reader, endian, (end - pos,))?);
            pos = reader.stream_position()?;
        }

        Ok(Self {
            version,
            declared_size,
            reserved,
            chunks,
        })
    }
}

impl BinWrite for ChunkEnvelope {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<()> {
        self.version.as_u32().write_options(writer, endian, ())?;
        self.declared_size.write_options(writer, endian, ())?;
        self.reserved.write_options(writer, endian, ())?;
        for chunk in &self.chunks {
            chunk.write_options(writer, endian, ())?;
        }
        Ok(())
    }
}

impl ChunkEnvelope {
    /// Parse an envelope from a complete archive buffer
    pub fn parse(data: &[u8]) -> FormatResult<Self> {
        let mut cursor = Cursor::new(data);
        Ok(Self::read_options(&mut cursor, binrw::Endian::Little, ())?)
    }

    /// Serialize the envelope, version marker first
    pub fn build(&self) -> FormatResult<Vec<u8>> {
        let mut data = Vec::new();
        let mut cursor = Cursor::new(&mut data);
        self.write_options(&mut cursor, binrw::Endian::Little, ())?;
        Ok(data)
    }

    /// Split `payload` into 64 KiB pieces and deflate each of them
    pub fn compress(version: ArchiveVersion, payload: &[u8]) -> FormatResult<Self> {
        let declared_size = u32::try_from(payload.len()).map_err(|_| FormatError::SizeOverflow {
            field: "envelope",
            length: payload.len(),
        })?;

        let chunks = payload
            .chunks(CHUNK_SIZE)
            .map(Chunk::compress)
            .collect::<FormatResult<Vec<_>>>()?;

        tracing::debug!(
            size = payload.len(),
            chunks = chunks.len(),
            "compressed chunk envelope"
        );

        Ok(Self {
            version,
            declared_size,
            reserved: 0,
            chunks,
        })
    }

    /// Concatenate the output of every chunk
    ///
    /// The result may differ in length from `declared_size`; that field is
    /// advisory.
    pub fn decompress(&self) -> FormatResult<Vec<u8>> {
        let mut result = Vec::with_capacity(self.declared_size as usize);
        for chunk in &self.chunks {
            result.extend_from_slice(&chunk.decompress()?);
        }

        if result.len() != self.declared_size as usize {
            tracing::debug!(
                declared = self.declared_size,
                actual = result.len(),
                "chunk envelope length differs from declared size"
            );
        }

        Ok(result)
    }
}

/// Decode an envelope and return its version and reconstructed payload
pub fn unpack(data: &[u8]) -> FormatResult<(ArchiveVersion, Vec<u8>)> {
    let envelope = ChunkEnvelope::parse(data)?;
    let payload = envelope.decompress()?;
    Ok((envelope.version, payload))
}

/// Encode `payload` into an envelope preceded by `version`
pub fn pack(version: ArchiveVersion, payload: &[u8]) -> FormatResult<Vec<u8>> {
    ChunkEnvelope::compress(version, payload)?.build()
}
