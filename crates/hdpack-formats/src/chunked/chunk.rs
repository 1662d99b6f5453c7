//! Individual chunks of the compression envelope

use binrw::io::{Read, Seek, Write};
use binrw::{BinRead, BinResult, BinWrite};
use flate2::Compression;
use flate2::read::{ZlibDecoder, ZlibEncoder};
use std::borrow::Cow;

use crate::error::{FormatError, FormatResult};

/// Size of an uncompressed chunk, and the maximum size of a piece on encode
///
/// A chunk whose declared length equals this value is stored literally.
pub const CHUNK_SIZE: usize = 65536;

/// Maximum allowed inflated size of a single chunk (64 MB)
///
/// A well-formed chunk never inflates past [`CHUNK_SIZE`]; the limit only
/// bounds the damage of a corrupt or hostile deflate stream.
pub const MAX_DECOMPRESSION_SIZE: usize = 64 * 1024 * 1024;

/// One length-prefixed chunk as stored on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Stored bytes, either literal or a zlib stream
    pub data: Vec<u8>,
}

impl BinRead for Chunk {
    /// Bytes remaining in the input, including the length field
    type Args<'a> = (u64,);

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: binrw::Endian,
        args: Self::Args<'_>,
    ) -> BinResult<Self> {
        let (available,) = args;
        let offset = reader.stream_position()?;

        if available < 4 {
            return Err(FormatError::TruncatedChunk {
                offset,
                declared: 4,
                available,
            }
            .into_binrw(offset));
        }

        let length = u32::read_options(reader, endian, ())?;
        let remaining = available - 4;
        if u64::from(length) > remaining {
            return Err(FormatError::TruncatedChunk {
                offset,
                declared: u64::from(length),
                available: remaining,
            }
            .into_binrw(offset));
        }

        let mut data = vec![0u8; length as usize];
        reader.read_exact(&mut data)?;

        Ok(Self { data })
    }
}

impl BinWrite for Chunk {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<()> {
        let length = u32::try_from(self.data.len()).map_err(|_| {
            FormatError::SizeOverflow {
                field: "chunk",
                length: self.data.len(),
            }
            .into_binrw(0)
        })?;
        length.write_options(writer, endian, ())?;
        writer.write_all(&self.data)?;
        Ok(())
    }
}

impl Chunk {
    /// Compress one piece of at most [`CHUNK_SIZE`] bytes
    ///
    /// Every piece is deflated, even when that does not make it smaller.
    pub fn compress(piece: &[u8]) -> FormatResult<Self> {
        let mut encoder = ZlibEncoder::new(piece, Compression::default());
        let mut data = Vec::new();
        encoder
            .read_to_end(&mut data)
            .map_err(|e| FormatError::Compression(format!("zlib compression failed: {e}")))?;

        if data.len() == CHUNK_SIZE {
            // Decoders read this back as a literal chunk.
            tracing::warn!(
                piece_len = piece.len(),
                "compressed chunk is exactly {CHUNK_SIZE} bytes and will be misread as literal"
            );
        }

        Ok(Self { data })
    }

    /// Whether the chunk is stored without compression
    pub fn is_literal(&self) -> bool {
        self.data.len() == CHUNK_SIZE
    }

    /// Recover the chunk's original bytes
    pub fn decompress(&self) -> FormatResult<Cow<'_, [u8]>> {
        if self.is_literal() {
            return Ok(Cow::Borrowed(&self.data));
        }

        let mut decoder = ZlibDecoder::new(self.data.as_slice());
        let mut decompressed = Vec::with_capacity(CHUNK_SIZE);

        let mut buffer = [0u8; 8192];
        loop {
            let bytes_read = decoder
                .read(&mut buffer)
                .map_err(|e| FormatError::Decompression(format!("zlib: {e}")))?;

            if bytes_read == 0 {
                break;
            }

            if decompressed.len() + bytes_read > MAX_DECOMPRESSION_SIZE {
                return Err(FormatError::Decompression(format!(
                    "chunk inflates past {MAX_DECOMPRESSION_SIZE} bytes"
                )));
            }

            decompressed.extend_from_slice(&buffer[..bytes_read]);
        }

        Ok(Cow::Owned(decompressed))
    }
}
