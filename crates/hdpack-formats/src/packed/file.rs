//! Packed file records and their variant buffers

use binrw::io::{Read, Seek, Write};
use binrw::{BinRead, BinResult, BinWrite};

use crate::error::FormatError;
use crate::version::{NameHash, TypeHash};

/// Variant header (12 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, BinRead, BinWrite)]
#[brw(little)]
pub struct VariantHeader {
    /// Opaque field, kept as read
    pub unknown: u32,
    /// Declared buffer size, only trusted while parsing
    pub size: u32,
    /// Declared stream size
    pub stream_size: u32,
}

/// One variant: its header and the buffer it describes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    /// Header as read from the archive
    pub header: VariantHeader,
    /// Variant bytes, possibly replaced since parsing
    pub data: Vec<u8>,
}

impl Variant {
    /// Create a variant whose declared size matches `data`
    pub fn new(unknown: u32, stream_size: u32, data: Vec<u8>) -> Self {
        Self {
            header: VariantHeader {
                unknown,
                size: u32::try_from(data.len()).unwrap_or(u32::MAX),
                stream_size,
            },
            data,
        }
    }
}

/// File record
///
/// On disk the scalar fields are followed by every variant header, then by
/// every variant buffer in the same order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedFile {
    /// Type hash
    pub type_hash: TypeHash,
    /// Name hash
    pub name_hash: NameHash,
    /// Opaque stream offset
    pub stream_offset: u32,
    /// Variants in archive order
    pub variants: Vec<Variant>,
}

impl PackedFile {
    /// Logical content: every variant buffer concatenated in order
    pub fn inline_buffer(&self) -> Vec<u8> {
        let total = self.variants.iter().map(|v| v.data.len()).sum();
        let mut out = Vec::with_capacity(total);
        for variant in &self.variants {
            out.extend_from_slice(&variant.data);
        }
        out
    }

    /// Replace the buffer of variant `index`, returning the previous bytes
    ///
    /// The declared size in the header is left alone; the encoder writes
    /// the live buffer length.
    pub fn replace_variant(&mut self, index: usize, data: Vec<u8>) -> Option<Vec<u8>> {
        self.variants
            .get_mut(index)
            .map(|variant| std::mem::replace(&mut variant.data, data))
    }
}

impl BinRead for PackedFile {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<Self> {
        let type_hash = u64::read_options(reader, endian, ())?;
        let name_hash = u64::read_options(reader, endian, ())?;
        let variants_count = u32::read_options(reader, endian, ())?;
        let stream_offset = u32::read_options(reader, endian, ())?;

        let headers = (0..variants_count)
            .map(|_| VariantHeader::read_options(reader, endian, ()))
            .collect::<BinResult<Vec<_>>>()?;

        let mut variants = Vec::with_capacity(headers.len());
        for header in headers {
            let pos = reader.stream_position()?;
            let mut data = Vec::new();
            let read = (&mut *reader)
                .take(u64::from(header.size))
                .read_to_end(&mut data)?;
            if read != header.size as usize {
                return Err(FormatError::TruncatedVariant {
                    name_hash,
                    declared: header.size,
                    available: read,
                }
                .into_binrw(pos));
            }
            variants.push(Variant { header, data });
        }

        Ok(Self {
            type_hash,
            name_hash,
            stream_offset,
            variants,
        })
    }
}

impl BinWrite for PackedFile {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<()> {
        let variants_count = checked_u32("variants", self.variants.len())?;

        self.type_hash.write_options(writer, endian, ())?;
        self.name_hash.write_options(writer, endian, ())?;
        variants_count.write_options(writer, endian, ())?;
        self.stream_offset.write_options(writer, endian, ())?;

        for variant in &self.variants {
            let header = VariantHeader {
                size: checked_u32("variant", variant.data.len())?,
                ..variant.header
            };
            header.write_options(writer, endian, ())?;
        }
        for variant in &self.variants {
            writer.write_all(&variant.data)?;
        }

        Ok(())
    }
}

fn checked_u32(field: &'static str, length: usize) -> BinResult<u32> {
    u32::try_from(length).map_err(|_| FormatError::SizeOverflow { field, length }.into_binrw(0))
}
