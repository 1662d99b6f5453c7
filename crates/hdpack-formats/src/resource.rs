//! Script resource envelope
//!
//! Script entries wrap their payload in a small envelope:
//!
//! ```text
//! [0x00] payload size S   (u32 LE)
//! [0x04] format tag       (u32 LE)
//! [0x08] payload          (S bytes)
//! ```
//!
//! Any tag value is accepted and written back unchanged. The size is always
//! recomputed from the payload on encode.

use binrw::io::{Cursor, Read, Seek, Write};
use binrw::{BinRead, BinResult, BinWrite};
use std::fmt;

use crate::error::{FormatError, FormatResult};

/// Format tag of a script resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptFormat {
    /// Plain source text
    Source,
    /// Generic Lua bytecode
    GenericBytecode,
    /// LuaJIT 2 bytecode
    LuaJit2,
    /// Marked as unusable by the engine
    BadFormat,
    /// Any other tag, kept verbatim
    Unknown(u32),
}

impl From<u32> for ScriptFormat {
    fn from(tag: u32) -> Self {
        match tag {
            0 => Self::Source,
            1 => Self::GenericBytecode,
            2 => Self::LuaJit2,
            3 => Self::BadFormat,
            other => Self::Unknown(other),
        }
    }
}

impl From<ScriptFormat> for u32 {
    fn from(format: ScriptFormat) -> Self {
        match format {
            ScriptFormat::Source => 0,
            ScriptFormat::GenericBytecode => 1,
            ScriptFormat::LuaJit2 => 2,
            ScriptFormat::BadFormat => 3,
            ScriptFormat::Unknown(tag) => tag,
        }
    }
}

impl fmt::Display for ScriptFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::GenericBytecode => write!(f, "bytecode"),
            Self::LuaJit2 => write!(f, "luajit2"),
            Self::BadFormat => write!(f, "bad format"),
            Self::Unknown(tag) => write!(f, "unknown ({tag:#X})"),
        }
    }
}

/// Decoded script envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptResource {
    /// Format tag
    pub format: ScriptFormat,
    /// Payload bytes
    pub data: Vec<u8>,
}

impl BinRead for ScriptResource {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<Self> {
        let size = u32::read_options(reader, endian, ())?;
        let tag = u32::read_options(reader, endian, ())?;

        let pos = reader.stream_position()?;
        let mut data = Vec::new();
        let read = (&mut *reader).take(u64::from(size)).read_to_end(&mut data)?;
        if read != size as usize {
            return Err(FormatError::TruncatedResource {
                declared: size,
                available: read,
            }
            .into_binrw(pos));
        }

        Ok(Self {
            format: ScriptFormat::from(tag),
            data,
        })
    }
}

impl BinWrite for ScriptResource {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<()> {
        let size = u32::try_from(self.data.len()).map_err(|_| {
            FormatError::SizeOverflow {
                field: "resource",
                length: self.data.len(),
            }
            .into_binrw(0)
        })?;
        size.write_options(writer, endian, ())?;
        u32::from(self.format).write_options(writer, endian, ())?;
        writer.write_all(&self.data)?;
        Ok(())
    }
}

impl ScriptResource {
    /// Create an envelope around `data`
    pub fn new(format: ScriptFormat, data: Vec<u8>) -> Self {
        Self { format, data }
    }

    /// Decode an envelope; bytes after the payload are ignored
    pub fn parse(data: &[u8]) -> FormatResult<Self> {
        let mut cursor = Cursor::new(data);
        Ok(Self::read_options(&mut cursor, binrw::Endian::Little, ())?)
    }

    /// Encode the envelope with a size taken from the payload
    pub fn build(&self) -> FormatResult<Vec<u8>> {
        let mut out = Vec::with_capacity(8 + self.data.len());
        let mut cursor = Cursor::new(&mut out);
        self.write_options(&mut cursor, binrw::Endian::Little, ())?;
        Ok(out)
    }
}
