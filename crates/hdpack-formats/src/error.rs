//! Error types for archive decoding and encoding

use std::path::PathBuf;
use thiserror::Error;

use crate::version::ArchiveVersion;

/// Result type for format operations
pub type FormatResult<T> = Result<T, FormatError>;

/// Errors raised while decoding or encoding archive containers
#[derive(Debug, Error)]
pub enum FormatError {
    /// Leading marker matches neither known archive version
    #[error("unknown archive version: {0:#010X}")]
    UnknownVersion(u32),

    /// Leading marker is a known version, but not the one this decoder handles
    #[error("unexpected archive version: expected {expected}, got {actual}")]
    UnexpectedVersion {
        /// Version the decoder was asked to parse
        expected: ArchiveVersion,
        /// Version found in the data
        actual: ArchiveVersion,
    },

    /// Input ended inside a chunk record
    #[error("truncated chunk at offset {offset}: declared {declared} bytes, {available} available")]
    TruncatedChunk {
        /// Offset of the chunk length field
        offset: u64,
        /// Declared chunk payload length
        declared: u64,
        /// Bytes left in the input
        available: u64,
    },

    /// Input ended inside a resource envelope
    #[error("truncated resource: declared {declared} bytes, {available} available")]
    TruncatedResource {
        /// Declared payload size
        declared: u32,
        /// Bytes following the envelope header
        available: usize,
    },

    /// Input ended inside a variant buffer
    #[error("truncated variant of {name_hash:016X}: declared {declared} bytes, {available} available")]
    TruncatedVariant {
        /// Owning file's name hash
        name_hash: u64,
        /// Declared variant size
        declared: u32,
        /// Bytes actually read
        available: usize,
    },

    /// Type and file tables disagree on the number of entries
    #[error("entry count mismatch: {types} type records, {files} file records")]
    EntryCountMismatch {
        /// Number of type records
        types: usize,
        /// Number of file records
        files: usize,
    },

    /// Deflate stream could not be inflated
    #[error("decompression failed: {0}")]
    Decompression(String),

    /// Deflate stream could not be produced
    #[error("compression failed: {0}")]
    Compression(String),

    /// A length does not fit its 32-bit field
    #[error("{field} length {length} does not fit in 32 bits")]
    SizeOverflow {
        /// Field being written
        field: &'static str,
        /// Offending length
        length: usize,
    },

    /// Failed to open or read an archive file
    #[error("failed to read {path}: {source}")]
    Open {
        /// Archive path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Binary parsing error
    #[error("binary parsing error: {0}")]
    BinRw(#[from] binrw::Error),
}

impl FormatError {
    /// Wrap this error so it can travel through a binrw reader
    pub(crate) fn into_binrw(self, pos: u64) -> binrw::Error {
        binrw::Error::Custom {
            pos,
            err: Box::new(self),
        }
    }

    /// The error raised inside a binrw reader, if this wraps one
    pub fn root(&self) -> &Self {
        if let Self::BinRw(err) = self {
            if let binrw::Error::Custom { err, .. } = err.root_cause() {
                if let Some(inner) = err.downcast_ref::<Self>() {
                    return inner.root();
                }
            }
        }
        self
    }
}
