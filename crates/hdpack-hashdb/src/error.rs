//! Error types for name database and target set files

use std::path::PathBuf;
use thiserror::Error;

/// Result type for name database operations
pub type HashDbResult<T> = Result<T, HashDbError>;

/// Errors raised while loading or saving name databases and target sets
#[derive(Debug, Error)]
pub enum HashDbError {
    /// Failed to open, read or write a file
    #[error("failed to access {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to read a line from a stream
    #[error("line {line_number}: read error: {source}")]
    Read {
        /// 1-based line number
        line_number: usize,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to read a line from a file
    #[error("{path}: line {line_number}: read error: {source}")]
    FileRead {
        /// File path
        path: PathBuf,
        /// 1-based line number
        line_number: usize,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Database line without a space between key and name
    #[error("line {line_number}: missing separator in {line:?}")]
    MissingSeparator {
        /// 1-based line number
        line_number: usize,
        /// Offending line
        line: String,
    },

    /// Key is not 1 to 16 hexadecimal digits
    #[error("line {line_number}: invalid key {key:?}")]
    InvalidKey {
        /// 1-based line number
        line_number: usize,
        /// Offending key text
        key: String,
        /// Parse failure, when the digits themselves were valid
        #[source]
        source: Option<std::num::ParseIntError>,
    },

    /// Stored key does not match the hash of its name
    #[error("hash mismatch for {name:?}: expected {expected:016X}, got {actual:016X}")]
    HashMismatch {
        /// Hash computed from the name
        expected: u64,
        /// Key stored in the file
        actual: u64,
        /// Name on the offending line
        name: String,
    },
}

impl HashDbError {
    /// Attach the file path to a line read failure
    pub(crate) fn in_file(self, path: &std::path::Path) -> Self {
        match self {
            Self::Read {
                line_number,
                source,
            } => Self::FileRead {
                path: path.to_path_buf(),
                line_number,
                source,
            },
            other => other,
        }
    }

    pub(crate) fn io(path: &std::path::Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn read(line_number: usize) -> impl FnOnce(std::io::Error) -> Self {
        move |source| Self::Read {
            line_number,
            source,
        }
    }
}
