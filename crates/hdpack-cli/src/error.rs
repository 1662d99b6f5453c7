//! Error types for archive operations
//!
//! Fatal errors abort the whole operation. Per-entry failures never surface
//! here; they are logged and collected into the operation's report.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use hdpack_formats::{ArchiveVersion, FormatError};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No compiler path was given
    #[error("a script compiler is required (--compiler or HDPACK_COMPILER)")]
    MissingCompiler,

    /// Compiler path does not name a file
    #[error("compiler not found: {0}")]
    CompilerNotFound(PathBuf),

    /// Compiler timeout of zero seconds
    #[error("compiler timeout must be at least one second")]
    ZeroTimeout,
}

/// Failure to turn one patch script into bytecode
#[derive(Debug, Error)]
pub enum CompileError {
    /// The compiler process could not be started
    #[error("failed to run {compiler}: {source}")]
    Spawn {
        /// Compiler path
        compiler: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The compiler ran past its deadline and was killed
    #[error("compiling {script} timed out after {timeout:?}")]
    Timeout {
        /// Script being compiled
        script: PathBuf,
        /// Configured limit
        timeout: Duration,
    },

    /// The compiler exited unsuccessfully
    #[error("compiling {script} failed ({status}): {stderr}")]
    Failed {
        /// Script being compiled
        script: PathBuf,
        /// Exit status
        status: std::process::ExitStatus,
        /// Captured standard error
        stderr: String,
    },

    /// Temporary output could not be created or read
    #[error("compiler output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Errors that abort a repack
#[derive(Debug, Error)]
pub enum RepackError {
    /// Only packed archives can be patched
    #[error("cannot patch {0} archives, only packed archives are supported")]
    UnsupportedFormat(ArchiveVersion),

    /// Source archive could not be read or decoded
    #[error("failed to read original archive: {0}")]
    Format(#[from] FormatError),

    /// Patched archive could not be encoded
    #[error("failed to encode patched archive: {0}")]
    Encode(#[source] FormatError),

    /// Patch directory could not be created
    #[error("failed to create patch directory {path}: {source}")]
    PatchDirectory {
        /// Directory path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Output archive could not be written
    #[error("failed to write {path}: {source}")]
    Write {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors that abort an unpack
#[derive(Debug, Error)]
pub enum UnpackError {
    /// Archive could not be read or decoded
    #[error("failed to read archive: {0}")]
    Format(#[from] FormatError),

    /// Output file or directory could not be written
    #[error("failed to write {path}: {source}")]
    Write {
        /// Output path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
