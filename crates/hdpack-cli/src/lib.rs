//! Archive operations behind the `hdpack` command
//!
//! - [`unpack`]: extract script payloads (and optionally raw entries)
//! - [`repack`]: compile patch scripts into a packed archive
//! - [`search`]: find archives holding entries of a type
//! - [`target`]: collect the keys a name database should keep
//!
//! Per-entry failures are logged and reported; only I/O and format errors
//! on the archive itself abort an operation.

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::missing_errors_doc)] // Error enums document their variants

pub mod cli;
pub mod compiler;
pub mod config;
pub mod error;
pub mod repack;
pub mod search;
pub mod target;
pub mod unpack;

pub use cli::{Cli, Commands, HashCommands, LogLevel};
pub use compiler::{LuaJitCompiler, ScriptCompiler};
pub use config::{HashDbConfig, RepackConfig};
pub use error::{CompileError, ConfigError, RepackError, UnpackError};
pub use repack::{RepackReport, repack, repack_file};
pub use search::{SearchMatch, search};
pub use target::{TargetKinds, collect_targets};
pub use unpack::{UnpackReport, unpack, unpack_all, unpack_file};
