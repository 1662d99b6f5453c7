//! Configuration shared by the commands
//!
//! Values come from command-line arguments, falling back to environment
//! variables:
//!
//! - `HDPACK_HASH_DB`: name database used to resolve entry names
//! - `HDPACK_COMPILER`: script compiler executable
//! - `HDPACK_COMPILER_TIMEOUT`: compiler time limit in seconds

use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

use hdpack_hashdb::{HashDbResult, NameDatabase};

use crate::compiler::LuaJitCompiler;
use crate::error::ConfigError;

/// Default compiler time limit in seconds
pub const DEFAULT_COMPILER_TIMEOUT_SECS: u64 = 60;

/// Optional name database
#[derive(Debug, Clone, Default, Args)]
pub struct HashDbConfig {
    /// Name database file
    #[arg(long = "hash-db", env = "HDPACK_HASH_DB")]
    pub path: Option<PathBuf>,
}

impl HashDbConfig {
    /// Load the database, or an empty one when no path is set
    pub fn load(&self) -> HashDbResult<NameDatabase> {
        match &self.path {
            Some(path) => NameDatabase::from_file(path, false),
            None => Ok(NameDatabase::new()),
        }
    }
}

/// Repack settings
#[derive(Debug, Clone, Args)]
pub struct RepackConfig {
    /// Script compiler executable (LuaJIT 2.0.3)
    #[arg(long, env = "HDPACK_COMPILER")]
    pub compiler: Option<PathBuf>,

    /// Seconds a single compilation may take before it is killed
    #[arg(
        long,
        env = "HDPACK_COMPILER_TIMEOUT",
        default_value_t = DEFAULT_COMPILER_TIMEOUT_SECS
    )]
    pub compiler_timeout: u64,

    /// Name database
    #[command(flatten)]
    pub hash_db: HashDbConfig,
}

impl Default for RepackConfig {
    fn default() -> Self {
        Self {
            compiler: None,
            compiler_timeout: DEFAULT_COMPILER_TIMEOUT_SECS,
            hash_db: HashDbConfig::default(),
        }
    }
}

impl RepackConfig {
    /// Compiler time limit
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.compiler_timeout)
    }

    /// Check that a usable compiler is configured
    ///
    /// A bare command name is looked up on `PATH` when the compiler is
    /// spawned, so only paths with a directory part are checked here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let compiler = self.compiler.as_ref().ok_or(ConfigError::MissingCompiler)?;
        if compiler.components().count() > 1 && !compiler.is_file() {
            return Err(ConfigError::CompilerNotFound(compiler.clone()));
        }
        if self.compiler_timeout == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// Build the configured compiler
    pub fn compiler(&self) -> Result<LuaJitCompiler, ConfigError> {
        self.validate()?;
        let path = self.compiler.clone().ok_or(ConfigError::MissingCompiler)?;
        Ok(LuaJitCompiler::new(path, self.timeout()))
    }
}
