//! Command-line interface definition

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::{HashDbConfig, RepackConfig};
use crate::target::TargetKinds;

/// Unpack, search and patch game-data archives
#[derive(Debug, Parser)]
#[command(name = "hdpack", version, about)]
pub struct Cli {
    /// Log level, used when RUST_LOG is not set
    #[arg(short, long, value_enum, global = true, default_value = "info")]
    pub log_level: LogLevel,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Logging verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Everything
    Trace,
    /// Per-entry detail
    Debug,
    /// Progress
    Info,
    /// Skipped entries and archives
    Warn,
    /// Failures only
    Error,
}

impl LogLevel {
    /// Filter directive for this level
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Unpack one archive
    Unpack {
        /// Archive file
        archive: PathBuf,
        /// Output directory
        target_dir: PathBuf,
        /// Also write entries of types other than scripts
        #[arg(long)]
        unknown: bool,
        /// Name database
        #[command(flatten)]
        hash_db: HashDbConfig,
    },

    /// Unpack every archive in a directory
    UnpackAll {
        /// Directory holding archives
        archives_dir: PathBuf,
        /// Output directory
        target_dir: PathBuf,
        /// Also write entries of types other than scripts
        #[arg(long)]
        unknown: bool,
        /// Name database
        #[command(flatten)]
        hash_db: HashDbConfig,
    },

    /// Replace scripts of a packed archive with compiled patch files
    Repack {
        /// Archive to patch
        original: PathBuf,
        /// Where to write the patched archive
        new_archive: PathBuf,
        /// Directory holding `<name>.lua` patch scripts
        patch_dir: PathBuf,
        /// Compiler and name database
        #[command(flatten)]
        config: RepackConfig,
    },

    /// Find archives containing entries of a type
    Search {
        /// Directory holding archives
        dir: PathBuf,
        /// Type hash in hex
        #[arg(value_parser = parse_hex_u64)]
        type_hash: u64,
        /// Report every match instead of stopping at the first
        #[arg(long)]
        all: bool,
    },

    /// Name database and target set utilities
    #[command(subcommand)]
    Hash(HashCommands),
}

/// Name database commands
#[derive(Debug, Subcommand)]
pub enum HashCommands {
    /// Print the hash of each value in database format
    Compute {
        /// Values to hash
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Update a name database from source listings and a target set
    Db {
        /// Database file, rewritten in place
        db_file: PathBuf,
        /// Files listing one name per line
        sources: Vec<PathBuf>,
        /// Verify every stored hash on load
        #[arg(long)]
        check: bool,
        /// Sort names on save
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        sort: bool,
        /// Keep only keys listed in this target file
        #[arg(long)]
        target: Option<PathBuf>,
    },

    /// Collect the keys used by a directory of archives
    Target {
        /// Directory holding archives
        dir: PathBuf,
        /// Target file to write
        target: PathBuf,
        /// Include archive file names
        #[arg(long)]
        package: bool,
        /// Include type hashes
        #[arg(long = "type")]
        type_hash: bool,
        /// Include file name hashes
        #[arg(long)]
        file: bool,
    },

    /// Sort and deduplicate a target file in place
    TargetSort {
        /// Target file
        target: PathBuf,
    },
}

impl HashCommands {
    /// Key kinds requested by a `target` command
    pub const fn target_kinds(&self) -> Option<TargetKinds> {
        match self {
            Self::Target {
                package,
                type_hash,
                file,
                ..
            } => Some(TargetKinds {
                packages: *package,
                types: *type_hash,
                files: *file,
            }),
            _ => None,
        }
    }
}

fn parse_hex_u64(value: &str) -> Result<u64, String> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    u64::from_str_radix(digits, 16).map_err(|e| format!("invalid hex hash {value:?}: {e}"))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_search_parses_hex() {
        let cli = Cli::try_parse_from(["hdpack", "search", "dir", "0xA14E8DFA2CD117E2", "--all"])
            .expect("parse");
        match cli.command {
            Commands::Search { type_hash, all, .. } => {
                assert_eq!(type_hash, 0xA14E_8DFA_2CD1_17E2);
                assert!(all);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_hash_db_sort_defaults_on() {
        let cli = Cli::try_parse_from(["hdpack", "hash", "db", "names.txt", "a.txt", "b.txt"])
            .expect("parse");
        match cli.command {
            Commands::Hash(HashCommands::Db { sort, sources, .. }) => {
                assert!(sort);
                assert_eq!(sources.len(), 2);
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::try_parse_from(["hdpack", "hash", "db", "names.txt", "--sort", "false"])
            .expect("parse");
        assert!(matches!(
            cli.command,
            Commands::Hash(HashCommands::Db { sort: false, .. })
        ));
    }

    #[test]
    fn test_target_kinds() {
        let cli = Cli::try_parse_from(["hdpack", "hash", "target", "dir", "out", "--type", "--file"])
            .expect("parse");
        let Commands::Hash(command) = cli.command else {
            panic!("expected a hash command");
        };
        assert_eq!(
            command.target_kinds(),
            Some(TargetKinds {
                packages: false,
                types: true,
                files: true,
            })
        );
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        assert!(Cli::try_parse_from(["hdpack", "-l", "loud", "hash", "compute", "x"]).is_err());
    }
}
