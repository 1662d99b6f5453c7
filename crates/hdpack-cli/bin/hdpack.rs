//! hdpack binary entry point.
//!
//! Parses the command line, sets up logging and dispatches to the
//! operations in the hdpack-cli library.

use anyhow::{Context, Result};
use clap::Parser;
use hdpack_cli::{Cli, Commands, HashCommands, collect_targets, repack_file, search};
use hdpack_formats::name_hash;
use hdpack_hashdb::{NameDatabase, TargetSet};

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.log_level.as_str())),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Unpack {
            archive,
            target_dir,
            unknown,
            hash_db,
        } => {
            let db = hash_db.load().context("failed to load hash db")?;
            let report = hdpack_cli::unpack_file(&archive, &target_dir, &db, unknown)?;
            tracing::info!(
                written = report.written,
                skipped = report.skipped,
                invalid = report.invalid,
                "unpack finished"
            );
        }
        Commands::UnpackAll {
            archives_dir,
            target_dir,
            unknown,
            hash_db,
        } => {
            let db = hash_db.load().context("failed to load hash db")?;
            let report = hdpack_cli::unpack_all(&archives_dir, &target_dir, &db, unknown)?;
            tracing::info!(
                archives = report.archives,
                written = report.written,
                "unpack finished"
            );
        }
        Commands::Repack {
            original,
            new_archive,
            patch_dir,
            config,
        } => {
            let compiler = config.compiler()?;
            tracing::debug!(
                compiler = %compiler.path().display(),
                timeout_secs = compiler.timeout().as_secs(),
                "using script compiler"
            );
            let db = config.hash_db.load().context("failed to load hash db")?;
            let report = repack_file(&original, &new_archive, &patch_dir, &compiler, &db)?;
            for (name, reason) in &report.failed {
                tracing::warn!(name = %db.display_name(*name), %reason, "patch not applied");
            }
            tracing::info!(
                patched = report.patched.len(),
                failed = report.failed.len(),
                "repack finished"
            );
        }
        Commands::Search { dir, type_hash, all } => {
            for found in search(&dir, type_hash, all)? {
                println!("{} {}", found.path.display(), found.index);
            }
        }
        Commands::Hash(command) => run_hash(command)?,
    }

    Ok(())
}

fn run_hash(command: HashCommands) -> Result<()> {
    let kinds = command.target_kinds().unwrap_or_default();

    match command {
        HashCommands::Compute { values } => {
            for value in values {
                println!("{:016X} {value}", name_hash(&value));
            }
        }
        HashCommands::Db {
            db_file,
            sources,
            check,
            sort,
            target,
        } => {
            let mut db = NameDatabase::from_file(&db_file, check)
                .with_context(|| format!("failed to load hash db {}", db_file.display()))?;
            tracing::info!(entries = db.len(), "hash db loaded");

            for source in &sources {
                match db.merge_source_file(source) {
                    Ok(added) => tracing::info!(source = %source.display(), added, "merged names"),
                    Err(e) => {
                        tracing::warn!(source = %source.display(), error = %e, "failed to merge names");
                    }
                }
            }

            if let Some(target) = target {
                let targets = TargetSet::from_file(&target)
                    .with_context(|| format!("failed to load target {}", target.display()))?;
                tracing::info!(entries = targets.len(), "target loaded");
                db.retain_targets(&targets);
            }

            db.save_to_file(&db_file, sort)
                .with_context(|| format!("failed to save hash db {}", db_file.display()))?;
            tracing::info!(entries = db.len(), "hash db saved");
        }
        HashCommands::Target { dir, target, .. } => {
            if kinds.is_empty() {
                tracing::warn!("no work to be done, pass --package, --type or --file");
                return Ok(());
            }
            let targets = collect_targets(&dir, kinds)?;
            targets
                .save_to_file(&target)
                .with_context(|| format!("failed to save target {}", target.display()))?;
            tracing::info!(entries = targets.len(), "target saved");
        }
        HashCommands::TargetSort { target } => {
            TargetSet::from_file(&target)
                .and_then(|targets| targets.save_to_file(&target))
                .with_context(|| format!("failed to sort target {}", target.display()))?;
        }
    }

    Ok(())
}
