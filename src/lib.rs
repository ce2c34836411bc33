//! # Actor lines maintenance
//!
//! Tools for the per-actor line-file tree: pruning each actor directory down
//! to the files worth keeping, searching the numbered tag-match files for a
//! literal, and cleaning up the performance tags and layout of the line
//! files.

pub mod actors;
mod cli;
pub mod config;
pub mod logging;
pub mod paths;

use std::{io, process::ExitCode};

use clap::Parser;
use tracing::info;

use crate::{
    actors::{
        Pruner,
        errors::{EditError, PruneError, SearchError, TagError},
        tags,
    },
    cli::{Cli, Commands},
    config::{Config, ConfigError},
};

/// Errors that end a command with a failing exit status.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The configuration file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Pruning failed.
    #[error(transparent)]
    Prune(#[from] PruneError),

    /// Searching failed.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Tag auditing failed.
    #[error(transparent)]
    Tag(#[from] TagError),

    /// Rewriting line files failed.
    #[error(transparent)]
    Edit(#[from] EditError),
}

/// Runs the command given on the command line.
///
/// Reports go to standard output. A fatal error, such as a missing root
/// directory, is printed to standard error and yields exit status 1.
pub fn run() -> ExitCode {
    logging::init();
    let cli = Cli::parse();
    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: Cli) -> Result<(), Error> {
    let config = Config::load(cli.config.as_deref())?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Prune {
            root,
            english_marker,
            dry_run,
        } => {
            let english_marker = english_marker.unwrap_or_else(|| config.english_marker.clone());
            let report = Pruner::new(config.root_or(root), english_marker)
                .dry_run(dry_run)
                .prune(&mut out)?;
            info!(
                directories = report.directory_count(),
                files = report.file_count(),
                failures = report.failure_count(),
                "prune finished"
            );
        }
        Commands::Search { root, pattern } => {
            let pattern = pattern.unwrap_or_else(|| config.search_pattern.clone());
            let matches = actors::search(&config.root_or(root), &pattern, &mut out)?;
            info!(files = matches.len(), "search finished");
        }
        Commands::Tags { root, remove, log } => {
            let progress_bar = tags::progress_bar()?;
            let audit = actors::audit(&config.root_or(root), remove, &progress_bar, &mut out)?;
            if let Some(log) = log {
                tags::write_removal_log(&log, &audit)?;
            }
            info!(
                findings = audit.findings.len(),
                rewritten = audit.rewritten.len(),
                failures = audit.failures.len(),
                "tag audit finished"
            );
        }
        Commands::Propagate {
            log,
            root,
            english_marker,
            dry_run,
        } => {
            let english_marker = english_marker.unwrap_or_else(|| config.english_marker.clone());
            let report = actors::propagate(
                &config.root_or(root),
                &log,
                &english_marker,
                dry_run,
                &mut out,
            )?;
            info!(
                removals = report.removals.len(),
                rewritten = report.rewritten.len(),
                failures = report.failures.len(),
                "propagation finished"
            );
        }
        Commands::StartTags { root } => {
            let findings = actors::find_start_tags(&config.root_or(root), &mut out)?;
            info!(findings = findings.len(), "start tag search finished");
        }
        Commands::SilentTags { root, dry_run } => {
            let report = actors::remove_silent_tags(&config.root_or(root), dry_run, &mut out)?;
            info!(
                removals = report.removals.len(),
                rewritten = report.rewritten.len(),
                failures = report.failures.len(),
                "silent tag removal finished"
            );
        }
        Commands::Tidy { path, output } => {
            let reports = actors::tidy(&path, output.as_deref(), &mut out)?;
            info!(files = reports.len(), "tidy finished");
        }
    }
    Ok(())
}
