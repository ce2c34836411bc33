//! # CLI
//!
//! This module defines the data structures used to parse command line
//! arguments when running the program.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// This struct represents the top-level CLI entry point for the tool.
#[derive(Parser)]
#[command(
    name = "actor-lines",
    version,
    about = "Maintains the per-actor line files",
    long_about = None
)]
pub struct Cli {
    /// JSON configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// This struct represents the different commands available.
#[derive(Subcommand)]
pub enum Commands {
    /// Removes nested directories and unwanted files from each actor directory.
    Prune {
        /// Root of the actor-lines tree.
        #[arg(long)]
        root: Option<PathBuf>,

        /// Prefix marking English actor directories.
        #[arg(long)]
        english_marker: Option<String>,

        /// Report what would be removed without removing it.
        #[arg(long)]
        dry_run: bool,
    },

    /// Prints lines of the numbered tag-match files containing a literal pattern.
    Search {
        /// Root of the actor-lines tree.
        #[arg(long)]
        root: Option<PathBuf>,

        /// The literal to search for, e.g. "***".
        #[arg()]
        pattern: Option<String>,
    },

    /// Reports end-of-line tags that are not on the allowed list.
    Tags {
        /// Root of the actor-lines tree.
        #[arg(long)]
        root: Option<PathBuf>,

        /// Strip the reported tags from the files.
        #[arg(long)]
        remove: bool,

        /// Record the stripped tags in this file for `propagate`.
        #[arg(long, requires = "remove")]
        log: Option<PathBuf>,
    },

    /// Strips end tags from translated tag-match files for the dialogues
    /// listed in a removal log.
    Propagate {
        /// Removal log written by `tags --remove --log`.
        #[arg(long)]
        log: PathBuf,

        /// Root of the actor-lines tree.
        #[arg(long)]
        root: Option<PathBuf>,

        /// Prefix marking English actor directories.
        #[arg(long)]
        english_marker: Option<String>,

        /// Report what would be removed without rewriting anything.
        #[arg(long)]
        dry_run: bool,
    },

    /// Lists the tags dialogue lines start with.
    StartTags {
        /// Root of the actor-lines tree.
        #[arg(long)]
        root: Option<PathBuf>,
    },

    /// Strips silent start tags such as `[pause]` from every text file.
    SilentTags {
        /// Root of the actor-lines tree.
        #[arg(long)]
        root: Option<PathBuf>,

        /// Report what would be removed without rewriting anything.
        #[arg(long)]
        dry_run: bool,
    },

    /// Drops blank lines and joins continuation lines onto numbered lines.
    Tidy {
        /// A line file, or a folder whose `.txt` files are tidied.
        #[arg()]
        path: PathBuf,

        /// Write a single tidied file here instead of in place.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}
