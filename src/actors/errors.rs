//! # Error Types
//!
//! This module defines custom error types used throughout the [`actors`]
//! module.
//!
//! [`actors`]: crate::actors

use std::{io, path::PathBuf};

/// Errors that abort a prune run.
///
/// Failures to delete a single entry are not errors here; they are recorded
/// in the [`PruneReport`](crate::actors::PruneReport) instead.
#[derive(thiserror::Error, Debug)]
pub enum PruneError {
    /// The root directory does not exist or is not a directory.
    #[error("Root directory '{path}' does not exist")]
    MissingRoot {
        /// The missing root.
        path: PathBuf,
    },

    /// Failed to list the root directory.
    #[error("Failed to read '{path}': {error}")]
    IoRead {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        error: io::Error,
    },

    /// Failed to write the deletion report.
    #[error("Failed to write report: {error}")]
    Report {
        /// The underlying I/O error.
        #[source]
        error: io::Error,
    },
}

/// Errors that abort a line search.
#[derive(thiserror::Error, Debug)]
pub enum SearchError {
    /// The root directory does not exist or is not a directory.
    #[error("Root directory '{path}' does not exist")]
    MissingRoot {
        /// The missing root.
        path: PathBuf,
    },

    /// Failed to write the match report.
    #[error("Failed to write report: {error}")]
    Report {
        /// The underlying I/O error.
        #[source]
        error: io::Error,
    },
}

/// Errors that abort a tag audit.
#[derive(thiserror::Error, Debug)]
pub enum TagError {
    /// The root directory does not exist or is not a directory.
    #[error("Root directory '{path}' does not exist")]
    MissingRoot {
        /// The missing root.
        path: PathBuf,
    },

    /// Failed to write the audit report.
    #[error("Failed to write report: {error}")]
    Report {
        /// The underlying I/O error.
        #[source]
        error: io::Error,
    },

    /// Failed to write the removal log.
    #[error("Failed to write '{path}': {error}")]
    IoWrite {
        /// The log file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        error: io::Error,
    },

    /// Failed to create a progress bar.
    #[error("Failed to create progress bar: {0}")]
    ProgressBar(String),
}

/// Errors that abort a command rewriting line files in place.
#[derive(thiserror::Error, Debug)]
pub enum EditError {
    /// The root directory does not exist or is not a directory.
    #[error("Root directory '{path}' does not exist")]
    MissingRoot {
        /// The missing root.
        path: PathBuf,
    },

    /// The file or folder to process does not exist.
    #[error("'{path}' is neither a file nor a directory")]
    MissingPath {
        /// The missing path.
        path: PathBuf,
    },

    /// An explicit output file was given for a whole folder.
    #[error("Cannot write a single output file for the folder '{path}'")]
    OutputWithFolder {
        /// The folder.
        path: PathBuf,
    },

    /// Failed to read an input such as the removal log.
    #[error("Failed to read '{path}': {error}")]
    IoRead {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        error: io::Error,
    },

    /// Reading or writing the single requested file failed.
    #[error(transparent)]
    Entry(#[from] EntryFailure),

    /// Failed to write the report.
    #[error("Failed to write report: {error}")]
    Report {
        /// The underlying I/O error.
        #[source]
        error: io::Error,
    },
}

/// A non-fatal failure on a single filesystem entry.
#[derive(thiserror::Error, Debug)]
#[error("Failed to {action} '{path}': {error}")]
pub struct EntryFailure {
    /// What was being attempted, e.g. "remove".
    pub action: &'static str,
    /// The entry that could not be handled.
    pub path: PathBuf,
    /// The underlying I/O error.
    #[source]
    pub error: io::Error,
}
