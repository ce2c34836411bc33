//! # End-Tag Propagation
//!
//! Once unlisted end tags have been stripped from the English line files,
//! the same dialogues in every translated tag-match file should lose their
//! end tags too. The dialogue numbers come from the removal log written by
//! [`write_removal_log`](crate::actors::tags::write_removal_log).

use std::{
    collections::BTreeSet,
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::actors::{
    errors::{EditError, EntryFailure},
    retention::{self, Category},
    tags::{self, TagFinding},
    utils,
};

lazy_static! {
    static ref LOG_ENTRY: Regex =
        Regex::new(r"^Line \d+ \| Dialogue (\d+) \| \[.+\]").expect("valid log entry regex");
}

/// The outcome of a propagation run.
#[derive(Debug, Default)]
pub struct PropagateReport {
    /// Dialogue numbers read from the English entries of the log.
    pub dialogues: BTreeSet<String>,
    /// Non-English actor directories that were visited.
    pub directories: Vec<PathBuf>,
    /// Every end tag removed, grouped by file.
    pub removals: Vec<TagFinding>,
    /// Files rewritten.
    pub rewritten: Vec<PathBuf>,
    /// Files that could not be read or rewritten.
    pub failures: Vec<EntryFailure>,
}

/// Collects the dialogue numbers logged for English files.
///
/// A `### <path>` header starts a file section. The section is English when
/// a directory of `path` below `root` starts with `english_marker`. Entries
/// without a dialogue number are ignored.
pub fn logged_dialogues(log: &str, root: &Path, english_marker: &str) -> BTreeSet<String> {
    let mut dialogues = BTreeSet::new();
    let mut english = false;
    for line in log.lines().map(str::trim) {
        if let Some(path) = line.strip_prefix("### ") {
            english = is_english_path(Path::new(path), root, english_marker);
            continue;
        }
        if !english {
            continue;
        }
        if let Some(captures) = LOG_ENTRY.captures(line) {
            dialogues.insert(captures[1].to_string());
        }
    }
    dialogues
}

fn is_english_path(path: &Path, root: &Path, english_marker: &str) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative.parent().is_some_and(|directory| {
        directory.iter().any(|name| {
            name.to_str().is_some_and(|name| {
                Category::from_directory_name(name, english_marker) == Category::English
            })
        })
    })
}

/// Strips the end tag from every line of the translated tag-match files
/// whose dialogue number appears in the removal log.
///
/// # Arguments
///
/// - `root`: The actor-lines tree.
/// - `log`: The removal log.
/// - `english_marker`: Prefix of the English actor directories.
/// - `dry_run`: Report the removals without rewriting anything.
/// - `out`: Receives the human-readable report.
///
/// # Returns
///
/// A [`PropagateReport`], [`EditError::MissingRoot`] if `root` is not a
/// directory, or [`EditError::IoRead`] if the log cannot be read. Files that
/// cannot be read or rewritten are recorded as failures.
pub fn propagate<W: Write>(
    root: &Path,
    log: &Path,
    english_marker: &str,
    dry_run: bool,
    out: &mut W,
) -> Result<PropagateReport, EditError> {
    if !root.is_dir() {
        return Err(EditError::MissingRoot {
            path: root.to_path_buf(),
        });
    }
    let content = fs::read_to_string(log).map_err(|error| EditError::IoRead {
        path: log.to_path_buf(),
        error,
    })?;

    let mut report = PropagateReport {
        dialogues: logged_dialogues(&content, root, english_marker),
        ..PropagateReport::default()
    };
    info!(
        root = %root.display(),
        dialogues = report.dialogues.len(),
        dry_run,
        "propagating end-tag removals"
    );

    let directories = utils::child_directories(root).map_err(|error| EditError::IoRead {
        path: root.to_path_buf(),
        error,
    })?;
    for (directory, name) in directories {
        if Category::from_directory_name(&name, english_marker) == Category::English {
            continue;
        }
        for path in target_files(&directory, &mut report.failures) {
            propagate_file(&path, dry_run, &mut report);
        }
        report.directories.push(directory);
    }

    write_report(out, &report, dry_run).map_err(|error| EditError::Report { error })?;
    Ok(report)
}

/// Lists the tag-match files directly inside a language directory.
fn target_files(directory: &Path, failures: &mut Vec<EntryFailure>) -> Vec<PathBuf> {
    let entries = match fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(error) => {
            let failure = EntryFailure {
                action: "read",
                path: directory.to_path_buf(),
                error,
            };
            warn!(%failure, "skipping language directory");
            failures.push(failure);
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_ok_and(|file_type| file_type.is_file()))
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(retention::is_propagation_target)
        })
        .map(|entry| entry.path())
        .collect();
    files.sort();
    files
}

fn propagate_file(path: &Path, dry_run: bool, report: &mut PropagateReport) {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(error) => {
            debug!(path = %path.display(), %error, "skipping unreadable file");
            report.failures.push(EntryFailure {
                action: "read",
                path: path.to_path_buf(),
                error,
            });
            return;
        }
    };

    let before = report.removals.len();
    let mut cleaned = String::with_capacity(content.len());
    for (index, (line, terminator)) in utils::split_lines(&content).enumerate() {
        let logged = utils::dialogue_number(line)
            .is_some_and(|dialogue| report.dialogues.contains(dialogue));
        match tags::end_tag(line) {
            Some(tag) if logged => {
                report
                    .removals
                    .push(TagFinding::new(path, index + 1, line, tag));
                cleaned.push_str(tags::strip_end_tag(line));
            }
            _ => cleaned.push_str(line),
        }
        cleaned.push_str(terminator);
    }

    if dry_run || report.removals.len() == before {
        return;
    }
    match fs::write(path, cleaned) {
        Ok(()) => report.rewritten.push(path.to_path_buf()),
        Err(error) => {
            let failure = EntryFailure {
                action: "rewrite",
                path: path.to_path_buf(),
                error,
            };
            warn!(%failure, "continuing after failed rewrite");
            report.failures.push(failure);
        }
    }
}

fn write_report<W: Write>(
    out: &mut W,
    report: &PropagateReport,
    dry_run: bool,
) -> std::io::Result<()> {
    writeln!(
        out,
        "Read {} English dialogue numbers from the removal log",
        report.dialogues.len()
    )?;
    tags::write_findings(out, &report.removals)?;

    let files: BTreeSet<&Path> = report
        .removals
        .iter()
        .map(|removal| removal.path.as_path())
        .collect();
    let verb = if dry_run { "Would remove" } else { "Removed" };
    writeln!(
        out,
        "{verb} {} end tags from {} files in {} language directories ({} failures)",
        report.removals.len(),
        files.len(),
        report.directories.len(),
        report.failures.len()
    )?;
    tags::write_tag_counts(out, &report.removals)
}
