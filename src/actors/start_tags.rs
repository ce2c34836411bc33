//! # Start Tags
//!
//! Dialogue lines can also open with a bracketed cue, as in
//! `123. [nodding] Fine.`. This module lists those cues and strips the ones
//! that produce no audio.

use std::{
    collections::BTreeSet,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::{
    actors::{
        errors::{EditError, EntryFailure, TagError},
        retention,
        tags::{self, TagFinding},
        utils,
    },
    paths::TEXT_SUFFIX,
};

/// Start tags that produce no audio. Matched case-sensitively, without
/// brackets.
pub const SILENT_TAGS: &[&str] = &[
    "nodding",
    "shaking head",
    "leaning forward",
    "stiffening",
    "shifting uncomfortably",
    "wiping eyes",
    "shakily standing",
    "adjusting equipment quietly",
    "stepping back quickly",
    "lowering phone slowly",
    "pressing play",
    "staring at the half-built set",
    "withdrawing",
    "grinning",
    "recognition dawning",
    "pause",
    "long pause",
    "short pause",
    "thoughtful pause",
];

lazy_static! {
    static ref START_TAG: Regex =
        Regex::new(r"^\d+\.\s*(\[[^\]]+\])").expect("valid start tag regex");
    static ref SILENT_ALTERNATION: String = SILENT_TAGS
        .iter()
        .map(|tag| regex::escape(tag))
        .collect::<Vec<_>>()
        .join("|");
    // "240. [pause] Text" -> "240. Text"
    static ref NUMBERED_SILENT_TAG: Regex =
        Regex::new(&format!(r"^(\d+)\.\s*\[({})\]\s*", *SILENT_ALTERNATION))
            .expect("valid silent tag regex");
    // "[pause] Text" -> "Text"
    static ref BARE_SILENT_TAG: Regex =
        Regex::new(&format!(r"^\[({})\]\s*", *SILENT_ALTERNATION))
            .expect("valid silent tag regex");
    // "Character 1: [pause] Text" -> "Character 1: Text"
    static ref LABELLED_SILENT_TAG: Regex =
        Regex::new(&format!(r"^([^:\n]+:\s*)\[({})\]\s*", *SILENT_ALTERNATION))
            .expect("valid silent tag regex");
}

/// Returns the tag a numbered line opens with, brackets included.
pub fn start_tag(line: &str) -> Option<&str> {
    START_TAG
        .captures(line)
        .and_then(|captures| captures.get(1))
        .map(|tag| tag.as_str())
}

/// Lists the start tags of every unnumbered line file under `root`.
///
/// The files searched end in `_lines.txt` and are neither tag-match nor
/// numbered files. The report lists each tag by file and line, then every
/// unique tag with its count.
pub fn find_start_tags<W: Write>(root: &Path, out: &mut W) -> Result<Vec<TagFinding>, TagError> {
    if !root.is_dir() {
        return Err(TagError::MissingRoot {
            path: root.to_path_buf(),
        });
    }

    let files = utils::find_files(root, retention::is_start_tag_source);
    info!(root = %root.display(), files = files.len(), "finding start tags");

    let mut findings = Vec::new();
    for path in &files {
        let lines = match utils::lossy_lines(path) {
            Ok(lines) => lines,
            Err(error) => {
                debug!(path = %path.display(), %error, "skipping unreadable file");
                continue;
            }
        };
        for (index, line) in lines.enumerate() {
            let line = match line {
                Ok(line) => line,
                Err(error) => {
                    debug!(path = %path.display(), %error, "stopped reading file");
                    break;
                }
            };
            if let Some(tag) = start_tag(&line) {
                findings.push(TagFinding::new(path, index + 1, &line, tag));
            }
        }
    }

    write_start_tags(out, files.len(), &findings).map_err(|error| TagError::Report { error })?;
    Ok(findings)
}

fn write_start_tags<W: Write>(
    out: &mut W,
    files: usize,
    findings: &[TagFinding],
) -> io::Result<()> {
    tags::write_findings(out, findings)?;
    writeln!(
        out,
        "Found {} start tags ({} unique) in {files} files",
        findings.len(),
        tags::tag_counts(findings).len()
    )?;
    tags::write_tag_counts(out, findings)
}

/// Strips every silent tag from the start of `line`.
///
/// A silent tag is removed right after a dialogue number, at the very start
/// of the line, or right after a `Label:` prefix. Stripping repeats until the
/// line no longer opens with a silent tag.
///
/// # Returns
///
/// The cleaned line and the removed tags, brackets included, in removal
/// order.
pub fn strip_silent_tags(line: &str) -> (String, Vec<String>) {
    let mut line = line.to_string();
    let mut removed = Vec::new();
    while let Some((cleaned, tag)) = strip_silent_tag(&line) {
        line = cleaned;
        removed.push(tag);
    }
    (line, removed)
}

fn strip_silent_tag(line: &str) -> Option<(String, String)> {
    if let Some(captures) = NUMBERED_SILENT_TAG.captures(line) {
        let rest = &line[captures.get(0)?.end()..];
        return Some((format!("{}. {rest}", &captures[1]), format!("[{}]", &captures[2])));
    }
    if let Some(captures) = BARE_SILENT_TAG.captures(line) {
        let rest = &line[captures.get(0)?.end()..];
        return Some((rest.to_string(), format!("[{}]", &captures[1])));
    }
    if let Some(captures) = LABELLED_SILENT_TAG.captures(line) {
        let rest = &line[captures.get(0)?.end()..];
        return Some((format!("{}{rest}", &captures[1]), format!("[{}]", &captures[2])));
    }
    None
}

/// The outcome of a silent-tag removal run.
#[derive(Debug, Default)]
pub struct SilentTagReport {
    /// Every silent tag removed, grouped by file.
    pub removals: Vec<TagFinding>,
    /// Files rewritten.
    pub rewritten: Vec<PathBuf>,
    /// Files that could not be read or rewritten.
    pub failures: Vec<EntryFailure>,
}

/// Strips silent start tags from every `.txt` file under `root`.
///
/// With `dry_run` the removals are only reported. Files that cannot be read
/// as UTF-8 or cannot be rewritten are recorded as failures.
pub fn remove_silent_tags<W: Write>(
    root: &Path,
    dry_run: bool,
    out: &mut W,
) -> Result<SilentTagReport, EditError> {
    if !root.is_dir() {
        return Err(EditError::MissingRoot {
            path: root.to_path_buf(),
        });
    }

    let files = utils::find_files(root, |name| name.ends_with(TEXT_SUFFIX));
    info!(root = %root.display(), files = files.len(), dry_run, "removing silent start tags");

    let mut report = SilentTagReport::default();
    for path in &files {
        remove_from_file(path, dry_run, &mut report);
    }

    write_silent_report(out, &report, files.len(), dry_run)
        .map_err(|error| EditError::Report { error })?;
    Ok(report)
}

fn remove_from_file(path: &Path, dry_run: bool, report: &mut SilentTagReport) {
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
        let (stripped, removed) = strip_silent_tags(line);
        for tag in removed {
            report
                .removals
                .push(TagFinding::new(path, index + 1, line, &tag));
        }
        cleaned.push_str(&stripped);
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

fn write_silent_report<W: Write>(
    out: &mut W,
    report: &SilentTagReport,
    files: usize,
    dry_run: bool,
) -> io::Result<()> {
    tags::write_findings(out, &report.removals)?;
    let changed: BTreeSet<&Path> = report
        .removals
        .iter()
        .map(|removal| removal.path.as_path())
        .collect();
    let verb = if dry_run { "Would remove" } else { "Removed" };
    writeln!(
        out,
        "{verb} {} silent tags from {} of {files} files ({} failures)",
        report.removals.len(),
        changed.len(),
        report.failures.len()
    )
}
