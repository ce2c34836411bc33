//! # End-of-Line Tag Audit
//!
//! Numbered line files end some dialogue lines with a bracketed performance
//! cue such as `[sighs]`. Only cues on the allowed list may stay; this module
//! reports the others and can strip them from the files.
//!
//! Tag-match files are not audited. Removals can be recorded in a log that
//! [`propagate`](crate::actors::propagate) later applies to the translated
//! files.

use std::{
    collections::{HashMap, HashSet},
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use indicatif::{ProgressBar, ProgressStyle};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::actors::{
    errors::{EntryFailure, TagError},
    retention, utils,
};

/// Tags allowed at the end of a line. Compared case-insensitively.
pub const ALLOWED_TAGS: &[&str] = &[
    "[sighs]",
    "[exhales]",
    "[sigh]",
    "[shaky exhale]",
    "[exhales heavily]",
    "[soft exhale]",
    "[sighs heavily]",
    "[shaky breath]",
    "[frustrated exhale]",
    "[long exhale]",
    "[nervous exhale]",
    "[sharp inhale]",
    "[exhales sharply]",
    "[sharp exhale]",
    "[incredulous exhale]",
    "[heavy sigh]",
    "[exhales slowly]",
    "[exhales with relief]",
    "[amused exhale]",
    "[impressed exhale]",
    "[heavy exhale]",
    "[hopeful exhale]",
    "[steadying breath]",
    "[quiet exhale]",
    "[measured exhale]",
    "[deep exhale]",
    "[defeated exhale]",
    "[dismissive exhale]",
    "[defensive exhale]",
    "[soft sigh]",
    "[bitter sigh]",
    "[labored breathing]",
    "[resigned sigh]",
    "[peaceful sigh]",
    "[bitter laugh]",
    "[nervous laugh]",
    "[hollow laugh]",
    "[chuckles]",
    "[laughs]",
    "[soft chuckle]",
    "[laugh]",
    "[soft laugh]",
    "[chuckles softly]",
    "[laugh loudly]",
    "[laughs bitterly]",
    "[chuckle]",
    "[laughs softly]",
    "[nervous chuckle]",
    "[rueful laugh]",
    "[dry chuckle]",
    "[gentle laugh]",
    "[embarrassed laugh]",
    "[dry laugh]",
    "[tired laugh]",
    "[dismissive laugh]",
    "[quiet laugh]",
    "[melancholy chuckle]",
    "[laughs darkly]",
    "[wistful laugh]",
    "[emotional laugh]",
    "[defensive laugh]",
    "[resigned laugh]",
    "[incredulous laugh]",
    "[determined laugh]",
    "[cold laugh]",
    "[chuckles dryly]",
    "[rueful chuckle]",
    "[laughs gently]",
    "[laughs quietly]",
    "[exhausted but hopeful laugh]",
    "[clears throat]",
    "[sniffle]",
    "[scoffs]",
    "[sniffles]",
    "[groans]",
    "[frustrated grunt]",
    "[coughs]",
    "[swallows hard]",
    "[chokes up]",
    "[soft sob]",
    "[coughs wetly]",
    "[soft rumble]",
    "[clicks tongue]",
    "[defensive grunt]",
    "[click]",
    "[disgusted scoff]",
    "[stifled sob]",
    "[clicking rapidly]",
    "[snorts]",
    "[cry]",
    "[desperate whisper]",
    "[trailing off]",
    "[trails off]",
    "[fading slightly]",
    "[voice cracking]",
    "[voice breaking]",
    "[voice breaking slightly]",
    "[voice catching slightly]",
    "[shaky voice]",
    "[voice shaking slightly]",
    "[voice wavering]",
    "[voice shaking]",
    "[voice cracks]",
    "[breaking slightly]",
];

lazy_static! {
    static ref END_TAG: Regex = Regex::new(r"\[[^\]]+\]\s*$").expect("valid end tag regex");
    static ref END_TAG_WITH_SPACING: Regex =
        Regex::new(r"\s*\[[^\]]+\]\s*$").expect("valid end tag regex");
    static ref ALLOWED_TAGS_LOWER: HashSet<String> =
        ALLOWED_TAGS.iter().map(|tag| tag.to_lowercase()).collect();
}

/// An unlisted tag at the end of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFinding {
    /// The file the line belongs to.
    pub path: PathBuf,
    /// 1-based line number.
    pub line_number: usize,
    /// The dialogue number the line starts with, if any.
    pub dialogue: Option<String>,
    /// The tag including its brackets.
    pub tag: String,
}

impl TagFinding {
    pub(crate) fn new(path: &Path, line_number: usize, line: &str, tag: &str) -> Self {
        Self {
            path: path.to_path_buf(),
            line_number,
            dialogue: utils::dialogue_number(line).map(str::to_string),
            tag: tag.to_string(),
        }
    }
}

/// The outcome of a tag audit.
#[derive(Debug, Default)]
pub struct TagAudit {
    /// Every unlisted end tag, grouped by file in walk order.
    pub findings: Vec<TagFinding>,
    /// Files rewritten without their unlisted end tags.
    pub rewritten: Vec<PathBuf>,
    /// Files that could not be read or rewritten.
    pub failures: Vec<EntryFailure>,
}

impl TagAudit {
    /// Counts each unique tag, most frequent first; ties sort by tag.
    pub fn tag_counts(&self) -> Vec<(&str, usize)> {
        tag_counts(&self.findings)
    }
}

/// Counts each unique tag in `findings`, most frequent first; ties sort by
/// tag.
pub fn tag_counts(findings: &[TagFinding]) -> Vec<(&str, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for finding in findings {
        *counts.entry(finding.tag.as_str()).or_default() += 1;
    }
    let mut counts: Vec<(&str, usize)> = counts.into_iter().collect();
    counts.sort_by(|(left_tag, left), (right_tag, right)| {
        right.cmp(left).then_with(|| left_tag.cmp(right_tag))
    });
    counts
}

/// Returns the tag at the end of `line`, brackets included.
///
/// Trailing whitespace after the closing bracket is ignored.
pub fn end_tag(line: &str) -> Option<&str> {
    END_TAG.find(line).map(|found| found.as_str().trim_end())
}

/// Returns `true` if `tag` is on the allowed list, ignoring case.
pub fn is_allowed(tag: &str) -> bool {
    ALLOWED_TAGS_LOWER.contains(&tag.to_lowercase())
}

/// Returns `line` without its end tag and the whitespace around it.
pub fn strip_end_tag(line: &str) -> &str {
    match END_TAG_WITH_SPACING.find(line) {
        Some(found) => &line[..found.start()],
        None => line,
    }
}

/// Creates the progress bar used while auditing.
pub fn progress_bar() -> Result<ProgressBar, TagError> {
    let progress_bar = ProgressBar::new(0);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.white/white} {pos}/{len} {msg}")
            .map_err(|error| TagError::ProgressBar(error.to_string()))?
            .progress_chars("##-"),
    );
    Ok(progress_bar)
}

/// Audits every numbered line file under `root` that is not a tag-match file.
///
/// # Arguments
///
/// - `root`: The actor-lines tree.
/// - `remove`: Also rewrite each file without its unlisted end tags.
/// - `progress_bar`: Advanced once per file.
/// - `out`: Receives the human-readable report.
///
/// # Returns
///
/// The [`TagAudit`] on success, or [`TagError::MissingRoot`] if `root` is not
/// a directory. Unreadable or unwritable files are recorded as failures.
pub fn audit<W: Write>(
    root: &Path,
    remove: bool,
    progress_bar: &ProgressBar,
    out: &mut W,
) -> Result<TagAudit, TagError> {
    if !root.is_dir() {
        return Err(TagError::MissingRoot {
            path: root.to_path_buf(),
        });
    }

    let files = utils::find_files(root, retention::is_auditable_file);
    info!(root = %root.display(), files = files.len(), remove, "auditing end tags");
    progress_bar.set_length(files.len() as u64);
    progress_bar.set_message("Auditing end tags...");

    let mut audit = TagAudit::default();
    for path in files {
        audit_file(&path, remove, &mut audit);
        progress_bar.inc(1);
    }
    progress_bar.finish_with_message("Audited all line files!");

    write_report(out, &audit, remove).map_err(|error| TagError::Report { error })?;
    Ok(audit)
}

/// Collects the unlisted end tags of one file and rewrites it if asked.
fn audit_file(path: &Path, remove: bool, audit: &mut TagAudit) {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(error) => {
            debug!(path = %path.display(), %error, "skipping unreadable file");
            audit.failures.push(EntryFailure {
                action: "read",
                path: path.to_path_buf(),
                error,
            });
            return;
        }
    };

    let before = audit.findings.len();
    let mut cleaned = String::with_capacity(content.len());
    for (index, (line, terminator)) in utils::split_lines(&content).enumerate() {
        match end_tag(line) {
            Some(tag) if !is_allowed(tag) => {
                audit
                    .findings
                    .push(TagFinding::new(path, index + 1, line, tag));
                cleaned.push_str(strip_end_tag(line));
            }
            _ => cleaned.push_str(line),
        }
        cleaned.push_str(terminator);
    }

    if !remove || audit.findings.len() == before {
        return;
    }
    match fs::write(path, cleaned) {
        Ok(()) => audit.rewritten.push(path.to_path_buf()),
        Err(error) => {
            let failure = EntryFailure {
                action: "rewrite",
                path: path.to_path_buf(),
                error,
            };
            warn!(%failure, "continuing after failed rewrite");
            audit.failures.push(failure);
        }
    }
}

/// Writes the findings as one block per file: a header naming the file,
/// one `<line number>: <tag>` entry per finding, and a blank line.
pub(crate) fn write_findings<W: Write>(out: &mut W, findings: &[TagFinding]) -> io::Result<()> {
    let mut current: Option<&Path> = None;
    for finding in findings {
        if current != Some(finding.path.as_path()) {
            if current.is_some() {
                writeln!(out)?;
            }
            writeln!(out, "==> {} <==", finding.path.display())?;
            current = Some(finding.path.as_path());
        }
        writeln!(out, "{}: {}", finding.line_number, finding.tag)?;
    }
    if current.is_some() {
        writeln!(out)?;
    }
    Ok(())
}

/// Writes `  <tag>: <count>` for every unique tag, most frequent first.
pub(crate) fn write_tag_counts<W: Write>(out: &mut W, findings: &[TagFinding]) -> io::Result<()> {
    for (tag, count) in tag_counts(findings) {
        writeln!(out, "  {tag}: {count}")?;
    }
    Ok(())
}

fn write_report<W: Write>(out: &mut W, audit: &TagAudit, remove: bool) -> io::Result<()> {
    write_findings(out, &audit.findings)?;
    writeln!(
        out,
        "Found {} unlisted end tags ({} unique)",
        audit.findings.len(),
        audit.tag_counts().len()
    )?;
    write_tag_counts(out, &audit.findings)?;
    if remove {
        writeln!(out, "Rewrote {} files", audit.rewritten.len())?;
    }
    Ok(())
}

/// Writes the tags removed from the rewritten files to `path`.
///
/// Each rewritten file gets a `### <path>` header followed by one
/// `Line <n> | Dialogue <d> | <tag>` entry per removed tag. Lines without a
/// dialogue number are logged with `Dialogue -`. This is the format
/// [`propagate`](crate::actors::propagate::propagate) reads.
pub fn write_removal_log(path: &Path, audit: &TagAudit) -> Result<(), TagError> {
    let removed: Vec<&TagFinding> = audit
        .findings
        .iter()
        .filter(|finding| audit.rewritten.contains(&finding.path))
        .collect();
    let unique: HashSet<&str> = removed.iter().map(|finding| finding.tag.as_str()).collect();

    let mut log = String::new();
    log.push_str("# Removed end tags not on the allowed list\n");
    log.push_str(&format!("# Total removed: {}\n", removed.len()));
    log.push_str(&format!("# Unique tags: {}\n", unique.len()));

    let mut current: Option<&Path> = None;
    for finding in removed {
        if current != Some(finding.path.as_path()) {
            log.push_str(&format!("\n### {}\n", finding.path.display()));
            current = Some(finding.path.as_path());
        }
        log.push_str(&format!(
            "  Line {} | Dialogue {} | {}\n",
            finding.line_number,
            finding.dialogue.as_deref().unwrap_or("-"),
            finding.tag
        ));
    }

    fs::write(path, log).map_err(|error| TagError::IoWrite {
        path: path.to_path_buf(),
        error,
    })?;
    info!(path = %path.display(), "removal log written");
    Ok(())
}
