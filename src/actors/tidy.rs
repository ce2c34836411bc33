//! # Tidy
//!
//! Cleans up hand-edited line files: blank lines are dropped and any line
//! that does not start with a dialogue number is joined onto the numbered
//! line before it.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use tracing::{info, warn};

use crate::{
    actors::{
        errors::{EditError, EntryFailure},
        utils,
    },
    paths::TEXT_SUFFIX,
};

/// The result of tidying one text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tidied {
    /// The tidied text. Every line ends with `\n`.
    pub text: String,
    /// Lines before tidying.
    pub original: usize,
    /// Lines left after dropping blank ones.
    pub non_blank: usize,
    /// Lines left after joining continuations.
    pub merged: usize,
}

/// Line counts for one tidied file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TidyReport {
    /// The file that was read.
    pub path: PathBuf,
    /// Where the tidied text was written.
    pub output: PathBuf,
    /// Lines before tidying.
    pub original: usize,
    /// Lines left after dropping blank ones.
    pub non_blank: usize,
    /// Lines left after joining continuations.
    pub merged: usize,
}

/// Drops blank lines, trims trailing whitespace and joins continuation lines
/// onto the preceding numbered line with a single space.
///
/// A line is numbered when, ignoring surrounding whitespace, it starts with
/// digits, a dot and whitespace. Lines before the first numbered line are
/// joined onto the first of them.
pub fn tidy_text(content: &str) -> Tidied {
    let original = content.lines().count();
    let non_blank: Vec<&str> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::trim_end)
        .collect();

    let mut merged: Vec<String> = Vec::new();
    for line in &non_blank {
        match merged.last_mut() {
            Some(current) if utils::dialogue_number(line.trim()).is_none() => {
                current.push(' ');
                current.push_str(line);
            }
            _ => merged.push(line.to_string()),
        }
    }

    let mut text = String::new();
    for line in &merged {
        text.push_str(line);
        text.push('\n');
    }
    Tidied {
        text,
        original,
        non_blank: non_blank.len(),
        merged: merged.len(),
    }
}

/// Tidies a single file, or every `.txt` file directly inside a folder.
///
/// A file is rewritten in place unless `output` names another file. A folder
/// is always rewritten in place, so giving `output` with a folder is an
/// error. In folder mode a file that cannot be read or written is logged and
/// skipped; in single-file mode it is an error.
///
/// # Returns
///
/// One [`TidyReport`] per file tidied, in file-name order.
pub fn tidy<W: Write>(
    target: &Path,
    output: Option<&Path>,
    out: &mut W,
) -> Result<Vec<TidyReport>, EditError> {
    if target.is_file() {
        let report = tidy_file(target, output.unwrap_or(target))?;
        write_report(out, &report).map_err(|error| EditError::Report { error })?;
        return Ok(vec![report]);
    }
    if !target.is_dir() {
        return Err(EditError::MissingPath {
            path: target.to_path_buf(),
        });
    }
    if output.is_some() {
        return Err(EditError::OutputWithFolder {
            path: target.to_path_buf(),
        });
    }

    let files = text_files(target).map_err(|error| EditError::IoRead {
        path: target.to_path_buf(),
        error,
    })?;
    info!(folder = %target.display(), files = files.len(), "tidying line files");

    let mut reports = Vec::new();
    for path in files {
        match tidy_file(&path, &path) {
            Ok(report) => {
                write_report(out, &report).map_err(|error| EditError::Report { error })?;
                reports.push(report);
            }
            Err(failure) => warn!(%failure, "skipping file"),
        }
    }
    Ok(reports)
}

/// Lists the `.txt` files directly inside `folder`, sorted.
fn text_files(folder: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(folder)? {
        let entry = entry?;
        let is_text = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(TEXT_SUFFIX));
        if is_text && entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

fn tidy_file(path: &Path, output: &Path) -> Result<TidyReport, EntryFailure> {
    let content = fs::read_to_string(path).map_err(|error| EntryFailure {
        action: "read",
        path: path.to_path_buf(),
        error,
    })?;
    let tidied = tidy_text(&content);
    fs::write(output, &tidied.text).map_err(|error| EntryFailure {
        action: "write",
        path: output.to_path_buf(),
        error,
    })?;

    Ok(TidyReport {
        path: path.to_path_buf(),
        output: output.to_path_buf(),
        original: tidied.original,
        non_blank: tidied.non_blank,
        merged: tidied.merged,
    })
}

fn write_report<W: Write>(out: &mut W, report: &TidyReport) -> io::Result<()> {
    writeln!(out, "Processed {}", report.path.display())?;
    writeln!(out, "  Original lines: {}", report.original)?;
    writeln!(out, "  After removing blanks: {}", report.non_blank)?;
    writeln!(out, "  After merging continuations: {}", report.merged)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_go_and_continuations_join() {
        let tidied = tidy_text("1. Hello\n\n   there.  \n2. Bye.\r\n\n3. Done\n");

        assert_eq!(tidied.text, "1. Hello    there.\n2. Bye.\n3. Done\n");
        assert_eq!(tidied.original, 6);
        assert_eq!(tidied.non_blank, 4);
        assert_eq!(tidied.merged, 3);
    }

    #[test]
    fn leading_lines_join_each_other() {
        let tidied = tidy_text("Title\nsubtitle\n  12. First\n12.Not numbered\n");

        assert_eq!(tidied.text, "Title subtitle\n  12. First 12.Not numbered\n");
    }

    #[test]
    fn empty_text_stays_empty() {
        let tidied = tidy_text("\n \n");
        assert_eq!(tidied.text, "");
        assert_eq!(tidied.merged, 0);
    }

    #[test]
    fn file_with_output_leaves_the_input_alone() {
        let temp = tempfile::tempdir().expect("tempdir");
        let input = temp.path().join("lines.txt");
        let output = temp.path().join("tidy.txt");
        fs::write(&input, "1. a\nb\n").expect("write");

        let mut out = Vec::new();
        let reports = tidy(&input, Some(&output), &mut out).expect("tidy");

        assert_eq!(fs::read_to_string(&input).expect("read"), "1. a\nb\n");
        assert_eq!(fs::read_to_string(&output).expect("read"), "1. a b\n");
        assert_eq!(reports[0].output, output);
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.starts_with(&format!("Processed {}\n", input.display())));
        assert!(text.contains("  After merging continuations: 1\n"));
    }

    #[test]
    fn folder_tidies_top_level_text_files_in_place() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join("b.txt"), "1. b\n\nmore\n").expect("write");
        fs::write(temp.path().join("a.txt"), "1. a\n").expect("write");
        fs::write(temp.path().join("c.md"), "1. c\n\n").expect("write");
        fs::create_dir_all(temp.path().join("nested")).expect("create");
        fs::write(temp.path().join("nested").join("d.txt"), "1. d\n\n").expect("write");

        let reports = tidy(temp.path(), None, &mut Vec::new()).expect("tidy");

        let names: Vec<PathBuf> = reports.into_iter().map(|report| report.path).collect();
        assert_eq!(
            names,
            vec![temp.path().join("a.txt"), temp.path().join("b.txt")]
        );
        assert_eq!(
            fs::read_to_string(temp.path().join("b.txt")).expect("read"),
            "1. b more\n"
        );
        assert_eq!(
            fs::read_to_string(temp.path().join("c.md")).expect("read"),
            "1. c\n\n"
        );
        assert_eq!(
            fs::read_to_string(temp.path().join("nested").join("d.txt")).expect("read"),
            "1. d\n\n"
        );
    }

    #[test]
    fn folder_skips_files_it_cannot_read() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join("a.txt"), b"1. caf\xe9\n\n").expect("write");
        fs::write(temp.path().join("b.txt"), "1. b\n\n").expect("write");

        let reports = tidy(temp.path(), None, &mut Vec::new()).expect("tidy");

        assert_eq!(reports.len(), 1);
        assert_eq!(fs::read(temp.path().join("a.txt")).expect("read"), b"1. caf\xe9\n\n");
    }

    #[test]
    fn output_with_folder_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let result = tidy(temp.path(), Some(&temp.path().join("x.txt")), &mut Vec::new());
        assert!(matches!(result, Err(EditError::OutputWithFolder { .. })));
    }

    #[test]
    fn missing_target_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let result = tidy(&temp.path().join("nowhere.txt"), None, &mut Vec::new());
        assert!(matches!(result, Err(EditError::MissingPath { .. })));
    }

    #[test]
    fn unreadable_single_file_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let file = temp.path().join("a.txt");
        fs::write(&file, b"\xff\n").expect("write");

        let result = tidy(&file, None, &mut Vec::new());

        assert!(matches!(result, Err(EditError::Entry(EntryFailure { action: "read", .. }))));
    }
}
