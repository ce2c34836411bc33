//! # Line Search
//!
//! Finds lines containing a literal pattern in the numbered tag-match files
//! (`new_order_tag_match_*_lines_numbered.txt`) below a root.

use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::actors::{errors::SearchError, retention, utils};

/// A matching line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMatch {
    /// 1-based line number.
    pub line_number: usize,
    /// The line as read, without its terminator.
    pub text: String,
}

/// All matching lines of one file, in ascending line order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMatches {
    /// The file searched.
    pub path: PathBuf,
    /// Matching lines; never empty.
    pub lines: Vec<LineMatch>,
}

/// Searches every numbered tag-match file under `root` for `pattern`.
///
/// The pattern is a literal substring, never a regular expression. Each file
/// with at least one match is written to `out` as a block: a header naming
/// the file, one `<line number>:<line>` entry per match, and a blank line.
/// Files that cannot be read are treated as having no matches.
///
/// # Returns
///
/// The matches grouped by file, or [`SearchError::MissingRoot`] if `root` is
/// not a directory.
pub fn search<W: Write>(
    root: &Path,
    pattern: &str,
    out: &mut W,
) -> Result<Vec<FileMatches>, SearchError> {
    if !root.is_dir() {
        return Err(SearchError::MissingRoot {
            path: root.to_path_buf(),
        });
    }

    let files = utils::find_files(root, retention::is_searchable_file);
    info!(root = %root.display(), files = files.len(), pattern, "searching line files");

    let mut results = Vec::new();
    for path in files {
        let lines = match matching_lines(&path, pattern) {
            Ok(lines) => lines,
            Err(error) => {
                debug!(path = %path.display(), %error, "skipping unreadable file");
                continue;
            }
        };
        if lines.is_empty() {
            continue;
        }

        let matches = FileMatches { path, lines };
        write_block(out, &matches).map_err(|error| SearchError::Report { error })?;
        results.push(matches);
    }

    Ok(results)
}

/// Returns the lines of `path` that contain `pattern`.
///
/// Invalid UTF-8 is decoded lossily, so only a failed read makes a file
/// unreadable. A read error anywhere in the file discards the whole file so
/// partial results are never reported.
pub fn matching_lines(path: &Path, pattern: &str) -> io::Result<Vec<LineMatch>> {
    let mut matches = Vec::new();
    for (index, line) in utils::lossy_lines(path)?.enumerate() {
        let line = line?;
        if line.contains(pattern) {
            matches.push(LineMatch {
                line_number: index + 1,
                text: line,
            });
        }
    }
    Ok(matches)
}

fn write_block<W: Write>(out: &mut W, matches: &FileMatches) -> io::Result<()> {
    writeln!(out, "==> {} <==", matches.path.display())?;
    for line in &matches.lines {
        writeln!(out, "{}:{}", line.line_number, line.text)?;
    }
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const SEARCHABLE: &str = "new_order_tag_match_hi_m_lines_numbered.txt";

    #[test]
    fn finds_literal_matches_in_line_order() {
        let temp = tempfile::tempdir().expect("tempdir");
        let actor = temp.path().join("hindi_male");
        fs::create_dir_all(&actor).expect("create actor");
        fs::write(actor.join(SEARCHABLE), "a\nb***c\n***\n").expect("write");

        let mut out = Vec::new();
        let results = search(temp.path(), "***", &mut out).expect("search");

        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0].lines,
            vec![
                LineMatch {
                    line_number: 2,
                    text: "b***c".to_string()
                },
                LineMatch {
                    line_number: 3,
                    text: "***".to_string()
                },
            ]
        );
        let expected = format!(
            "==> {} <==\n2:b***c\n3:***\n\n",
            actor.join(SEARCHABLE).display()
        );
        assert_eq!(String::from_utf8(out).expect("utf8"), expected);
    }

    #[test]
    fn pattern_is_not_a_regex() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join(SEARCHABLE), "abc\na.c\n").expect("write");

        let results = search(temp.path(), "a.c", &mut Vec::new()).expect("search");

        assert_eq!(results[0].lines.len(), 1);
        assert_eq!(results[0].lines[0].line_number, 2);
    }

    #[test]
    fn skips_files_without_the_required_prefix() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join("foo_lines_numbered.txt"), "***\n").expect("write");
        fs::write(temp.path().join("new_order_en_1_lines_numbered.txt"), "***\n").expect("write");

        let mut out = Vec::new();
        let results = search(temp.path(), "***", &mut out).expect("search");

        assert!(results.is_empty());
        assert!(out.is_empty());
    }

    #[test]
    fn files_without_matches_emit_nothing() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join(SEARCHABLE), "clean line\n").expect("write");

        let mut out = Vec::new();
        let results = search(temp.path(), "***", &mut out).expect("search");

        assert!(results.is_empty());
        assert!(out.is_empty());
    }

    #[test]
    fn invalid_utf8_does_not_hide_matches() {
        let temp = tempfile::tempdir().expect("tempdir");
        let file = temp.path().join(SEARCHABLE);
        fs::write(&file, b"1. caf\xe9\n2. *** revoir\n").expect("write");

        let mut out = Vec::new();
        let results = search(temp.path(), "***", &mut out).expect("search");

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].lines[0].line_number, 2);
        assert_eq!(results[0].lines[0].text, "2. *** revoir");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("2:2. *** revoir"));
    }

    #[test]
    fn unreadable_files_have_no_matches() {
        let temp = tempfile::tempdir().expect("tempdir");
        let directory = temp.path().join(SEARCHABLE);
        fs::create_dir_all(&directory).expect("create");

        assert!(matching_lines(&directory, "***").is_err());
        let results = search(temp.path(), "***", &mut Vec::new()).expect("search");
        assert!(results.is_empty());
    }

    #[test]
    fn missing_root_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let result = search(&temp.path().join("nowhere"), "***", &mut Vec::new());
        assert!(matches!(result, Err(SearchError::MissingRoot { .. })));
    }
}
