//! Filesystem and line helpers shared by the line-file tools.

use std::{
    fs::{self, File},
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

use lazy_static::lazy_static;
use regex::Regex;
use walkdir::WalkDir;

lazy_static! {
    static ref DIALOGUE_NUMBER: Regex = Regex::new(r"^(\d+)\.\s").expect("valid dialogue regex");
}

/// Finds every file under `directory` whose name satisfies `predicate`.
///
/// Entries that cannot be read while walking are skipped. Entries are
/// visited in file-name order so reports are reproducible.
///
/// # Arguments
///
/// - `directory`: The directory to search in.
/// - `predicate`: Decides from the file name alone whether a file is wanted.
///
/// # Returns
///
/// A `Vector` containing `PathBuf`s of all file matches.
pub fn find_files<F>(directory: &Path, predicate: F) -> Vec<PathBuf>
where
    F: Fn(&str) -> bool,
{
    WalkDir::new(directory)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .map(&predicate)
                .unwrap_or(false)
        })
        .map(|entry| entry.path().to_path_buf())
        .collect()
}

/// Lists the immediate child directories of `directory`, sorted, with their
/// names. Symbolic links are not followed.
pub fn child_directories(directory: &Path) -> io::Result<Vec<(PathBuf, String)>> {
    let mut children = Vec::new();
    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            let name = entry.file_name().to_string_lossy().into_owned();
            children.push((entry.path(), name));
        }
    }
    children.sort();
    Ok(children)
}

/// Lines of a reader with `\n` or `\r\n` stripped.
///
/// Bytes that are not valid UTF-8 are replaced rather than failing the read,
/// so a single stray Latin-1 line does not hide the rest of the file.
pub struct LossyLines<R> {
    reader: R,
    buffer: Vec<u8>,
}

impl<R: BufRead> Iterator for LossyLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buffer.clear();
        match self.reader.read_until(b'\n', &mut self.buffer) {
            Ok(0) => None,
            Ok(_) => {
                let line = self.buffer.strip_suffix(b"\n").unwrap_or(&self.buffer[..]);
                let line = line.strip_suffix(b"\r").unwrap_or(line);
                Some(Ok(String::from_utf8_lossy(line).into_owned()))
            }
            Err(error) => Some(Err(error)),
        }
    }
}

/// Opens `path` and returns its lines, decoded lossily.
pub fn lossy_lines(path: &Path) -> io::Result<LossyLines<BufReader<File>>> {
    let file = File::open(path)?;
    Ok(LossyLines {
        reader: BufReader::new(file),
        buffer: Vec::new(),
    })
}

/// Splits text into `(line, terminator)` pairs, where the terminator is
/// `"\n"`, `"\r\n"` or empty for an unterminated last line.
///
/// Joining every pair gives back the original text.
pub fn split_lines(content: &str) -> impl Iterator<Item = (&str, &str)> {
    content.split_inclusive('\n').map(|segment| {
        if let Some(line) = segment.strip_suffix("\r\n") {
            (line, "\r\n")
        } else if let Some(line) = segment.strip_suffix('\n') {
            (line, "\n")
        } else {
            (segment, "")
        }
    })
}

/// Returns the dialogue number a line starts with, e.g. `"376"` for
/// `"376. Hello"`.
pub fn dialogue_number(line: &str) -> Option<&str> {
    DIALOGUE_NUMBER
        .captures(line)
        .and_then(|captures| captures.get(1))
        .map(|number| number.as_str())
}
