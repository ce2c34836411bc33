//! # Retention Rules
//!
//! Pure predicates deciding which files survive pruning and which files the
//! line matcher and tag auditor look at. None of these touch the filesystem.

use std::fmt;

use crate::paths::{
    LINES_MARKER, LINES_NUMBERED_MARKER, LINES_NUMBERED_SUFFIX, LINES_SUFFIX, NEW_ORDER_MARKER,
    TAG_MATCH_MARKER, TAG_MATCH_PREFIX, TEXT_SUFFIX,
};

/// The language category of an actor directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Directory name starts with the English marker.
    English,
    /// Every other actor directory.
    NonEnglish,
}

impl Category {
    /// Derives the category of an actor directory from its name.
    ///
    /// The test is a case-sensitive prefix match against `english_marker`.
    pub fn from_directory_name(name: &str, english_marker: &str) -> Self {
        if name.starts_with(english_marker) {
            Category::English
        } else {
            Category::NonEnglish
        }
    }

    /// Returns the category name as shown in reports.
    pub fn to_str(&self) -> &'static str {
        match self {
            Category::English => "english",
            Category::NonEnglish => "non-english",
        }
    }

    /// Returns `true` if a file called `file_name` survives pruning in a
    /// directory of this category.
    ///
    /// - English: the name contains `new_order` and ends with `.txt`.
    /// - Non-English: the name matches `new_order_tag_match_*.txt`.
    pub fn retains(&self, file_name: &str) -> bool {
        match self {
            Category::English => {
                file_name.contains(NEW_ORDER_MARKER) && file_name.ends_with(TEXT_SUFFIX)
            }
            Category::NonEnglish => matches_wildcard(file_name, TAG_MATCH_PREFIX, TEXT_SUFFIX),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// Returns `true` if `file_name` matches `new_order_tag_match_*_lines_numbered.txt`.
pub fn is_searchable_file(file_name: &str) -> bool {
    matches_wildcard(file_name, TAG_MATCH_PREFIX, LINES_NUMBERED_SUFFIX)
}

/// Returns `true` if `file_name` is a numbered line file that is not a
/// tag-match file.
pub fn is_auditable_file(file_name: &str) -> bool {
    file_name.ends_with(LINES_NUMBERED_SUFFIX) && !file_name.contains(TAG_MATCH_MARKER)
}

/// Returns `true` if `file_name` matches `*tag_match*lines*.txt`, the files
/// end-tag removals are propagated to.
pub fn is_propagation_target(file_name: &str) -> bool {
    file_name
        .strip_suffix(TEXT_SUFFIX)
        .and_then(|stem| {
            stem.find(TAG_MATCH_MARKER)
                .map(|at| &stem[at + TAG_MATCH_MARKER.len()..])
        })
        .is_some_and(|rest| rest.contains(LINES_MARKER))
}

/// Returns `true` if `file_name` is an unnumbered line file that is not a
/// tag-match file. These are the files searched for start tags.
pub fn is_start_tag_source(file_name: &str) -> bool {
    file_name.ends_with(LINES_SUFFIX)
        && !file_name.contains(TAG_MATCH_MARKER)
        && !file_name.contains(LINES_NUMBERED_MARKER)
}

/// Matches `<prefix>*<suffix>` where `*` is any, possibly empty, string.
///
/// Prefix and suffix may not share characters, so the name must be at least
/// as long as both together.
fn matches_wildcard(file_name: &str, prefix: &str, suffix: &str) -> bool {
    file_name.len() >= prefix.len() + suffix.len()
        && file_name.starts_with(prefix)
        && file_name.ends_with(suffix)
}
