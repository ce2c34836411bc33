//! # Paths
//!
//! Built-in defaults for the actor-lines tree and the file-name patterns the
//! tools recognise.

/// Root of the actor-lines tree when neither a flag nor a config file
/// provides one.
pub const DEFAULT_ROOT_DIRECTORY: &str = "/workspace/multilingual_fun_lines/actor_lines";

/// Actor directories whose name starts with this marker hold English lines.
pub const DEFAULT_ENGLISH_MARKER: &str = "english";

/// Literal searched for by `search` when no pattern is given.
pub const DEFAULT_SEARCH_PATTERN: &str = "***";

/// Substring every retained file in an English actor directory contains.
pub const NEW_ORDER_MARKER: &str = "new_order";

/// Prefix of tag-match files.
pub const TAG_MATCH_PREFIX: &str = "new_order_tag_match_";

/// Substring identifying tag-match files anywhere in a name.
pub const TAG_MATCH_MARKER: &str = "tag_match";

/// Extension of every line file.
pub const TEXT_SUFFIX: &str = ".txt";

/// Suffix of numbered line files.
pub const LINES_NUMBERED_SUFFIX: &str = "_lines_numbered.txt";

/// Suffix of the unnumbered line files start tags are looked for in.
pub const LINES_SUFFIX: &str = "_lines.txt";

/// Marks numbered line files anywhere in a name.
pub const LINES_NUMBERED_MARKER: &str = "_lines_numbered";

/// Must follow [`TAG_MATCH_MARKER`] in the name of a file end-tag removals
/// are propagated to.
pub const LINES_MARKER: &str = "lines";
