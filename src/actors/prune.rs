//! # Prune Operations
//!
//! This module removes everything from the actor directories except the line
//! files worth keeping.
//!
//! Each immediate child directory of the root is an actor directory. Pruning
//! one happens in two batches: first every nested directory is removed, then
//! every top-level file its [`Category`] does not retain. The paths in a
//! batch are written to the report output before any of them is deleted.

use std::{
    fs::{self, FileType},
    io::{self, Write},
    path::{Path, PathBuf},
};

use tracing::{debug, info, warn};

use crate::actors::{
    errors::{EntryFailure, PruneError},
    retention::Category,
};

/// Deletes filesystem entries on behalf of the pruner.
trait Remover {
    fn remove_directory(&self, path: &Path) -> io::Result<()>;
    fn remove_file(&self, path: &Path) -> io::Result<()>;
}

/// Removes entries from the real filesystem.
struct Filesystem;

impl Remover for Filesystem {
    fn remove_directory(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }
}

/// Prunes the actor directories below a root.
#[derive(Debug, Clone)]
pub struct Pruner {
    root: PathBuf,
    english_marker: String,
    dry_run: bool,
}

/// What happened to a single actor directory.
#[derive(Debug)]
pub struct ActorReport {
    /// The actor directory.
    pub path: PathBuf,
    /// Category derived from the directory name.
    pub category: Category,
    /// Nested directories selected for removal.
    pub directories: Vec<PathBuf>,
    /// Top-level files selected for removal.
    pub files: Vec<PathBuf>,
    /// Entries that could not be listed or removed.
    pub failures: Vec<EntryFailure>,
}

/// The outcome of a prune run, one entry per actor directory.
#[derive(Debug, Default)]
pub struct PruneReport {
    /// Per-directory outcomes in processing order.
    pub actors: Vec<ActorReport>,
}

impl PruneReport {
    /// Returns `true` if nothing was selected for removal.
    pub fn is_empty(&self) -> bool {
        self.actors
            .iter()
            .all(|actor| actor.directories.is_empty() && actor.files.is_empty())
    }

    /// Number of nested directories selected for removal.
    pub fn directory_count(&self) -> usize {
        self.actors.iter().map(|actor| actor.directories.len()).sum()
    }

    /// Number of files selected for removal.
    pub fn file_count(&self) -> usize {
        self.actors.iter().map(|actor| actor.files.len()).sum()
    }

    /// Number of entries that could not be handled.
    pub fn failure_count(&self) -> usize {
        self.actors.iter().map(|actor| actor.failures.len()).sum()
    }
}

impl Pruner {
    /// Creates a pruner for the tree at `root`.
    ///
    /// Actor directories whose name starts with `english_marker` are treated
    /// as [`Category::English`].
    pub fn new(root: impl Into<PathBuf>, english_marker: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            english_marker: english_marker.into(),
            dry_run: false,
        }
    }

    /// Only report what would be removed.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Prunes every actor directory below the root.
    ///
    /// # Arguments
    ///
    /// - `out`: Receives the human-readable deletion report.
    ///
    /// # Returns
    ///
    /// A [`PruneReport`] on success. Fails with [`PruneError::MissingRoot`]
    /// before touching anything if the root is not a directory. Failures on
    /// individual entries are recorded in the report and do not stop the run.
    pub fn prune<W: Write>(&self, out: &mut W) -> Result<PruneReport, PruneError> {
        self.prune_with(&Filesystem, out)
    }

    fn prune_with<W: Write>(
        &self,
        remover: &dyn Remover,
        out: &mut W,
    ) -> Result<PruneReport, PruneError> {
        if !self.root.is_dir() {
            return Err(PruneError::MissingRoot {
                path: self.root.clone(),
            });
        }
        info!(
            root = %self.root.display(),
            dry_run = self.dry_run,
            "pruning actor directories"
        );

        let mut report = PruneReport::default();
        for (path, name) in self.actor_directories()? {
            let category = Category::from_directory_name(&name, &self.english_marker);
            let actor = self.prune_actor(path, category, remover, out)?;
            report.actors.push(actor);
        }

        let verb = if self.dry_run { "Would remove" } else { "Removed" };
        writeln!(
            out,
            "{verb} {} directories and {} files ({} failures)",
            report.directory_count(),
            report.file_count(),
            report.failure_count()
        )
        .map_err(|error| PruneError::Report { error })?;

        Ok(report)
    }

    /// Lists the immediate child directories of the root by name.
    ///
    /// Symbolic links are not followed, so a link to a directory elsewhere is
    /// never treated as an actor directory.
    fn actor_directories(&self) -> Result<Vec<(PathBuf, String)>, PruneError> {
        let entries = fs::read_dir(&self.root).map_err(|error| PruneError::IoRead {
            path: self.root.clone(),
            error,
        })?;

        let mut directories = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    warn!(
                        root = %self.root.display(),
                        %error,
                        "skipping unreadable root entry"
                    );
                    continue;
                }
            };
            if entry.file_type().is_ok_and(|file_type| file_type.is_dir()) {
                let name = entry.file_name().to_string_lossy().into_owned();
                directories.push((entry.path(), name));
            }
        }
        directories.sort();
        Ok(directories)
    }

    /// Prunes a single actor directory.
    fn prune_actor<W: Write>(
        &self,
        path: PathBuf,
        category: Category,
        remover: &dyn Remover,
        out: &mut W,
    ) -> Result<ActorReport, PruneError> {
        let mut actor = ActorReport {
            path,
            category,
            directories: Vec::new(),
            files: Vec::new(),
            failures: Vec::new(),
        };
        report_line(
            out,
            format_args!("Processing {} ({category})", actor.path.display()),
        )?;

        let entries = match list_entries(&actor.path) {
            Ok(entries) => entries,
            Err(failure) => {
                warn!(%failure, "skipping actor directory");
                actor.failures.push(failure);
                return Ok(actor);
            }
        };

        // Nested directories go first, whatever they contain.
        actor.directories = entries
            .iter()
            .filter(|(_, _, file_type)| file_type.is_dir())
            .map(|(path, _, _)| path.clone())
            .collect();
        report_batch(out, "Removing directories:", &actor.directories)?;
        if !self.dry_run {
            for directory in &actor.directories {
                remove_entry(
                    directory,
                    |path| remover.remove_directory(path),
                    &mut actor.failures,
                );
            }
        }

        actor.files = entries
            .iter()
            .filter(|(_, name, file_type)| !file_type.is_dir() && !category.retains(name))
            .map(|(path, _, _)| path.clone())
            .collect();
        report_batch(out, "Removing files:", &actor.files)?;
        if !self.dry_run {
            for file in &actor.files {
                remove_entry(file, |path| remover.remove_file(path), &mut actor.failures);
            }
        }

        debug!(
            path = %actor.path.display(),
            directories = actor.directories.len(),
            files = actor.files.len(),
            failures = actor.failures.len(),
            "actor directory pruned"
        );
        Ok(actor)
    }
}

/// Lists the entries directly inside `directory`, sorted by path.
fn list_entries(directory: &Path) -> Result<Vec<(PathBuf, String, FileType)>, EntryFailure> {
    let read_failure = |error| EntryFailure {
        action: "read",
        path: directory.to_path_buf(),
        error,
    };

    let mut entries = Vec::new();
    for entry in fs::read_dir(directory).map_err(read_failure)? {
        let entry = entry.map_err(read_failure)?;
        let file_type = entry.file_type().map_err(|error| EntryFailure {
            action: "read",
            path: entry.path(),
            error,
        })?;
        let name = entry.file_name().to_string_lossy().into_owned();
        entries.push((entry.path(), name, file_type));
    }
    entries.sort_by(|(left, _, _), (right, _, _)| left.cmp(right));
    Ok(entries)
}

/// Removes one entry, recording a failure instead of returning it.
fn remove_entry<F>(path: &Path, remove: F, failures: &mut Vec<EntryFailure>)
where
    F: Fn(&Path) -> io::Result<()>,
{
    if let Err(error) = remove(path) {
        let failure = EntryFailure {
            action: "remove",
            path: path.to_path_buf(),
            error,
        };
        warn!(%failure, "continuing after failed removal");
        failures.push(failure);
    }
}

/// Writes a batch header and its paths. Empty batches write nothing.
fn report_batch<W: Write>(
    out: &mut W,
    header: &str,
    paths: &[PathBuf],
) -> Result<(), PruneError> {
    if paths.is_empty() {
        return Ok(());
    }
    report_line(out, format_args!("  {header}"))?;
    for path in paths {
        report_line(out, format_args!("    {}", path.display()))?;
    }
    Ok(())
}

fn report_line<W: Write>(out: &mut W, line: std::fmt::Arguments<'_>) -> Result<(), PruneError> {
    writeln!(out, "{line}").map_err(|error| PruneError::Report { error })
}
