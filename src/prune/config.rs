use std::fmt;
use std::path::{Path, PathBuf};

use super::clock::{Clock, SystemClock};
use super::fs::{FileSystem, StdFileSystem};
use super::remover::{DryRunRemover, RemovalStrategy, Remover};
use super::size::format_size;
use super::walk;
use crate::error::{PruneError, Result};
use crate::logging::Logger;

/// Age threshold used when none is given.
pub const DEFAULT_AGE_THRESHOLD_DAYS: u32 = 7;

/// What to do when a single item cannot be listed, inspected, or removed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Record the item as skipped and keep going
    #[default]
    Continue,
    /// Stop the run and return the error
    Abort,
}

/// Age-based pruning of a directory tree
#[derive(Debug)]
pub struct Pruner {
    /// Files younger than this many days are kept
    age_threshold_days: u32,
    /// How files and directories are removed
    strategy: RemovalStrategy,
    /// Report what would be removed without removing it
    dry_run: bool,
    /// Reaction to per-item I/O failures
    error_policy: ErrorPolicy,
    /// Verbosity level for logging
    verbose: u8,
    /// Suppress informational logging when true
    quiet: bool,
}

impl Pruner {
    /// Creates a new builder for [`Pruner`]
    pub fn builder() -> PrunerBuilder {
        PrunerBuilder::default()
    }

    /// Get the age threshold in days
    pub fn age_threshold_days(&self) -> u32 {
        self.age_threshold_days
    }

    /// Check if dry run mode is enabled
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Get the error policy
    pub fn error_policy(&self) -> ErrorPolicy {
        self.error_policy
    }

    /// Check if quiet mode is enabled
    pub fn quiet(&self) -> bool {
        self.quiet
    }

    pub(crate) fn logger(&self) -> Logger {
        Logger::new(self.verbose, self.quiet)
    }

    /// Prune `root` on the real filesystem against the system clock.
    ///
    /// `root` must be an existing directory; it is checked before anything is
    /// touched and is never removed itself, even when it ends up empty.
    pub fn prune(&self, root: &Path) -> Result<PruneStats> {
        self.prune_at(root, &SystemClock)
    }

    /// Like [`Pruner::prune`], measuring ages against `clock`.
    pub fn prune_at(&self, root: &Path, clock: &dyn Clock) -> Result<PruneStats> {
        if !root.is_dir() {
            return Err(PruneError::DirectoryNotFound(root.to_path_buf()));
        }

        let remover = self.strategy.resolve(root)?;
        let remover: Box<dyn Remover> = if self.dry_run {
            Box::new(DryRunRemover::standing_in_for(remover.as_ref()))
        } else {
            remover
        };

        self.prune_with(root, &StdFileSystem, remover.as_ref(), clock)
    }

    /// Prune `root` using explicit filesystem, remover, and clock
    /// capabilities.
    ///
    /// Files whose creation and modification times are both at least the
    /// threshold old are removed; then every subdirectory is pruned the same
    /// way; then each non-root directory that has no files and no
    /// subdirectories left is removed. A directory is only judged after all
    /// of its descendants are done.
    pub fn prune_with(
        &self,
        root: &Path,
        fs: &dyn FileSystem,
        remover: &dyn Remover,
        clock: &dyn Clock,
    ) -> Result<PruneStats> {
        let log = self.logger();
        log.verbose(
            1,
            format!(
                "Pruning {} (threshold: {} days, removal: {})",
                root.display(),
                self.age_threshold_days,
                remover.label()
            ),
        );

        walk::run(self, root, fs, remover, clock.now())
    }
}

impl Default for Pruner {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`Pruner`]
#[derive(Debug, Default)]
pub struct PrunerBuilder {
    age_threshold_days: Option<u32>,
    strategy: RemovalStrategy,
    dry_run: bool,
    error_policy: ErrorPolicy,
    verbose: u8,
    quiet: bool,
}

impl PrunerBuilder {
    /// Set the age threshold in days
    pub fn age_threshold_days(mut self, days: u32) -> Self {
        self.age_threshold_days = Some(days);
        self
    }

    /// Set the removal strategy
    pub fn strategy(mut self, strategy: RemovalStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Enable dry run mode
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Set the error policy
    pub fn error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Set the verbosity level
    pub fn verbose(mut self, level: u8) -> Self {
        self.verbose = level;
        self
    }

    /// Enable or disable quiet mode
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Build the [`Pruner`]
    pub fn build(self) -> Pruner {
        Pruner {
            age_threshold_days: self
                .age_threshold_days
                .unwrap_or(DEFAULT_AGE_THRESHOLD_DAYS),
            strategy: self.strategy,
            dry_run: self.dry_run,
            error_policy: self.error_policy,
            verbose: self.verbose,
            quiet: self.quiet,
        }
    }
}

/// The operation that failed for a skipped item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PruneAction {
    ListDirectory,
    ReadTimestamps,
    RemoveFile,
    ClearReadOnly,
    RemoveDirectory,
}

impl fmt::Display for PruneAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            PruneAction::ListDirectory => "list directory",
            PruneAction::ReadTimestamps => "read timestamps",
            PruneAction::RemoveFile => "remove file",
            PruneAction::ClearReadOnly => "clear read-only flag",
            PruneAction::RemoveDirectory => "remove directory",
        };
        f.write_str(text)
    }
}

/// An item that could not be processed and was left in place.
#[derive(Debug)]
pub struct SkippedItem {
    pub path: PathBuf,
    pub action: PruneAction,
    pub error: PruneError,
}

impl fmt::Display for SkippedItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not {} '{}'", self.action, self.path.display())?;
        match std::error::Error::source(&self.error) {
            Some(source) => write!(f, ": {source}"),
            None => write!(f, ": {}", self.error),
        }
    }
}

/// Statistics about a prune run
#[derive(Debug, Default)]
pub struct PruneStats {
    /// Files removed (or that would be, in a dry run)
    pub files_deleted: usize,
    /// Files kept because they are too young
    pub files_retained: usize,
    /// Directories removed because they became empty
    pub dirs_removed: usize,
    /// Total size of the removed files
    pub bytes_freed: u64,
    /// Every removed path, in removal order
    pub removed: Vec<PathBuf>,
    /// Items left in place because of an error
    pub skipped: Vec<SkippedItem>,
}

impl PruneStats {
    /// Human-readable size of the removed files
    pub fn bytes_freed_display(&self) -> String {
        format_size(self.bytes_freed)
    }
}
