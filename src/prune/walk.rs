//! The post-order traversal.
//!
//! Call-stack recursion is replaced by an explicit work list holding two kinds
//! of steps. `Descend` handles a directory's files and schedules its
//! subdirectories; `Finalize` re-lists the directory and removes it if it is
//! empty. A directory's `Finalize` step is pushed before its children's
//! `Descend` steps, so it only runs once every descendant has finished.
//!
//! When the remover stores items inside the tree being pruned (a trash under
//! the root), that directory is never entered.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use super::age::{is_expired, threshold_duration};
use super::config::{ErrorPolicy, PruneAction, PruneStats, Pruner, SkippedItem};
use super::fs::FileSystem;
use super::remover::Remover;
use crate::error::{PruneError, Result};
use crate::logging::Logger;

enum Step {
    Descend { dir: PathBuf, is_root: bool },
    Finalize(PathBuf),
}

struct Walk<'a> {
    fs: &'a dyn FileSystem,
    remover: &'a dyn Remover,
    now: SystemTime,
    threshold: Duration,
    policy: ErrorPolicy,
    dry_run: bool,
    log: Logger,
    /// Remover storage inside the tree, spelled relative to the walk's root
    excluded: Option<PathBuf>,
    /// Paths a dry run pretends to have removed
    simulated: HashSet<PathBuf>,
    stats: PruneStats,
}

pub(crate) fn run(
    pruner: &Pruner,
    root: &Path,
    fs: &dyn FileSystem,
    remover: &dyn Remover,
    now: SystemTime,
) -> Result<PruneStats> {
    let mut walk = Walk {
        fs,
        remover,
        now,
        threshold: threshold_duration(pruner.age_threshold_days()),
        policy: pruner.error_policy(),
        dry_run: pruner.dry_run(),
        log: pruner.logger(),
        excluded: remover
            .excluded()
            .and_then(|storage| storage_under(root, storage)),
        simulated: HashSet::new(),
        stats: PruneStats::default(),
    };

    let mut stack = vec![Step::Descend {
        dir: root.to_path_buf(),
        is_root: true,
    }];

    while let Some(step) = stack.pop() {
        match step {
            Step::Descend { dir, is_root } => {
                let Some(subdirs) = walk.descend(&dir)? else {
                    continue;
                };

                // The root is never removed, so it gets no Finalize step.
                if !is_root {
                    stack.push(Step::Finalize(dir));
                }
                stack.extend(subdirs.into_iter().rev().map(|dir| Step::Descend {
                    dir,
                    is_root: false,
                }));
            }
            Step::Finalize(dir) => walk.finalize(&dir)?,
        }
    }

    Ok(walk.stats)
}

/// Where `storage` sits inside `root`, as a path the walk will produce, or
/// `None` when it lies outside the tree.
fn storage_under(root: &Path, storage: &Path) -> Option<PathBuf> {
    let relative = resolve(storage)?
        .strip_prefix(resolve(root)?)
        .ok()?
        .to_path_buf();
    Some(root.join(relative))
}

/// Absolute path with symlinks resolved as far as the path exists.
fn resolve(path: &Path) -> Option<PathBuf> {
    let path = std::path::absolute(path).ok()?;
    for ancestor in path.ancestors() {
        if let Ok(real) = fs::canonicalize(ancestor) {
            return Some(real.join(path.strip_prefix(ancestor).ok()?));
        }
    }
    Some(path)
}

impl Walk<'_> {
    /// Expire the files of `dir` and return its subdirectories, or `None` when
    /// the directory could not be listed.
    fn descend(&mut self, dir: &Path) -> Result<Option<Vec<PathBuf>>> {
        self.log.verbose(2, format!("Entering {}", dir.display()));

        let files = match self.fs.list_files(dir) {
            Ok(files) => files,
            Err(err) => {
                self.skip(dir, PruneAction::ListDirectory, err)?;
                return Ok(None);
            }
        };

        for file in files {
            self.expire_file(&file)?;
        }

        match self.fs.list_directories(dir) {
            Ok(mut subdirs) => {
                if let Some(excluded) = &self.excluded {
                    subdirs.retain(|subdir| {
                        let keep = !subdir.starts_with(excluded);
                        if !keep {
                            self.log
                                .verbose(2, format!("Skipping {}", subdir.display()));
                        }
                        keep
                    });
                }
                Ok(Some(subdirs))
            }
            Err(err) => {
                self.skip(dir, PruneAction::ListDirectory, err)?;
                Ok(None)
            }
        }
    }

    fn expire_file(&mut self, file: &Path) -> Result<()> {
        let times = match self.fs.file_times(file) {
            Ok(times) => times,
            Err(err) => return self.skip(file, PruneAction::ReadTimestamps, err),
        };

        if !is_expired(&times, self.threshold, self.now) {
            self.stats.files_retained += 1;
            self.log
                .verbose(2, format!("Keeping {} (too recent)", file.display()));
            return Ok(());
        }

        if let Err(err) = self.remover.remove_file(file) {
            return self.skip(file, PruneAction::RemoveFile, err);
        }

        self.log.verbose(1, format!("{} {}", self.verb(), file.display()));
        self.stats.files_deleted += 1;
        self.stats.bytes_freed += times.len;
        self.record_removal(file);
        Ok(())
    }

    /// Remove `dir` if, after its descendants were pruned, it holds nothing.
    fn finalize(&mut self, dir: &Path) -> Result<()> {
        let files = match self.fs.list_files(dir) {
            Ok(files) => self.present(files),
            Err(err) => return self.skip(dir, PruneAction::ListDirectory, err),
        };
        if !files.is_empty() {
            return Ok(());
        }

        let subdirs = match self.fs.list_directories(dir) {
            Ok(subdirs) => self.present(subdirs),
            Err(err) => return self.skip(dir, PruneAction::ListDirectory, err),
        };
        if !subdirs.is_empty() {
            return Ok(());
        }

        if !self.dry_run
            && let Err(err) = self.fs.clear_readonly(dir)
        {
            return self.skip(dir, PruneAction::ClearReadOnly, err);
        }

        if let Err(err) = self.remover.remove_dir(dir) {
            return self.skip(dir, PruneAction::RemoveDirectory, err);
        }

        self.log
            .verbose(1, format!("{} empty directory {}", self.verb(), dir.display()));
        self.stats.dirs_removed += 1;
        self.record_removal(dir);
        Ok(())
    }

    fn record_removal(&mut self, path: &Path) {
        if self.dry_run {
            self.simulated.insert(path.to_path_buf());
        }
        self.stats.removed.push(path.to_path_buf());
    }

    /// Drop entries a dry run has already accounted for.
    fn present(&self, paths: Vec<PathBuf>) -> Vec<PathBuf> {
        if self.simulated.is_empty() {
            return paths;
        }
        paths
            .into_iter()
            .filter(|path| !self.simulated.contains(path))
            .collect()
    }

    fn skip(&mut self, path: &Path, action: PruneAction, error: PruneError) -> Result<()> {
        if self.policy == ErrorPolicy::Abort {
            return Err(error);
        }

        let item = SkippedItem {
            path: path.to_path_buf(),
            action,
            error,
        };
        self.log.warn(&item);
        self.stats.skipped.push(item);
        Ok(())
    }

    fn verb(&self) -> &'static str {
        if self.dry_run {
            "Would remove"
        } else {
            "Removed"
        }
    }
}
