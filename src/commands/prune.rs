//! Prune command and its summary report.

use std::path::Path;

use crate::error::Result;
use crate::logging::Logger;
use crate::prune::{Clock, PruneStats, Pruner};

/// Prunes one directory with a configured [`Pruner`] and reports the outcome.
pub struct PruneCommand<'a> {
    path: &'a Path,
    pruner: Pruner,
}

impl<'a> PruneCommand<'a> {
    pub fn new(path: &'a Path, pruner: Pruner) -> Self {
        Self { path, pruner }
    }

    /// Prune the directory, measuring file ages against `clock`.
    pub fn run(self, clock: &dyn Clock) -> Result<PruneStats> {
        let stats = self.pruner.prune_at(self.path, clock)?;

        if !self.pruner.quiet() {
            report(&self.pruner.logger(), &stats, self.pruner.dry_run());
        }

        Ok(stats)
    }
}

fn report(log: &Logger, stats: &PruneStats, dry_run: bool) {
    log.info("Prune complete:");
    log.info(format!("  Files removed: {}", stats.files_deleted));
    log.info(format!("  Files kept: {}", stats.files_retained));
    log.info(format!("  Directories removed: {}", stats.dirs_removed));
    log.info(format!("  Space freed: {}", stats.bytes_freed_display()));

    if !stats.skipped.is_empty() {
        log.info(format!("  Skipped items: {}", stats.skipped.len()));
        for item in &stats.skipped {
            log.info(format!("    - {item}"));
        }
    }

    if dry_run {
        log.info("  (DRY RUN - nothing was actually removed)");
    }
}
