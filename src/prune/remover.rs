use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use super::trash::TrashRemover;
use crate::error::{PruneError, Result};

/// How expired files and emptied directories are removed.
pub trait Remover {
    /// Remove a single file (or symbolic link).
    fn remove_file(&self, path: &Path) -> Result<()>;

    /// Remove an empty directory.
    fn remove_dir(&self, path: &Path) -> Result<()>;

    /// Short label used in logs, e.g. "trash".
    fn label(&self) -> &'static str;

    /// A directory the traversal must not enter, because removed items are
    /// stored there.
    fn excluded(&self) -> Option<&Path> {
        None
    }
}

impl Remover for TrashRemover {
    fn remove_file(&self, path: &Path) -> Result<()> {
        self.trash(path).map(|_| ())
    }

    fn remove_dir(&self, path: &Path) -> Result<()> {
        self.trash(path).map(|_| ())
    }

    fn label(&self) -> &'static str {
        "trash"
    }

    fn excluded(&self) -> Option<&Path> {
        Some(self.home())
    }
}

/// Irreversible deletion.
#[derive(Clone, Copy, Debug, Default)]
pub struct PermanentRemover;

impl Remover for PermanentRemover {
    fn remove_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).map_err(|source| PruneError::IoError {
            path: path.to_path_buf(),
            source,
        })
    }

    fn remove_dir(&self, path: &Path) -> Result<()> {
        fs::remove_dir(path).map_err(|source| PruneError::IoError {
            path: path.to_path_buf(),
            source,
        })
    }

    fn label(&self) -> &'static str {
        "permanent"
    }
}

/// Removes nothing. The pruner tracks what would have gone so directory
/// emptiness still matches a real run.
#[derive(Clone, Debug, Default)]
pub struct DryRunRemover {
    excluded: Option<PathBuf>,
}

impl DryRunRemover {
    /// A dry run that skips the same directories `remover` would.
    pub fn standing_in_for(remover: &dyn Remover) -> Self {
        Self {
            excluded: remover.excluded().map(Path::to_path_buf),
        }
    }
}

impl Remover for DryRunRemover {
    fn remove_file(&self, _path: &Path) -> Result<()> {
        Ok(())
    }

    fn remove_dir(&self, _path: &Path) -> Result<()> {
        Ok(())
    }

    fn label(&self) -> &'static str {
        "dry run"
    }

    fn excluded(&self) -> Option<&Path> {
        self.excluded.as_deref()
    }
}

/// Which [`Remover`] a run uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RemovalStrategy {
    /// The user's trash when one can be located on the same volume as the
    /// pruned directory, otherwise permanent deletion
    #[default]
    Auto,
    /// Always the trash; fails when no trash can be located
    Trash,
    /// Always permanent deletion
    Permanent,
}

impl RemovalStrategy {
    /// Build the remover this strategy selects for pruning `root`.
    pub fn resolve(self, root: &Path) -> Result<Box<dyn Remover>> {
        self.resolve_with(root, TrashRemover::from_env())
    }

    /// Like [`RemovalStrategy::resolve`], given the outcome of locating the
    /// trash.
    pub(crate) fn resolve_with(
        self,
        root: &Path,
        located: Result<TrashRemover>,
    ) -> Result<Box<dyn Remover>> {
        match self {
            RemovalStrategy::Auto => Ok(match located {
                Ok(trash) if trash.accepts(root) => Box::new(trash),
                _ => Box::new(PermanentRemover),
            }),
            RemovalStrategy::Trash => Ok(Box::new(located?)),
            RemovalStrategy::Permanent => Ok(Box::new(PermanentRemover)),
        }
    }
}

impl fmt::Display for RemovalStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemovalStrategy::Auto => write!(f, "auto"),
            RemovalStrategy::Trash => write!(f, "trash"),
            RemovalStrategy::Permanent => write!(f, "permanent"),
        }
    }
}
