//! Age-based pruning of a directory tree.
//!
//! A run deletes every file whose creation **and** modification times are
//! both at least the threshold old, prunes subdirectories the same way, and
//! then removes each directory (other than the root) that was left with no
//! files and no subdirectories.
//!
//! # Features
//!
//! - Post-order traversal on an explicit work list, so deep trees cannot
//!   overflow the stack
//! - Pluggable removal: the user's trash, permanent deletion, or a dry run
//! - Injectable clock and filesystem for deterministic testing
//! - Per-item failures are recorded and skipped by default
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use dir_prune::prune::{Pruner, RemovalStrategy};
//!
//! let pruner = Pruner::builder()
//!     .age_threshold_days(10)
//!     .strategy(RemovalStrategy::Trash)
//!     .build();
//!
//! let stats = pruner.prune(Path::new("/home/me/Downloads"))?;
//! println!("Removed {} files", stats.files_deleted);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod age;
mod clock;
mod config;
mod fs;
mod remover;
mod size;
mod trash;
mod walk;

pub use age::{FileTimes, is_expired};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{
    DEFAULT_AGE_THRESHOLD_DAYS, ErrorPolicy, PruneAction, PruneStats, Pruner, PrunerBuilder,
    SkippedItem,
};
pub use fs::{FileSystem, StdFileSystem};
pub use remover::{DryRunRemover, PermanentRemover, RemovalStrategy, Remover};
pub use trash::TrashRemover;
