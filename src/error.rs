//! Error types for dir-prune.
//!
//! All fallible operations return [`PruneError`], defined with `thiserror`
//! and annotated with `miette` diagnostics so the binary can render them with
//! codes and help text.
//!
//! Errors fall into two groups:
//!
//! - **Configuration errors** ([`PruneError::is_configuration`]) are detected
//!   before the filesystem is touched. The CLI prints them as a single line.
//! - **I/O errors** happen during traversal or removal. Depending on the
//!   [`ErrorPolicy`](crate::prune::ErrorPolicy) they either abort the run or
//!   are recorded as skipped items and the run continues.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use dir_prune::error::{PruneError, Result};
//!
//! fn check_root(path: &Path) -> Result<()> {
//!     if !path.is_dir() {
//!         return Err(PruneError::DirectoryNotFound(path.to_path_buf()));
//!     }
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Error types that can occur while pruning
#[derive(Error, Debug, Diagnostic)]
pub enum PruneError {
    /// The directory to prune does not exist or is not a directory.
    #[error("The supplied directory does not exist: '{}'", .0.display())]
    #[diagnostic(
        code(dir_prune::config::directory_not_found),
        help("Pass the path of an existing directory as the last argument.")
    )]
    DirectoryNotFound(
        /// The path that was supplied
        PathBuf,
    ),

    /// The `-d` argument could not be parsed as a non-negative number of days.
    #[error("Failed to parse lifespan parameter: '{arg}'")]
    #[diagnostic(
        code(dir_prune::config::invalid_threshold),
        help("Use -d followed by a whole number of days, e.g. -d10.")
    )]
    InvalidThreshold {
        /// The argument exactly as it was given
        arg: String,
    },

    /// Any other invalid or missing configuration.
    #[error("{0}")]
    #[diagnostic(
        code(dir_prune::config::error),
        help("Run with /? to see the supported arguments.")
    )]
    ConfigError(
        /// Description of the configuration problem
        String,
    ),

    /// File system I/O error while listing, inspecting, or removing an item.
    #[error("I/O error accessing '{}'", path.display())]
    #[diagnostic(code(dir_prune::io_error))]
    IoError {
        /// The path that caused the I/O error
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// No trash directory could be located for recoverable deletion.
    ///
    /// Raised when the trash strategy is requested explicitly and neither
    /// `XDG_DATA_HOME` nor the home directory can be resolved.
    #[error("Trash is unavailable: {0}")]
    #[diagnostic(
        code(dir_prune::trash::unavailable),
        help("Set XDG_DATA_HOME or HOME, or pass --permanent to delete without the trash.")
    )]
    TrashUnavailable(
        /// Why the trash could not be used
        String,
    ),

    /// Moving an item into the trash failed.
    ///
    /// The most common cause is the item living on a different volume than
    /// the trash directory, which is not supported.
    #[error("Failed to move '{}' to the trash", path.display())]
    #[diagnostic(
        code(dir_prune::trash::move_error),
        help("Items on another volume cannot be trashed. Use --permanent to delete them.")
    )]
    TrashError {
        /// The item that could not be trashed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl PruneError {
    /// Whether this error was raised before any filesystem mutation.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            PruneError::DirectoryNotFound(_)
                | PruneError::InvalidThreshold { .. }
                | PruneError::ConfigError(_)
                | PruneError::TrashUnavailable(_)
        )
    }
}

/// Type alias for Results in this crate
pub type Result<T> = std::result::Result<T, PruneError>;
