//! # dir-prune
//!
//! Deletes files that are older than a threshold from a directory tree and
//! removes the directories that are left empty as a result.
//!
//! ## Overview
//!
//! A file is removed when both its creation time and its last-modification
//! time are at least the threshold (7 days by default) in the past. Every
//! subdirectory is processed the same way, and once a subdirectory has been
//! fully processed it is removed if it no longer contains any files or
//! subdirectories. The directory the run starts from is never removed.
//!
//! Removed items go to the user's trash when one is available, so a mistaken
//! run can be undone from the file manager.
//!
//! ## Architecture
//!
//! - [`prune`]: the traversal, age check, and removal strategies
//! - [`cli`]: command-line interface definitions using clap
//! - [`commands`]: runs a parsed command line and reports the outcome
//! - [`error`]: error types and handling with thiserror + miette
//!
//! ## Library Usage
//!
//! ```no_run
//! use dir_prune::cli::Cli;
//! use dir_prune::commands;
//!
//! let cli = Cli::builder()
//!     .path("/tmp/downloads")
//!     .age_threshold_days(10)
//!     .dry_run(true)
//!     .build()?;
//!
//! commands::execute(&cli)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Error Handling
//!
//! The crate uses a combination of:
//! - `thiserror` for strongly-typed errors
//! - `miette` for rich diagnostic output in CLI

pub mod cli;
pub mod commands;
pub mod error;
pub mod prune;

mod logging;
