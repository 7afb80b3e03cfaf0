//! Execution of a parsed dir-prune command line.
//!
//! `mod.rs` is a thin dispatcher; the prune run and its summary report live in
//! `prune`.
//!
//! # Example
//!
//! ```no_run
//! use dir_prune::cli::{Cli, Invocation};
//! use dir_prune::commands;
//!
//! if let Invocation::Run(cli) = Cli::parse_args()? {
//!     commands::execute(&cli)?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::cli::Cli;
use crate::error::{PruneError, Result};
use crate::prune::{Clock, PruneStats, Pruner, SystemClock};

pub(crate) mod prune;

pub use prune::PruneCommand;


/// Execute the prune described by the parsed CLI arguments.
pub fn execute(cli: &Cli) -> Result<()> {
    execute_with_clock(cli, &SystemClock).map(|_| ())
}

/// Execute with an explicit clock and return the run statistics.
pub fn execute_with_clock(cli: &Cli, clock: &dyn Clock) -> Result<PruneStats> {
    let path = cli
        .path()
        .ok_or_else(|| PruneError::ConfigError("A directory to prune is required".to_string()))?;

    let quiet = cli.quiet();
    let verbose = if quiet { 0 } else { cli.verbose() };

    let pruner = Pruner::builder()
        .age_threshold_days(cli.age_threshold_days())
        .strategy(cli.strategy())
        .dry_run(cli.dry_run())
        .error_policy(cli.error_policy())
        .verbose(verbose)
        .quiet(quiet)
        .build();

    PruneCommand::new(path, pruner).run(clock)
}
