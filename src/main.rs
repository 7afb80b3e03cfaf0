//! # dir-prune CLI
//!
//! Deletes files under a directory that were neither created nor modified
//! within a number of days, then removes the subdirectories left empty. The
//! directory named on the command line is never removed.
//!
//! ## Usage
//!
//! ```bash
//! dir-prune -d10 ~/Downloads
//! dir-prune --dry-run -v ~/Downloads
//! dir-prune /?
//! ```
//!
//! ## Environment Variables
//!
//! - `DIR_PRUNE_AGE_DAYS`: Default age threshold in days (default: 7)
//! - `DIR_PRUNE_DRY_RUN`: Report without removing anything
//! - `DIR_PRUNE_PERMANENT`: Skip the trash and delete permanently
//! - `DIR_PRUNE_FAIL_FAST`: Stop at the first item that cannot be removed
//! - `DIR_PRUNE_VERBOSE`: Enable verbose output
//! - `DIR_PRUNE_QUIET`: Silence all output except errors
//!
//! Configuration problems (a bad `-d` value, a missing directory) are printed
//! as a single line and exit with status 1.

use std::io::IsTerminal;
use std::process::ExitCode;

use dir_prune::cli::{Cli, Invocation};
use dir_prune::error::PruneError;

fn main() -> miette::Result<ExitCode> {
    miette::set_panic_hook();

    if std::io::stderr().is_terminal() {
        miette::set_hook(Box::new(|_| {
            Box::new(
                miette::GraphicalReportHandler::new()
                    .with_theme(miette::GraphicalTheme::unicode_nocolor())
                    .with_context_lines(3),
            )
        }))?;
    } else {
        miette::set_hook(Box::new(|_| {
            Box::new(
                miette::GraphicalReportHandler::new()
                    .with_theme(miette::GraphicalTheme::none())
                    .with_context_lines(0),
            )
        }))?;
    }

    let cli = match Cli::parse_args() {
        Ok(Invocation::Run(cli)) => cli,
        Ok(Invocation::Help) => {
            print!("{}", Cli::help_text());
            return Ok(ExitCode::SUCCESS);
        }
        Ok(Invocation::Version) => {
            print!("{}", Cli::version_text());
            return Ok(ExitCode::SUCCESS);
        }
        Err(e) => return report(e),
    };

    match dir_prune::commands::execute(&cli) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => report(e),
    }
}

/// Configuration errors get one plain line; anything else goes through miette.
fn report(error: PruneError) -> miette::Result<ExitCode> {
    if error.is_configuration() {
        println!("{error}");
        Ok(ExitCode::FAILURE)
    } else {
        Err(error.into())
    }
}
