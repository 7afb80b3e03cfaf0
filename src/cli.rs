//! Command-line interface definitions for dir-prune.
//!
//! The CLI is defined with clap; [`Cli::parse_args`] wraps clap's parser to
//! also accept the DOS-style help tokens (`/?`, `-?`, `help`) and to report a
//! malformed `-d` value as a single line instead of clap's usage dump.
//!
//! # Example
//!
//! ```no_run
//! use dir_prune::cli::{Cli, Invocation};
//!
//! match Cli::parse_args()? {
//!     Invocation::Run(cli) => println!("Pruning {:?}", cli.path()),
//!     Invocation::Help => print!("{}", Cli::help_text()),
//!     Invocation::Version => print!("{}", Cli::version_text()),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::borrow::Cow;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use crate::error::{PruneError, Result};
use crate::prune::{DEFAULT_AGE_THRESHOLD_DAYS, ErrorPolicy, RemovalStrategy};

/// Arguments that print usage wherever they appear.
const HELP_TOKENS: &[&str] = &["/?", "-?", "help"];

const AFTER_HELP: &str = "\
Examples:
  dir-prune -d10 ~/Downloads
      Deletes files in ~/Downloads and every subdirectory that were neither
      created nor modified in the last 10 days, then removes any
      subdirectories left empty. ~/Downloads itself is always kept.

  dir-prune --dry-run ~/Downloads
      Lists what would be removed without removing anything.

Help is also shown for /?, -? or help anywhere on the command line.";

/// Main command-line interface for dir-prune.
#[derive(Parser, Debug)]
#[command(
    name = "dir-prune",
    bin_name = "dir-prune",
    author,
    version,
    about = "Delete files older than a number of days and remove the directories they leave empty",
    long_about = None,
    after_help = AFTER_HELP
)]
pub struct Cli {
    #[command(flatten)]
    global_opts: GlobalOpts,

    #[command(flatten)]
    prune_opts: PruneOpts,

    /// Directory to prune (it is never removed itself)
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,
}

/// Output options.
#[derive(Parser, Debug)]
pub struct GlobalOpts {
    /// Enable verbose output (use multiple times for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, env = "DIR_PRUNE_VERBOSE")]
    verbose: u8,

    /// Silence all output except for errors
    #[arg(short, long, conflicts_with = "verbose", env = "DIR_PRUNE_QUIET")]
    quiet: bool,
}

/// Options controlling what is pruned and how.
#[derive(Parser, Debug)]
pub struct PruneOpts {
    /// Remove files not created or modified in this many days
    #[arg(
        short = 'd',
        long = "days",
        short_alias = 'D',
        value_name = "DAYS",
        default_value_t = DEFAULT_AGE_THRESHOLD_DAYS,
        env = "DIR_PRUNE_AGE_DAYS"
    )]
    age_threshold_days: u32,

    /// Show what would be removed without removing anything
    #[arg(long, env = "DIR_PRUNE_DRY_RUN")]
    dry_run: bool,

    /// Delete permanently instead of moving to the trash
    #[arg(long, conflicts_with = "trash", env = "DIR_PRUNE_PERMANENT")]
    permanent: bool,

    /// Require the trash; fail if it cannot be located
    #[arg(long)]
    trash: bool,

    /// Stop at the first item that cannot be removed
    #[arg(long, env = "DIR_PRUNE_FAIL_FAST")]
    fail_fast: bool,
}

/// What the command line asks for.
#[derive(Debug)]
pub enum Invocation {
    /// Prune with these options
    Run(Cli),
    /// Print usage and exit
    Help,
    /// Print the version and exit
    Version,
}

impl Cli {
    /// Parse the process arguments.
    pub fn parse_args() -> Result<Invocation> {
        Self::parse_args_from(std::env::args_os())
    }

    /// Parse an explicit argument list (the first item is the program name).
    ///
    /// Nothing is validated against the filesystem here.
    pub fn parse_args_from<I, T>(args: I) -> Result<Invocation>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let text: Vec<Cow<'_, str>> = args.iter().skip(1).map(|a| a.to_string_lossy()).collect();

        if text.iter().any(|arg| HELP_TOKENS.contains(&arg.as_ref())) {
            return Ok(Invocation::Help);
        }

        if let Some(arg) = find_invalid_threshold(&text) {
            return Err(PruneError::InvalidThreshold { arg });
        }

        match Self::try_parse_from(&args) {
            Ok(cli) if cli.path.is_none() => Ok(Invocation::Help),
            Ok(cli) => Ok(Invocation::Run(cli)),
            Err(err) => match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                    Ok(Invocation::Help)
                }
                ErrorKind::DisplayVersion => Ok(Invocation::Version),
                _ => Err(PruneError::ConfigError(first_line(&err.to_string()))),
            },
        }
    }

    /// Full usage text.
    pub fn help_text() -> String {
        Self::command().render_long_help().to_string()
    }

    /// Version line.
    pub fn version_text() -> String {
        Self::command().render_version()
    }

    /// Create a builder for programmatic construction
    pub fn builder() -> CliBuilder {
        CliBuilder::default()
    }

    /// Get the directory to prune
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Get the age threshold in days
    pub fn age_threshold_days(&self) -> u32 {
        self.prune_opts.age_threshold_days
    }

    /// Check if dry run mode is enabled
    pub fn dry_run(&self) -> bool {
        self.prune_opts.dry_run
    }

    /// Get the removal strategy selected by `--permanent`/`--trash`
    pub fn strategy(&self) -> RemovalStrategy {
        if self.prune_opts.permanent {
            RemovalStrategy::Permanent
        } else if self.prune_opts.trash {
            RemovalStrategy::Trash
        } else {
            RemovalStrategy::Auto
        }
    }

    /// Get the error policy selected by `--fail-fast`
    pub fn error_policy(&self) -> ErrorPolicy {
        if self.prune_opts.fail_fast {
            ErrorPolicy::Abort
        } else {
            ErrorPolicy::Continue
        }
    }

    /// Get the verbose level
    pub fn verbose(&self) -> u8 {
        self.global_opts.verbose
    }

    /// Check if quiet mode is enabled
    pub fn quiet(&self) -> bool {
        self.global_opts.quiet
    }
}

/// Builder for [`Cli`]
#[derive(Debug, Default)]
pub struct CliBuilder {
    path: Option<PathBuf>,
    age_threshold_days: Option<u32>,
    dry_run: bool,
    strategy: RemovalStrategy,
    fail_fast: bool,
    verbose: u8,
    quiet: bool,
}

impl CliBuilder {
    /// Set the directory to prune
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the age threshold in days
    pub fn age_threshold_days(mut self, days: u32) -> Self {
        self.age_threshold_days = Some(days);
        self
    }

    /// Enable dry run mode
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Set the removal strategy
    pub fn strategy(mut self, strategy: RemovalStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Stop at the first failing item
    pub fn fail_fast(mut self, enabled: bool) -> Self {
        self.fail_fast = enabled;
        self
    }

    /// Set the verbose level
    pub fn verbose(mut self, level: u8) -> Self {
        self.verbose = level;
        self
    }

    /// Enable quiet mode
    pub fn quiet(mut self, enabled: bool) -> Self {
        self.quiet = enabled;
        self
    }

    /// Build the Cli instance
    pub fn build(self) -> Result<Cli> {
        let path = self
            .path
            .ok_or_else(|| PruneError::ConfigError("A directory to prune is required".to_string()))?;

        Ok(Cli {
            global_opts: GlobalOpts {
                verbose: self.verbose,
                quiet: self.quiet,
            },
            prune_opts: PruneOpts {
                age_threshold_days: self
                    .age_threshold_days
                    .unwrap_or(DEFAULT_AGE_THRESHOLD_DAYS),
                dry_run: self.dry_run,
                permanent: self.strategy == RemovalStrategy::Permanent,
                trash: self.strategy == RemovalStrategy::Trash,
                fail_fast: self.fail_fast,
            },
            path: Some(path),
        })
    }
}

/// Find a `-d` argument whose value is not a whole number of days.
///
/// Accepts the attached (`-d10`, `-D10`, `-d=10`, `--days=10`) and separate
/// (`-d 10`, `--days 10`) forms and returns the offending argument as typed.
fn find_invalid_threshold(args: &[Cow<'_, str>]) -> Option<String> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--" {
            break;
        }

        let attached = arg
            .strip_prefix("--days=")
            .or_else(|| arg.strip_prefix("-d"))
            .or_else(|| arg.strip_prefix("-D"));

        match attached {
            Some("") => {
                let value = iter.next()?;
                if value.parse::<u32>().is_err() {
                    return Some(format!("{arg} {value}"));
                }
            }
            Some(value) => {
                let value = value.strip_prefix('=').unwrap_or(value);
                if value.parse::<u32>().is_err() {
                    return Some(arg.to_string());
                }
            }
            None if arg == "--days" => {
                let value = iter.next()?;
                if value.parse::<u32>().is_err() {
                    return Some(format!("{arg} {value}"));
                }
            }
            None => {}
        }
    }

    None
}

fn first_line(message: &str) -> String {
    let line = message.lines().next().unwrap_or_default();
    line.strip_prefix("error: ").unwrap_or(line).to_string()
}
