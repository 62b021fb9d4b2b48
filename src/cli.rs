//! Command-line definitions.
//!
//! Kept in the library so `xtask` can render man pages from the same
//! [`Cli`] the binary parses.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::patterns::Profile;

#[cfg(not(feature = "release"))]
pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_SHA"),
    " ",
    env!("WLR_BUILD_DATE"),
    ")"
);

#[cfg(feature = "release")]
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("WLR_BUILD_DATE"), ")");

/// Wysiwyg Log Rewriter - regroups dbBuilder migration logs per component.
#[derive(Debug, Parser)]
#[command(name = "wlr")]
#[command(author, version = VERSION, about, long_about = None)]
pub struct Cli {
    /// More log output on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Default tracing directive when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write the statistics report followed by the log regrouped per component.
    Rewrite(RewriteArgs),
    /// Print the statistics report of a log without rewriting it.
    Stats(StatsArgs),
    /// Manage the configuration file.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Generate shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Engine overrides shared by `rewrite` and `stats`.
#[derive(Debug, Clone, Default, Args)]
pub struct EngineArgs {
    /// Language assumed for files without a language suffix (two letters).
    #[arg(long, value_name = "LANG")]
    pub default_language: Option<String>,

    /// Which migration job wrote the log.
    #[arg(long, value_enum)]
    pub profile: Option<Profile>,
}

#[derive(Debug, Args)]
pub struct RewriteArgs {
    /// dbBuilder log to rewrite.
    pub file: PathBuf,

    /// Output path. Defaults to `<stem>_<start time>.<ext>` next to the input.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Only write the statistics report.
    #[arg(long)]
    pub stats_only: bool,

    #[command(flatten)]
    pub engine: EngineArgs,
}

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// dbBuilder log to analyze.
    pub file: PathBuf,

    /// Print counters as JSON instead of the text report.
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub engine: EngineArgs,
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration as TOML.
    Show,
    /// Print the configuration file location.
    Path,
    /// Write a default configuration file if none exists.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}
