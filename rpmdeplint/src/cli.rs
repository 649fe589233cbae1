//! Command-line argument handling for `rpmdeplint`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// The command-line interface for `rpmdeplint`.
#[derive(Debug, Parser)]
#[command(about, author, name = "rpmdeplint", version)]
pub struct Cli {
    /// Log verbosity level.
    #[command(flatten)]
    pub verbose: clap_verbosity::Verbosity<clap_verbosity::WarnLevel>,

    /// Shorthand for `-vv` (debug-level logging), kept for compatibility
    /// with the historical `--debug` flag this tool has always accepted.
    #[arg(long, global = true)]
    pub debug: bool,

    /// The `rpmdeplint` commands.
    #[command(subcommand)]
    pub command: Command,
}

/// Arguments shared by every `check*`/`list-deps` subcommand.
#[derive(Clone, Debug, Args)]
pub struct CommonArgs {
    /// Package(s) under test.
    #[arg(value_name = "RPMPATH", required = true, num_args = 1..)]
    pub rpmpaths: Vec<PathBuf>,

    /// A repository to check against, as `NAME,REPOURL_OR_PATH`. Repeatable.
    #[arg(long = "repo", value_name = "NAME,REPOURL_OR_PATH")]
    pub repos: Vec<String>,

    /// Additionally load every repo configured in `/etc/yum.conf` and
    /// `/etc/yum.repos.d/*.repo`.
    #[arg(long)]
    pub repos_from_system: bool,

    /// Architecture to test against. Auto-detected from the PUTs if omitted.
    #[arg(long, value_name = "ARCH")]
    pub arch: Option<String>,
}

/// The `rpmdeplint` subcommands. Names render as `kebab-case` (`check-sat`,
/// `list-deps`, ...) via clap's default subcommand naming.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run all four checks and aggregate their diagnostics.
    Check {
        #[command(flatten)]
        args: CommonArgs,
    },

    /// Check only that each PUT's own dependencies are satisfiable.
    CheckSat {
        #[command(flatten)]
        args: CommonArgs,
    },

    /// Check only for repository closure breakage caused by the PUTs.
    CheckRepoclosure {
        #[command(flatten)]
        args: CommonArgs,
    },

    /// Check only for undeclared file conflicts involving the PUTs.
    CheckConflicts {
        #[command(flatten)]
        args: CommonArgs,
    },

    /// Check only whether the PUTs would be upgraded or obsoleted by an
    /// existing repo package.
    CheckUpgrade {
        #[command(flatten)]
        args: CommonArgs,
    },

    /// Print each PUT's transitive dependency closure.
    ListDeps {
        #[command(flatten)]
        args: CommonArgs,
    },

    /// Generates man pages into `OUT_DIR`. Not part of the stable CLI surface.
    #[command(hide = true)]
    Man {
        /// Directory to write the generated `.1` files into.
        out_dir: PathBuf,
    },
}
