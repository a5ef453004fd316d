// followcheck CLI - compare an Instagram following/followers export offline

mod check;
mod exit_codes;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use exit_codes::{load_exit_code, EXIT_CONFIG, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};
use followcheck_io::LoadError;

#[derive(Parser)]
#[command(name = "followcheck")]
#[command(about = "See who doesn't follow you back, from your own Instagram export")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Settings file (default: <config dir>/followcheck/settings.toml)
    #[arg(long, global = true, env = "FOLLOWCHECK_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare following.json against followers_<N>.json
    #[command(after_help = "\
Examples:
  followcheck check instagram-export.zip
  followcheck check following.json followers_1.json followers_2.json
  followcheck check ./instagram-export/ --json
  followcheck check export.zip --search bakery
  followcheck check export.zip --output result.json")]
    Check {
        /// A ZIP export, an unpacked export directory, or loose JSON files
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Print the result as JSON on stdout
        #[arg(long)]
        json: bool,

        /// Also write the JSON result to a file
        #[arg(long, short = 'o', value_name = "FILE")]
        output: Option<PathBuf>,

        /// Only show usernames containing TERM (case-insensitive)
        #[arg(long, value_name = "TERM")]
        search: Option<String>,

        #[command(flatten)]
        limits: LimitArgs,
    },

    /// Check that an export is readable without comparing it
    #[command(after_help = "\
Examples:
  followcheck validate instagram-export.zip
  followcheck validate following.json followers_1.json --json")]
    Validate {
        /// A ZIP export, an unpacked export directory, or loose JSON files
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Print the report as JSON on stdout
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        limits: LimitArgs,
    },

    /// Write one of the result lists as CSV
    #[command(after_help = "\
Examples:
  followcheck export export.zip --list not-following-back
  followcheck export export.zip --list you-dont-follow-back -o fans.csv
  followcheck export ./instagram-export/ --list not-following-back --no-urls")]
    Export {
        /// A ZIP export, an unpacked export directory, or loose JSON files
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Which list to export
        #[arg(long, value_enum)]
        list: ListKind,

        /// Output file (omit for stdout)
        #[arg(long, short = 'o', value_name = "FILE")]
        output: Option<PathBuf>,

        /// Leave out the profile URL column
        #[arg(long)]
        no_urls: bool,

        /// Only export usernames containing TERM (case-insensitive)
        #[arg(long, value_name = "TERM")]
        search: Option<String>,

        #[command(flatten)]
        limits: LimitArgs,
    },
}

/// Per-run overrides for the settings file.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct LimitArgs {
    /// Largest accepted file or archive member, in MiB
    #[arg(long, value_name = "MB", value_parser = clap::value_parser!(u64).range(1..))]
    pub(crate) max_file_mb: Option<u64>,

    /// Most JSON members read from an archive
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub(crate) max_entries: Option<u64>,

    /// Drop usernames repeated across followers files
    #[arg(long)]
    pub(crate) dedupe_followers: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum ListKind {
    /// Accounts you follow that don't follow you back
    NotFollowingBack,
    /// Accounts following you that you don't follow back
    YouDontFollowBack,
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  followcheck-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  followcheck-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

/// Logs go to stderr. `FOLLOWCHECK_LOG` wins over `-v`/`-q`.
fn init_logging(verbose: u8, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_env("FOLLOWCHECK_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

    // try_init also installs the log -> tracing bridge
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init()
        .ok();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Check { paths, json, output, search, limits } => {
            check::cmd_check(config, &paths, json, output, search, &limits)
        }
        Commands::Validate { paths, json, limits } => check::cmd_validate(config, &paths, json, &limits),
        Commands::Export { paths, list, output, no_urls, search, limits } => {
            check::cmd_export(config, &paths, list, output, no_urls, search, &limits)
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_CONFIG, message: msg.into(), hint: None }
    }

    /// Error already reported on stderr (e.g. as JSON); exit quietly.
    pub fn silent(code: u8) -> Self {
        Self { code, message: String::new(), hint: None }
    }

    /// Create error from a loading failure with the matching exit code.
    pub fn load(err: &LoadError) -> Self {
        use followcheck_recon::ReconError;

        let hint = match err {
            LoadError::MixedArchive(_) => Some("pass the ZIP on its own, or unzip it and pass the folder".to_string()),
            LoadError::Recon(ReconError::MissingFollowers) => {
                Some("the export keeps followers in followers_1.json, followers_2.json, ...".to_string())
            }
            LoadError::Recon(ReconError::Format(_)) => {
                Some("request the export in JSON format, not HTML".to_string())
            }
            LoadError::Recon(ReconError::SizeLimit { .. }) => Some("raise the limits with --max-file-mb or --max-entries".to_string()),
            _ => None,
        };
        Self { code: load_exit_code(err), message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
