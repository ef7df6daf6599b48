// vaultclean - tidy up a password vault export before re-import

mod clean;
mod exit_codes;
mod report;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use exit_codes::{
    EXIT_CONFIG, EXIT_ERROR, EXIT_INPUT_PARSE, EXIT_INPUT_READ, EXIT_OUTPUT_WRITE, EXIT_SUCCESS,
};

#[derive(Parser)]
#[command(name = "vaultclean")]
#[command(about = "Rename, file, de-duplicate and flag entries of a password vault export")]
#[command(long_version = long_version())]
#[command(version)]
#[command(after_help = "\
Examples:
  vaultclean personal_export.json
  vaultclean personal_export.json org_export.json
  vaultclean personal_export.json org_export.json --dry-run --json > report.json
  vaultclean personal_export.json -o cleaned.json -q

Exit codes:
  0  success     3  input unreadable   5  config error
  1  error       4  input invalid      6  output write failed")]
pub struct Cli {
    /// Personal vault export (unencrypted JSON)
    pub personal: PathBuf,

    /// Organizational vault export; its entries are used for reuse detection
    /// and personal copies of them are dropped
    pub org: Option<PathBuf>,

    /// Run the full pipeline but do not write the cleaned export
    #[arg(long)]
    pub dry_run: bool,

    /// Print the cleanup report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Output path (default: <personal>_cleaned_up_<timestamp>.json next to the input)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Config file (default: <config dir>/vaultclean/config.toml, if present)
    #[arg(long, env = "VAULTCLEAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Suppress the human-readable summary
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Log pipeline decisions to stderr (-v info, -vv debug)
    #[arg(long, short = 'v', action = ArgAction::Count)]
    pub verbose: u8,
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  vaultclean-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  vaultclean-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

/// RUST_LOG wins over `-v` when set.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match clean::cmd_clean(cli) {
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
    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn input_read(msg: impl Into<String>) -> Self {
        Self { code: EXIT_INPUT_READ, message: msg.into(), hint: None }
    }

    pub fn input_parse(msg: impl Into<String>) -> Self {
        Self { code: EXIT_INPUT_PARSE, message: msg.into(), hint: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_CONFIG, message: msg.into(), hint: None }
    }

    pub fn output(msg: impl Into<String>) -> Self {
        Self { code: EXIT_OUTPUT_WRITE, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
