// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! ghpilot CLI - GitHub App reports for Copilot, issues and org policy.
//!
//! # Examples
//!
//! ```bash
//! # Copilot metrics for the last 30 days
//! ghpilot metrics --org acme
//!
//! # Metrics for a fixed window with per-team usage
//! ghpilot metrics --since 2024-05-01 --until 2024-05-31 --team platform
//!
//! # Seats nobody used in the last 30 days
//! ghpilot seats --inactive-only
//!
//! # Organization policy overview as JSON
//! ghpilot policy --format json --pretty
//!
//! # Assign an issue
//! ghpilot issues --repo octo-org/widgets assign 123 alice
//!
//! # Spread issues over COPILOT_EXPERTS
//! ghpilot issues auto-assign 10 11 12
//! ```

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use ghpilot_fetch::FetchError;
use ghpilot_store::{Config, StoreError, DEFAULT_REPORT_DIR};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{billing, issues, metrics, policy, seats, token};

// ============================================================================
// CLI Definition
// ============================================================================

/// ghpilot CLI - GitHub App reports.
#[derive(Parser)]
#[command(name = "ghpilot")]
#[command(about = "GitHub App reports for Copilot, issues and org policy")]
#[command(long_about = r#"
ghpilot authenticates as a GitHub App installation and reports on an
organization.

Authentication (environment):
  GITHUB_APP_ID, GITHUB_PRIVATE_KEY_PATH, GITHUB_INSTALLATION_ID
  or GITHUB_TOKEN for a pre-issued token

Examples:
  ghpilot metrics                  # Copilot metrics, last 30 days
  ghpilot seats --inactive-only    # Unused seats
  ghpilot billing                  # Copilot billing
  ghpilot policy                   # Organization policy overview
  ghpilot issues list --label bug  # Issues of GITHUB_OWNER/GITHUB_REPO
"#)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Organization (overrides GITHUB_ORG).
    #[arg(long, global = true)]
    pub org: Option<String>,

    /// Directory for report files.
    #[arg(long, global = true, default_value = DEFAULT_REPORT_DIR)]
    pub output_dir: PathBuf,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Copilot usage metrics report.
    #[command(visible_alias = "m")]
    Metrics(metrics::MetricsArgs),

    /// Copilot seats with activity status.
    #[command(visible_alias = "s")]
    Seats(seats::SeatsArgs),

    /// Copilot billing information.
    Billing,

    /// Organization policy overview.
    #[command(visible_alias = "p")]
    Policy(policy::PolicyArgs),

    /// Issue lookup and assignment.
    #[command(visible_alias = "i")]
    Issues(issues::IssuesArgs),

    /// Print the installation access token.
    Token,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    #[allow(dead_code)]
    Success = 0,
    /// Any unhandled failure.
    Error = 1,
}

impl Cli {
    /// True when text output should carry ANSI colors.
    pub fn use_colors(&self) -> bool {
        !self.no_color && std::env::var_os("NO_COLOR").is_none()
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let default = if verbose { "ghpilot=debug,info" } else { "ghpilot=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// Finds a suggested fix anywhere in the error chain.
fn remedy(error: &anyhow::Error) -> Option<&'static str> {
    error.chain().find_map(|cause| {
        cause
            .downcast_ref::<FetchError>()
            .and_then(FetchError::remedy)
            .or_else(|| cause.downcast_ref::<StoreError>().and_then(StoreError::remedy))
    })
}

/// Runs the selected command against `config`.
async fn dispatch(cli: &Cli, config: &Config) -> Result<()> {
    match &cli.command {
        Commands::Metrics(args) => metrics::run(args, cli, config).await,
        Commands::Seats(args) => seats::run(args, cli, config).await,
        Commands::Billing => billing::run(cli, config).await,
        Commands::Policy(args) => policy::run(args, cli, config).await,
        Commands::Issues(args) => issues::run(args, cli, config).await,
        Commands::Token => token::run(cli, config).await,
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match Config::from_env() {
        Ok(config) => dispatch(&cli, &config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "Command failed");
        if !cli.quiet {
            eprintln!("Error: {e:#}");
            if let Some(hint) = remedy(&e) {
                eprintln!("hint: {hint}");
            }
        }
        std::process::exit(ExitCode::Error as i32);
    }

    Ok(())
}
