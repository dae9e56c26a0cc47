//! CLI command implementations.

pub mod billing;
pub mod issues;
pub mod metrics;
pub mod policy;
pub mod seats;
pub mod token;

use anyhow::{Context, Result};
use ghpilot_github::GitHubClient;
use ghpilot_store::{Config, ReportWriter};
use serde::Serialize;
use tracing::debug;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Authenticates once.
///
/// Commands resolve their target first, so a missing organization or
/// repository is reported without touching credentials.
pub async fn connect(config: &Config) -> Result<GitHubClient> {
    let credentials = config.credentials()?;
    let client = GitHubClient::connect(config.fetch_settings(), &credentials)
        .await
        .context("authentication failed")?;
    debug!(api = %config.api_url, "Connected");
    Ok(client)
}

/// Prints `data` as JSON, or the text rendering produced by `text`.
pub fn print<T: Serialize>(
    cli: &Cli,
    data: &T,
    text: impl FnOnce(&TextFormatter) -> String,
) -> Result<()> {
    let out = match cli.format {
        OutputFormat::Json => JsonFormatter::new(cli.pretty).format(data)?,
        OutputFormat::Text => text(&TextFormatter::new(cli.use_colors())),
    };
    println!("{out}");
    Ok(())
}

/// Persists a report unless saving is disabled.
pub async fn save<T: Serialize>(
    cli: &Cli,
    no_save: bool,
    prefix: &str,
    org: &str,
    report: &T,
    at: chrono::DateTime<chrono::Utc>,
) -> Result<()> {
    if no_save {
        return Ok(());
    }
    let path = ReportWriter::new(&cli.output_dir)
        .persist(prefix, org, report, at)
        .await
        .context("failed to save report")?;
    if !cli.quiet {
        eprintln!("Report saved to {}", path.display());
    }
    Ok(())
}
