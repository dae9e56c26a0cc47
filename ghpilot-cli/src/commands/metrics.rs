//! Metrics command - Copilot usage metrics report.

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::Args;
use ghpilot_github::metrics_report;
use ghpilot_store::{Config, METRICS_PREFIX};
use tracing::info;

use super::{connect, print, save};
use crate::Cli;

/// Arguments for the metrics command.
#[derive(Args, Default)]
pub struct MetricsArgs {
    /// First day (YYYY-MM-DD); defaults to 30 days before the end.
    #[arg(long)]
    pub since: Option<NaiveDate>,

    /// Last day (YYYY-MM-DD); defaults to today.
    #[arg(long)]
    pub until: Option<NaiveDate>,

    /// Team slug to break usage down by (repeatable; overrides COPILOT_TEAMS).
    #[arg(long)]
    pub team: Vec<String>,

    /// Do not write the report file.
    #[arg(long)]
    pub no_save: bool,
}

/// Runs the metrics command.
pub async fn run(args: &MetricsArgs, cli: &Cli, config: &Config) -> Result<()> {
    let org = config.organization(cli.org.as_deref())?;
    let now = Utc::now();
    let window = config.window(args.since, args.until, now.date_naive())?;
    let client = connect(config).await?;
    let teams = if args.team.is_empty() { &config.teams } else { &args.team };

    info!(org = %org, since = %window.since(), until = %window.until(), "Building metrics report");
    let report = metrics_report(&client, &org, &window, teams, config.cost_per_seat, now).await?;

    print(cli, &report, |f| {
        let mut out = f.format_metrics(&report.summary);
        out.push_str("\n\n");
        out.push_str(&f.format_billing_outcome(&report.billing));
        out
    })?;

    save(cli, args.no_save, METRICS_PREFIX, &org, &report, now).await
}
