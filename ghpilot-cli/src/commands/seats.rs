//! Seats command - Copilot seat activity.

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use ghpilot_github::seat_report;
use ghpilot_store::{Config, SEATS_PREFIX};

use super::{connect, print, save};
use crate::Cli;

/// Arguments for the seats command.
#[derive(Args, Default)]
pub struct SeatsArgs {
    /// Show only seats without activity in the last 30 days.
    #[arg(long)]
    pub inactive_only: bool,

    /// Do not write the report file.
    #[arg(long)]
    pub no_save: bool,
}

/// Runs the seats command.
pub async fn run(args: &SeatsArgs, cli: &Cli, config: &Config) -> Result<()> {
    let org = config.organization(cli.org.as_deref())?;
    let client = connect(config).await?;
    let now = Utc::now();

    let report = seat_report(&client, &org, now).await?;
    save(cli, args.no_save, SEATS_PREFIX, &org, &report, now).await?;

    // The saved file always holds every seat.
    let mut shown = report;
    if args.inactive_only {
        shown.seats.retain(|s| !s.active);
    }
    print(cli, &shown, |f| f.format_seats(&shown))
}
