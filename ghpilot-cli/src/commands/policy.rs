//! Policy command - organization policy overview.

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use ghpilot_core::PolicyOverview;
use ghpilot_github::policy_overview;
use ghpilot_store::{Config, POLICY_PREFIX};

use super::{connect, print, save};
use crate::Cli;

/// Arguments for the policy command.
#[derive(Args, Default)]
pub struct PolicyArgs {
    /// Do not write the report file.
    #[arg(long)]
    pub no_save: bool,
}

/// Runs the policy command.
pub async fn run(args: &PolicyArgs, cli: &Cli, config: &Config) -> Result<()> {
    let org = config.organization(cli.org.as_deref())?;
    let client = connect(config).await?;
    let now = Utc::now();

    let overview = policy_overview(&client, &org, now).await?;
    print(cli, &overview, |f| f.format_policy(&overview))?;

    if overview.available_sections() == 0 && !cli.quiet {
        eprintln!(
            "No policy section could be read ({} unavailable); \
             check the app's organization permissions",
            PolicyOverview::SECTIONS
        );
    }

    save(cli, args.no_save, POLICY_PREFIX, &org, &overview, now).await
}
