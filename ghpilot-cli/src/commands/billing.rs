//! Billing command - Copilot billing information.

use anyhow::Result;
use ghpilot_store::Config;

use super::{connect, print};
use crate::Cli;

/// Runs the billing command.
pub async fn run(cli: &Cli, config: &Config) -> Result<()> {
    let org = config.organization(cli.org.as_deref())?;
    let client = connect(config).await?;

    let billing = client.copilot_billing(&org, config.cost_per_seat).await?;
    print(cli, &billing, |f| f.format_billing(&billing))
}
