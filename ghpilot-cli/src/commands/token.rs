//! Token command - print the installation access token.

use anyhow::{Context, Result};
use ghpilot_store::Config;

use super::{connect, print};
use crate::Cli;

/// Runs the token command.
pub async fn run(cli: &Cli, config: &Config) -> Result<()> {
    let client = connect(config).await?;
    let token = client
        .access_token()
        .context("no access token was issued")?;
    print(cli, token, |_| token.token.clone())
}
