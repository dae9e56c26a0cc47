//! Issues command - issue lookup and assignment.

use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use ghpilot_github::{add_labels, assign_issue, auto_assign, IssueFilter, IssueState};
use ghpilot_store::{vars, Config, StoreError};
use tracing::info;

use super::{connect, print};
use crate::output::OutcomeSummary;
use crate::Cli;

/// Arguments for the issues command.
#[derive(Args)]
pub struct IssuesArgs {
    /// Repository as owner/name (overrides GITHUB_OWNER and GITHUB_REPO).
    #[arg(long, global = true)]
    pub repo: Option<String>,

    #[command(subcommand)]
    pub action: IssuesAction,
}

/// Issue subcommands.
#[derive(Subcommand)]
pub enum IssuesAction {
    /// Show one issue.
    Get {
        /// Issue number.
        number: u64,
    },

    /// List issues.
    List {
        /// State filter.
        #[arg(long, default_value = "open")]
        state: StateArg,

        /// Only issues carrying this label (repeatable).
        #[arg(long)]
        label: Vec<String>,

        /// Include pull requests.
        #[arg(long)]
        include_pulls: bool,
    },

    /// Assign users to an issue.
    Assign {
        /// Issue number.
        number: u64,

        /// Logins to assign.
        #[arg(required = true)]
        users: Vec<String>,
    },

    /// Add labels to an issue.
    Label {
        /// Issue number.
        number: u64,

        /// Labels to add.
        #[arg(required = true)]
        labels: Vec<String>,
    },

    /// Assign issues round-robin over COPILOT_EXPERTS.
    AutoAssign {
        /// Issue numbers.
        #[arg(required = true)]
        numbers: Vec<u64>,
    },

    /// List users that can be assigned.
    Assignees,
}

/// Issue state on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StateArg {
    /// Open issues.
    Open,
    /// Closed issues.
    Closed,
    /// Both.
    All,
}

impl From<StateArg> for IssueState {
    fn from(state: StateArg) -> Self {
        match state {
            StateArg::Open => Self::Open,
            StateArg::Closed => Self::Closed,
            StateArg::All => Self::All,
        }
    }
}

/// Runs the issues command.
pub async fn run(args: &IssuesArgs, cli: &Cli, config: &Config) -> Result<()> {
    let repo = config.repository(args.repo.as_deref())?;
    let client = connect(config).await?;

    match &args.action {
        IssuesAction::Get { number } => {
            let issue = client.get_issue(&repo, *number).await?;
            print(cli, &issue, |f| f.format_issue(&issue))
        }
        IssuesAction::List { state, label, include_pulls } => {
            let filter = IssueFilter {
                state: (*state).into(),
                labels: label.clone(),
                exclude_pull_requests: !include_pulls,
            };
            let issues = client.list_issues(&repo, &filter).await?;
            info!(count = issues.len(), "Listed issues");
            print(cli, &issues, |f| f.format_issues(&issues))
        }
        IssuesAction::Assign { number, users } => {
            let outcome = assign_issue(&client, &repo, *number, users).await;
            let summary = OutcomeSummary::new(vec![outcome]);
            print(cli, &summary, |f| f.format_outcomes(&summary.outcomes))
        }
        IssuesAction::Label { number, labels } => {
            let outcome = add_labels(&client, &repo, *number, labels).await;
            let summary = OutcomeSummary::new(vec![outcome]);
            print(cli, &summary, |f| f.format_outcomes(&summary.outcomes))
        }
        IssuesAction::AutoAssign { numbers } => {
            if config.experts.is_empty() {
                return Err(StoreError::config(vars::EXPERTS, "no experts configured").into());
            }
            let outcomes = auto_assign(&client, &repo, numbers, &config.experts).await;
            let summary = OutcomeSummary::new(outcomes);
            print(cli, &summary, |f| f.format_outcomes(&summary.outcomes))
        }
        IssuesAction::Assignees => {
            let assignees = client.list_assignees(&repo).await?;
            print(cli, &assignees, |f| f.format_assignees(&assignees))
        }
    }
}
