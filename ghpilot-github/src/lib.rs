// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # ghpilot GitHub
//!
//! GitHub endpoint clients and the scenarios built on them.
//!
//! | Module | Endpoints | Scenario |
//! |--------|-----------|----------|
//! | [`copilot`] | usage, team usage, seats, billing | [`metrics_report`], [`seat_report`] |
//! | [`issues`] | issues, assignees, labels | [`assign_batch`], [`auto_assign`] |
//! | [`policy`] | organization, Actions permissions | [`policy_overview`] |
//!
//! ## Usage
//!
//! ```ignore
//! use ghpilot_github::{metrics_report, GitHubClient};
//!
//! let client = GitHubClient::connect(settings, &credentials).await?;
//! let report = metrics_report(&client, "acme", &window, &[], 19.0, Utc::now()).await?;
//! ```

pub mod client;
pub mod copilot;
pub mod issues;
pub mod policy;

#[cfg(test)]
mod testing;

pub use client::GitHubClient;

pub use copilot::{metrics_report, seat_report, MetricsReport, SeatReport, SeatStatus};
pub use issues::{
    add_labels, assign_batch, assign_issue, auto_assign, IssueFilter, IssueState,
};
pub use policy::policy_overview;
