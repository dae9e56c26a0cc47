//! Assignment and labeling with per-item outcomes.
//!
//! These operations never fail as a whole: every remote failure becomes an
//! [`IssueOutcome::failure`] so batch callers keep going.

use futures::future::join_all;
use ghpilot_core::{IssueOutcome, RepoRef};
use tracing::{info, instrument, warn};

use crate::client::GitHubClient;

/// Assigns `assignees` to issue `number` and verifies the result.
///
/// GitHub answers success even when it drops a user who cannot be assigned,
/// so the returned issue is checked for every requested login.
#[instrument(skip(client, repo), fields(repo = %repo))]
pub async fn assign_issue(
    client: &GitHubClient,
    repo: &RepoRef,
    number: u64,
    assignees: &[String],
) -> IssueOutcome {
    if assignees.is_empty() {
        return IssueOutcome::failure(number, "no assignees given");
    }

    let issue = match client.post_assignees(repo, number, assignees).await {
        Ok(issue) => issue,
        Err(e) => {
            warn!(issue = number, error = %e, "Assignment failed");
            return IssueOutcome::failure(number, e.to_string());
        }
    };

    let missing: Vec<&str> = assignees
        .iter()
        .filter(|user| !issue.is_assigned_to(user))
        .map(String::as_str)
        .collect();

    if missing.is_empty() {
        info!(issue = number, assignees = ?issue.assignees, "Issue assigned");
        IssueOutcome::assigned(number, issue.assignees)
    } else {
        let error = format!("{} cannot be assigned to this repository", missing.join(", "));
        warn!(issue = number, %error, "Assignment not applied");
        IssueOutcome {
            assignees: issue.assignees,
            ..IssueOutcome::failure(number, error)
        }
    }
}

/// Adds `labels` to issue `number`.
#[instrument(skip(client, repo), fields(repo = %repo))]
pub async fn add_labels(
    client: &GitHubClient,
    repo: &RepoRef,
    number: u64,
    labels: &[String],
) -> IssueOutcome {
    if labels.is_empty() {
        return IssueOutcome::failure(number, "no labels given");
    }

    match client.post_labels(repo, number, labels).await {
        Ok(labels) => IssueOutcome::labeled(number, labels),
        Err(e) => {
            warn!(issue = number, error = %e, "Labeling failed");
            IssueOutcome::failure(number, e.to_string())
        }
    }
}

/// Applies each `(issue, assignees)` pair in order.
pub async fn assign_batch(
    client: &GitHubClient,
    repo: &RepoRef,
    assignments: &[(u64, Vec<String>)],
) -> Vec<IssueOutcome> {
    let mut outcomes = Vec::with_capacity(assignments.len());
    for (number, assignees) in assignments {
        outcomes.push(assign_issue(client, repo, *number, assignees).await);
    }

    let failed = outcomes.iter().filter(|o| !o.success).count();
    info!(total = outcomes.len(), failed, "Batch assignment finished");
    outcomes
}

/// Distributes `issues` round-robin over the `experts` that can be assigned.
///
/// Candidates are checked concurrently; a failed check counts as not
/// assignable. With no assignable expert every outcome is a failure.
#[instrument(skip(client, repo, issues), fields(repo = %repo, issues = issues.len()))]
pub async fn auto_assign(
    client: &GitHubClient,
    repo: &RepoRef,
    issues: &[u64],
    experts: &[String],
) -> Vec<IssueOutcome> {
    let checks = join_all(experts.iter().map(|e| client.can_be_assigned(repo, e))).await;

    let available: Vec<&String> = experts
        .iter()
        .zip(checks)
        .filter_map(|(expert, check)| match check {
            Ok(true) => Some(expert),
            Ok(false) => {
                warn!(expert = %expert, "Expert cannot be assigned");
                None
            }
            Err(e) => {
                warn!(expert = %expert, error = %e, "Could not check expert");
                None
            }
        })
        .collect();

    if available.is_empty() {
        warn!("No assignable experts");
        return issues
            .iter()
            .map(|&n| IssueOutcome::failure(n, "no assignable experts available"))
            .collect();
    }

    let assignments: Vec<(u64, Vec<String>)> = issues
        .iter()
        .enumerate()
        .map(|(i, &n)| (n, vec![available[i % available.len()].clone()]))
        .collect();

    assign_batch(client, repo, &assignments).await
}
