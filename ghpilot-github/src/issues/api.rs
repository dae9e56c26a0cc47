//! Issue endpoints.

use chrono::{DateTime, Utc};
use ghpilot_core::{Issue, RepoRef};
use ghpilot_fetch::{ApiRequest, FetchError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, instrument};

use crate::client::GitHubClient;

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct IssueResponse {
    number: u64,
    title: String,
    state: String,
    #[serde(default)]
    labels: Vec<LabelResponse>,
    #[serde(default)]
    assignees: Vec<UserResponse>,
    html_url: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    pull_request: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct LabelResponse {
    name: String,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    login: String,
}

impl From<IssueResponse> for Issue {
    fn from(issue: IssueResponse) -> Self {
        Self {
            number: issue.number,
            title: issue.title,
            state: issue.state,
            labels: issue.labels.into_iter().map(|l| l.name).collect(),
            assignees: issue.assignees.into_iter().map(|a| a.login).collect(),
            html_url: issue.html_url,
            created_at: issue.created_at,
            is_pull_request: issue.pull_request.is_some(),
        }
    }
}

// ============================================================================
// Filter
// ============================================================================

/// Issue state filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    /// Open issues only.
    #[default]
    Open,
    /// Closed issues only.
    Closed,
    /// Both.
    All,
}

impl IssueState {
    /// Returns the API value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::All => "all",
        }
    }
}

/// Filter for [`GitHubClient::list_issues`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueFilter {
    /// State filter.
    pub state: IssueState,
    /// Issues must carry every one of these labels.
    pub labels: Vec<String>,
    /// Drop pull requests, which the issues endpoint also returns.
    pub exclude_pull_requests: bool,
}

// ============================================================================
// Endpoints
// ============================================================================

fn issue_path(repo: &RepoRef, number: u64) -> String {
    format!("/repos/{}/{}/issues/{number}", repo.owner, repo.name)
}

impl GitHubClient {
    /// Fetches one issue.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::NotFound` for an unknown issue.
    #[instrument(skip(self, repo), fields(repo = %repo))]
    pub async fn get_issue(&self, repo: &RepoRef, number: u64) -> Result<Issue, FetchError> {
        let issue: IssueResponse = self.get_json(ApiRequest::get(issue_path(repo, number))).await?;
        Ok(issue.into())
    }

    /// Lists every issue matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns the first page error.
    #[instrument(skip(self, repo, filter), fields(repo = %repo, state = filter.state.as_str()))]
    pub async fn list_issues(
        &self,
        repo: &RepoRef,
        filter: &IssueFilter,
    ) -> Result<Vec<Issue>, FetchError> {
        let mut request = ApiRequest::get(format!("/repos/{}/{}/issues", repo.owner, repo.name))
            .query("state", filter.state.as_str());
        if !filter.labels.is_empty() {
            request = request.query("labels", filter.labels.join(","));
        }

        let issues: Vec<IssueResponse> = self.list(request, None).await?;
        let issues: Vec<Issue> = issues
            .into_iter()
            .map(Issue::from)
            .filter(|i| !(filter.exclude_pull_requests && i.is_pull_request))
            .collect();
        debug!(count = issues.len(), "Listed issues");
        Ok(issues)
    }

    /// Lists the logins that can be assigned to issues in `repo`.
    ///
    /// # Errors
    ///
    /// Returns the first page error.
    #[instrument(skip(self, repo), fields(repo = %repo))]
    pub async fn list_assignees(&self, repo: &RepoRef) -> Result<Vec<String>, FetchError> {
        let users: Vec<UserResponse> = self
            .list(
                ApiRequest::get(format!("/repos/{}/{}/assignees", repo.owner, repo.name)),
                None,
            )
            .await?;
        Ok(users.into_iter().map(|u| u.login).collect())
    }

    /// Returns true if `user` can be assigned to issues in `repo`.
    ///
    /// GitHub answers 204 when the user can be assigned and 404 otherwise.
    ///
    /// # Errors
    ///
    /// Returns any error other than 404.
    #[instrument(skip(self, repo), fields(repo = %repo))]
    pub async fn can_be_assigned(&self, repo: &RepoRef, user: &str) -> Result<bool, FetchError> {
        let request =
            ApiRequest::get(format!("/repos/{}/{}/assignees/{user}", repo.owner, repo.name));
        match self.send(request).await {
            Ok(_) => Ok(true),
            Err(FetchError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Adds assignees to an issue and returns the updated issue.
    ///
    /// GitHub silently drops users that cannot be assigned; callers should
    /// check the returned assignees.
    ///
    /// # Errors
    ///
    /// Returns the request error.
    #[instrument(skip(self, repo), fields(repo = %repo))]
    pub async fn post_assignees(
        &self,
        repo: &RepoRef,
        number: u64,
        assignees: &[String],
    ) -> Result<Issue, FetchError> {
        let request = ApiRequest::post(
            format!("{}/assignees", issue_path(repo, number)),
            &json!({ "assignees": assignees }),
        )?;
        let issue: IssueResponse = self.get_json(request).await?;
        Ok(issue.into())
    }

    /// Adds labels to an issue and returns every label it now carries.
    ///
    /// # Errors
    ///
    /// Returns the request error.
    #[instrument(skip(self, repo), fields(repo = %repo))]
    pub async fn post_labels(
        &self,
        repo: &RepoRef,
        number: u64,
        labels: &[String],
    ) -> Result<Vec<String>, FetchError> {
        let request = ApiRequest::post(
            format!("{}/labels", issue_path(repo, number)),
            &json!({ "labels": labels }),
        )?;
        let labels: Vec<LabelResponse> = self.get_json(request).await?;
        Ok(labels.into_iter().map(|l| l.name).collect())
    }
}
