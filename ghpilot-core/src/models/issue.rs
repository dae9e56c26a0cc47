//! Issue views and per-item operation outcomes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

// ============================================================================
// Repository Reference
// ============================================================================

/// A repository identified as `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    /// Owning user or organization.
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl RepoRef {
    /// Creates a repository reference.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl FromStr for RepoRef {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self::new(owner, name))
            }
            _ => Err(CoreError::InvalidData(format!(
                "invalid repository '{s}', expected owner/repo"
            ))),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

// ============================================================================
// Issue
// ============================================================================

/// Pass-through view of a GitHub issue.
///
/// GitHub owns the lifecycle; nothing here is cached or validated locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Issue number within the repository.
    pub number: u64,
    /// Title.
    pub title: String,
    /// `open` or `closed`.
    pub state: String,
    /// Label names.
    #[serde(default)]
    pub labels: Vec<String>,
    /// Assignee logins.
    #[serde(default)]
    pub assignees: Vec<String>,
    /// Browser URL.
    pub html_url: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// True when the issues endpoint returned a pull request.
    #[serde(default)]
    pub is_pull_request: bool,
}

impl Issue {
    /// Returns true if `login` is among the assignees (case-insensitive).
    pub fn is_assigned_to(&self, login: &str) -> bool {
        self.assignees.iter().any(|a| a.eq_ignore_ascii_case(login))
    }

    /// Returns true if the issue carries `label` (case-insensitive).
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l.eq_ignore_ascii_case(label))
    }
}

// ============================================================================
// Issue Outcome
// ============================================================================

/// Result of one assignment or labeling operation.
///
/// Batch callers collect these instead of stopping at the first failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueOutcome {
    /// Issue number.
    pub issue_number: u64,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Assignees on the issue after the operation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assignees: Vec<String>,
    /// Labels on the issue after the operation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    /// Error message if failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IssueOutcome {
    /// Create a successful assignment outcome.
    pub fn assigned(issue_number: u64, assignees: Vec<String>) -> Self {
        Self {
            issue_number,
            success: true,
            assignees,
            labels: Vec::new(),
            error: None,
        }
    }

    /// Create a successful labeling outcome.
    pub fn labeled(issue_number: u64, labels: Vec<String>) -> Self {
        Self {
            issue_number,
            success: true,
            assignees: Vec::new(),
            labels,
            error: None,
        }
    }

    /// Create a failed outcome.
    pub fn failure(issue_number: u64, error: impl Into<String>) -> Self {
        Self {
            issue_number,
            success: false,
            assignees: Vec::new(),
            labels: Vec::new(),
            error: Some(error.into()),
        }
    }
}
