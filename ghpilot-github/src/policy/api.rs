//! Organization and Actions endpoints.

use ghpilot_core::{ActionsSettings, OrganizationSettings, SecuritySettings};
use ghpilot_fetch::{ApiRequest, FetchError};
use serde::Deserialize;
use tracing::instrument;

use crate::client::GitHubClient;

/// Body of `GET /orgs/{org}`.
///
/// Most policy fields are only present when the token may read
/// organization administration settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[allow(missing_docs)]
pub struct OrganizationResponse {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub plan: Option<Plan>,
    #[serde(default)]
    pub default_repository_permission: Option<String>,
    #[serde(default)]
    pub members_can_create_repositories: Option<bool>,
    #[serde(default)]
    pub members_can_create_public_repositories: Option<bool>,
    #[serde(default)]
    pub members_can_create_private_repositories: Option<bool>,
    #[serde(default)]
    pub members_can_fork_private_repositories: Option<bool>,
    #[serde(default)]
    pub web_commit_signoff_required: Option<bool>,
    #[serde(default)]
    pub two_factor_requirement_enabled: Option<bool>,
    #[serde(default)]
    pub advanced_security_enabled_for_new_repositories: Option<bool>,
    #[serde(default)]
    pub dependabot_alerts_enabled_for_new_repositories: Option<bool>,
    #[serde(default)]
    pub dependabot_security_updates_enabled_for_new_repositories: Option<bool>,
    #[serde(default)]
    pub dependency_graph_enabled_for_new_repositories: Option<bool>,
    #[serde(default)]
    pub secret_scanning_enabled_for_new_repositories: Option<bool>,
    #[serde(default)]
    pub secret_scanning_push_protection_enabled_for_new_repositories: Option<bool>,
}

/// Organization billing plan.
#[derive(Debug, Clone, Deserialize)]
pub struct Plan {
    /// Plan name (`free`, `team`, `enterprise`).
    pub name: String,
}

impl OrganizationResponse {
    /// General settings section.
    pub fn settings(&self) -> OrganizationSettings {
        OrganizationSettings {
            login: self.login.clone(),
            name: self.name.clone(),
            plan: self.plan.as_ref().map(|p| p.name.clone()),
            default_repository_permission: self.default_repository_permission.clone(),
            members_can_create_repositories: self.members_can_create_repositories,
            members_can_create_public_repositories: self.members_can_create_public_repositories,
            members_can_create_private_repositories: self.members_can_create_private_repositories,
            members_can_fork_private_repositories: self.members_can_fork_private_repositories,
            web_commit_signoff_required: self.web_commit_signoff_required,
        }
    }

    /// Security section.
    pub fn security(&self) -> SecuritySettings {
        SecuritySettings {
            two_factor_requirement_enabled: self.two_factor_requirement_enabled,
            advanced_security_enabled_for_new_repositories: self
                .advanced_security_enabled_for_new_repositories,
            dependabot_alerts_enabled_for_new_repositories: self
                .dependabot_alerts_enabled_for_new_repositories,
            dependabot_security_updates_enabled_for_new_repositories: self
                .dependabot_security_updates_enabled_for_new_repositories,
            dependency_graph_enabled_for_new_repositories: self
                .dependency_graph_enabled_for_new_repositories,
            secret_scanning_enabled_for_new_repositories: self
                .secret_scanning_enabled_for_new_repositories,
            secret_scanning_push_protection_enabled_for_new_repositories: self
                .secret_scanning_push_protection_enabled_for_new_repositories,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ActionsResponse {
    enabled_repositories: String,
    #[serde(default)]
    allowed_actions: Option<String>,
}

impl GitHubClient {
    /// Fetches the organization.
    ///
    /// # Errors
    ///
    /// Returns the request error.
    #[instrument(skip(self))]
    pub async fn org_info(&self, org: &str) -> Result<OrganizationResponse, FetchError> {
        self.get_json(ApiRequest::get(format!("/orgs/{org}"))).await
    }

    /// Fetches the GitHub Actions permissions of the organization.
    ///
    /// # Errors
    ///
    /// Returns the request error.
    #[instrument(skip(self))]
    pub async fn actions_permissions(&self, org: &str) -> Result<ActionsSettings, FetchError> {
        let actions: ActionsResponse = self
            .get_json(ApiRequest::get(format!("/orgs/{org}/actions/permissions")))
            .await?;
        Ok(ActionsSettings {
            enabled_repositories: actions.enabled_repositories,
            allowed_actions: actions.allowed_actions,
        })
    }
}
