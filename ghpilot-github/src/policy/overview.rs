//! Comprehensive organization policy overview.

use chrono::{DateTime, Utc};
use ghpilot_core::{FieldOutcome, PolicyOverview, SecuritySettings};
use ghpilot_fetch::FetchError;
use tracing::{info, instrument, warn};

use super::api::OrganizationResponse;
use crate::client::GitHubClient;
use crate::copilot::degrade;

const SECURITY_HIDDEN: &str = "security settings are not visible to this installation";
const SECURITY_REMEDY: &str =
    "grant the GitHub App the Administration: read organization permission";

fn security_section(
    org: &Result<OrganizationResponse, FetchError>,
) -> FieldOutcome<SecuritySettings> {
    match org {
        Ok(org) => {
            let security = org.security();
            if security.is_empty() {
                FieldOutcome::unavailable(SECURITY_HIDDEN, Some(SECURITY_REMEDY.to_string()))
            } else {
                FieldOutcome::available(security)
            }
        }
        Err(e) => FieldOutcome::unavailable(e.to_string(), e.remedy().map(str::to_string)),
    }
}

/// Reads every policy section of `org`.
///
/// Sections are fetched concurrently and degrade independently, so this
/// only fails when the report deadline passes.
///
/// # Errors
///
/// Returns `FetchError::Timeout` when the report deadline passes.
#[instrument(skip(client))]
pub async fn policy_overview(
    client: &GitHubClient,
    org: &str,
    now: DateTime<Utc>,
) -> Result<PolicyOverview, FetchError> {
    client
        .with_deadline(async {
            let (org_info, billing, actions) = tokio::join!(
                client.org_info(org),
                client.copilot_billing_raw(org),
                client.actions_permissions(org),
            );

            let security_settings = security_section(&org_info);
            let overview = PolicyOverview {
                organization: org.to_string(),
                generated_at: now,
                organization_settings: degrade("organization", org_info.map(|o| o.settings())),
                copilot_settings: degrade("copilot", billing.map(|b| b.into_settings())),
                security_settings,
                actions_settings: degrade("actions", actions),
            };

            let available = overview.available_sections();
            if available == 0 {
                warn!("No policy section could be read");
            } else {
                info!(available, total = PolicyOverview::SECTIONS, "Policy overview built");
            }
            Ok(overview)
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeTransport;
    use chrono::TimeZone;
    use ghpilot_core::SeatManagement;
    use serde_json::json;
    use std::sync::Arc;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 45).unwrap()
    }

    fn org_body() -> serde_json::Value {
        json!({
            "login": "acme",
            "name": "Acme Corp",
            "plan": {"name": "enterprise"},
            "default_repository_permission": "read",
            "members_can_create_repositories": false,
            "two_factor_requirement_enabled": true,
            "secret_scanning_enabled_for_new_repositories": true
        })
    }

    #[tokio::test]
    async fn test_all_sections_available() {
        let fake = FakeTransport::new()
            .get("/orgs/acme", org_body())
            .get(
                "/orgs/acme/copilot/billing",
                json!({
                    "seat_breakdown": {"total": 40},
                    "seat_management_setting": "assign_selected",
                    "public_code_suggestions": "block",
                    "ide_chat": "enabled",
                    "plan_type": "business"
                }),
            )
            .get(
                "/orgs/acme/actions/permissions",
                json!({"enabled_repositories": "all", "allowed_actions": "selected"}),
            );
        let client = GitHubClient::with_transport(Arc::new(fake));

        let overview = policy_overview(&client, "acme", now()).await.unwrap();
        assert_eq!(overview.available_sections(), PolicyOverview::SECTIONS);

        let org = overview.organization_settings.value().unwrap();
        assert_eq!(org.plan.as_deref(), Some("enterprise"));
        assert_eq!(org.members_can_create_repositories, Some(false));

        let copilot = overview.copilot_settings.value().unwrap();
        assert_eq!(copilot.seat_management, SeatManagement::AssignSelected);
        assert_eq!(copilot.total_seats, 40);

        let security = overview.security_settings.value().unwrap();
        assert_eq!(security.two_factor_requirement_enabled, Some(true));
    }

    #[tokio::test]
    async fn test_sections_degrade_independently() {
        let fake = FakeTransport::new()
            .get("/orgs/acme", json!({"login": "acme"}))
            .fail("/orgs/acme/copilot/billing", || {
                FetchError::Forbidden("Resource not accessible by integration".to_string())
            })
            .get("/orgs/acme/actions/permissions", json!({"enabled_repositories": "none"}));
        let client = GitHubClient::with_transport(Arc::new(fake));

        let overview = policy_overview(&client, "acme", now()).await.unwrap();

        assert!(overview.organization_settings.is_available());
        assert!(overview.actions_settings.is_available());
        assert!(!overview.copilot_settings.is_available());
        // No admin fields in the org body.
        assert_eq!(overview.security_settings.error(), Some(SECURITY_HIDDEN));
        assert_eq!(overview.available_sections(), 2);
    }

    #[tokio::test]
    async fn test_nothing_available_still_returns_overview() {
        let client = GitHubClient::with_transport(Arc::new(FakeTransport::new()));

        let overview = policy_overview(&client, "acme", now()).await.unwrap();
        assert_eq!(overview.available_sections(), 0);
        assert!(overview.organization_settings.error().unwrap().contains("no route"));
    }
}
