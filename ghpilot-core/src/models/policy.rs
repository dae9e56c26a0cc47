//! Organization policy overview.
//!
//! The overview joins several independently fetched sections. Each section
//! is a [`FieldOutcome`] so one missing permission does not hide the rest.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::billing::{PublicCodeSuggestions, SeatManagement};

// ============================================================================
// Field Outcome
// ============================================================================

/// A report section that is either available or degraded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FieldOutcome<T> {
    /// The section was fetched.
    Available {
        /// Section contents.
        value: T,
    },
    /// The section could not be fetched.
    Unavailable {
        /// What went wrong.
        error: String,
        /// Suggested fix, if one is known.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        remedy: Option<String>,
    },
}

impl<T> FieldOutcome<T> {
    /// Wraps a fetched value.
    pub fn available(value: T) -> Self {
        Self::Available { value }
    }

    /// Marks the section as degraded.
    pub fn unavailable(error: impl Into<String>, remedy: Option<String>) -> Self {
        Self::Unavailable {
            error: error.into(),
            remedy,
        }
    }

    /// Returns true if the section was fetched.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }

    /// Returns the value if available.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Available { value } => Some(value),
            Self::Unavailable { .. } => None,
        }
    }

    /// Returns the error message if unavailable.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Available { .. } => None,
            Self::Unavailable { error, .. } => Some(error),
        }
    }
}

// ============================================================================
// Sections
// ============================================================================

/// General organization settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationSettings {
    /// Organization login.
    pub login: String,
    /// Display name.
    pub name: Option<String>,
    /// Billing plan name.
    pub plan: Option<String>,
    /// Base permission for members on repositories.
    pub default_repository_permission: Option<String>,
    /// Members may create repositories.
    pub members_can_create_repositories: Option<bool>,
    /// Members may create public repositories.
    pub members_can_create_public_repositories: Option<bool>,
    /// Members may create private repositories.
    pub members_can_create_private_repositories: Option<bool>,
    /// Members may fork private repositories.
    pub members_can_fork_private_repositories: Option<bool>,
    /// Web commits must be signed off.
    pub web_commit_signoff_required: Option<bool>,
}

/// Copilot policy settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopilotSettings {
    /// How seats are granted.
    pub seat_management: SeatManagement,
    /// Policy for suggestions matching public code.
    pub public_code_suggestions: PublicCodeSuggestions,
    /// Copilot Chat in the IDE.
    pub ide_chat: Option<String>,
    /// Copilot Chat on github.com.
    pub platform_chat: Option<String>,
    /// Copilot in the CLI.
    pub cli: Option<String>,
    /// Copilot plan.
    pub plan_type: Option<String>,
    /// Seats billed in the current cycle.
    pub total_seats: u64,
}

/// Security defaults for new repositories and member requirements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecuritySettings {
    /// Members must use two-factor authentication.
    pub two_factor_requirement_enabled: Option<bool>,
    /// Advanced Security enabled for new repositories.
    pub advanced_security_enabled_for_new_repositories: Option<bool>,
    /// Dependabot alerts enabled for new repositories.
    pub dependabot_alerts_enabled_for_new_repositories: Option<bool>,
    /// Dependabot security updates enabled for new repositories.
    pub dependabot_security_updates_enabled_for_new_repositories: Option<bool>,
    /// Dependency graph enabled for new repositories.
    pub dependency_graph_enabled_for_new_repositories: Option<bool>,
    /// Secret scanning enabled for new repositories.
    pub secret_scanning_enabled_for_new_repositories: Option<bool>,
    /// Secret scanning push protection enabled for new repositories.
    pub secret_scanning_push_protection_enabled_for_new_repositories: Option<bool>,
}

impl SecuritySettings {
    /// Returns true if none of the fields were visible to the caller.
    ///
    /// GitHub omits these fields unless the token may read organization
    /// administration settings.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// GitHub Actions permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionsSettings {
    /// `all`, `none` or `selected`.
    pub enabled_repositories: String,
    /// `all`, `local_only` or `selected`.
    pub allowed_actions: Option<String>,
}

// ============================================================================
// Policy Overview
// ============================================================================

/// Comprehensive policy overview for one organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyOverview {
    /// Organization login.
    pub organization: String,
    /// Instant the overview was generated.
    pub generated_at: DateTime<Utc>,
    /// General organization settings.
    pub organization_settings: FieldOutcome<OrganizationSettings>,
    /// Copilot settings.
    pub copilot_settings: FieldOutcome<CopilotSettings>,
    /// Security settings.
    pub security_settings: FieldOutcome<SecuritySettings>,
    /// Actions permissions.
    pub actions_settings: FieldOutcome<ActionsSettings>,
}

impl PolicyOverview {
    /// Number of sections that could be fetched.
    pub fn available_sections(&self) -> usize {
        [
            self.organization_settings.is_available(),
            self.copilot_settings.is_available(),
            self.security_settings.is_available(),
            self.actions_settings.is_available(),
        ]
        .into_iter()
        .filter(|ok| *ok)
        .count()
    }

    /// Total number of sections.
    pub const SECTIONS: usize = 4;
}
