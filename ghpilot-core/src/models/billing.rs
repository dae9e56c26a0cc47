//! Copilot billing snapshot for an organization.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default monthly cost of one Copilot Business seat, in USD.
pub const DEFAULT_COST_PER_SEAT: f64 = 19.0;

// ============================================================================
// Billing Info
// ============================================================================

/// Organization-level Copilot billing snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingInfo {
    /// Seats billed in the current cycle.
    pub total_seats: u64,
    /// How seats are granted.
    pub seat_management: SeatManagement,
    /// Monthly cost of one seat in USD (configured, not reported by GitHub).
    pub cost_per_seat: f64,
    /// Policy for suggestions matching public code.
    pub public_code_suggestions: PublicCodeSuggestions,
    /// Copilot plan (`business`, `enterprise`).
    #[serde(default)]
    pub plan_type: Option<String>,
    /// Seat counters for the current billing cycle.
    #[serde(default)]
    pub breakdown: SeatBreakdown,
}

impl BillingInfo {
    /// Monthly cost of all billed seats.
    #[allow(clippy::cast_precision_loss)]
    pub fn monthly_cost(&self) -> f64 {
        self.total_seats as f64 * self.cost_per_seat
    }
}

/// Seat counters for the current billing cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatBreakdown {
    /// Seats added this cycle.
    pub added_this_cycle: u64,
    /// Seats waiting for the user to accept an invitation.
    pub pending_invitation: u64,
    /// Seats that will be removed at the end of the cycle.
    pub pending_cancellation: u64,
    /// Seats used this cycle.
    pub active_this_cycle: u64,
    /// Seats not used this cycle.
    pub inactive_this_cycle: u64,
}

// ============================================================================
// Seat Management
// ============================================================================

/// How Copilot seats are granted in an organization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SeatManagement {
    /// Every member gets a seat.
    AssignAll,
    /// Seats are granted to selected users and teams.
    AssignSelected,
    /// Copilot is disabled.
    Disabled,
    /// No policy chosen yet.
    Unconfigured,
    /// A value this client does not know about.
    Other(String),
}

impl SeatManagement {
    /// Returns the API string for this setting.
    pub fn as_str(&self) -> &str {
        match self {
            Self::AssignAll => "assign_all",
            Self::AssignSelected => "assign_selected",
            Self::Disabled => "disabled",
            Self::Unconfigured => "unconfigured",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for SeatManagement {
    fn from(value: String) -> Self {
        match value.as_str() {
            "assign_all" => Self::AssignAll,
            "assign_selected" => Self::AssignSelected,
            "disabled" => Self::Disabled,
            "unconfigured" => Self::Unconfigured,
            _ => Self::Other(value),
        }
    }
}

impl From<SeatManagement> for String {
    fn from(value: SeatManagement) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for SeatManagement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Public Code Suggestions
// ============================================================================

/// Policy for suggestions that match public code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PublicCodeSuggestions {
    /// Matching suggestions are shown.
    Allow,
    /// Matching suggestions are blocked.
    Block,
    /// No policy chosen yet.
    Unconfigured,
    /// A value this client does not know about.
    Other(String),
}

impl PublicCodeSuggestions {
    /// Returns the API string for this policy.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Allow => "allow",
            Self::Block => "block",
            Self::Unconfigured => "unconfigured",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for PublicCodeSuggestions {
    fn from(value: String) -> Self {
        match value.as_str() {
            "allow" => Self::Allow,
            "block" => Self::Block,
            "unconfigured" => Self::Unconfigured,
            _ => Self::Other(value),
        }
    }
}

impl From<PublicCodeSuggestions> for String {
    fn from(value: PublicCodeSuggestions) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for PublicCodeSuggestions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
