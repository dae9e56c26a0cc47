//! Copilot endpoints: usage, seats and billing.

use chrono::{DateTime, NaiveDate, Utc};
use ghpilot_core::{
    BillingInfo, CopilotSettings, LanguageStats, MetricsWindow, PublicCodeSuggestions, Seat,
    SeatBreakdown, SeatManagement, UsageRecord,
};
use ghpilot_fetch::{ApiRequest, FetchError};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::client::GitHubClient;

// ============================================================================
// Wire Types
// ============================================================================

/// One day from `GET /orgs/{org}/copilot/usage`.
#[derive(Debug, Deserialize)]
pub struct UsageDayResponse {
    /// Day in `YYYY-MM-DD`.
    pub day: NaiveDate,
    /// Completions shown.
    #[serde(default)]
    pub total_suggestions_count: u64,
    /// Completions accepted.
    #[serde(default)]
    pub total_acceptances_count: u64,
    /// Lines suggested.
    #[serde(default)]
    pub total_lines_suggested: u64,
    /// Lines accepted.
    #[serde(default)]
    pub total_lines_accepted: u64,
    /// Active users.
    #[serde(default)]
    pub total_active_users: u64,
    /// Chat suggestions accepted.
    #[serde(default)]
    pub total_chat_acceptances: u64,
    /// Chat turns.
    #[serde(default)]
    pub total_chat_turns: u64,
    /// Active chat users.
    #[serde(default)]
    pub total_active_chat_users: u64,
    /// Per language and editor counters.
    #[serde(default)]
    pub breakdown: Vec<UsageBreakdown>,
}

/// One language/editor row of a usage day.
#[derive(Debug, Deserialize)]
pub struct UsageBreakdown {
    /// Language name.
    pub language: String,
    /// Editor name.
    #[serde(default)]
    pub editor: Option<String>,
    /// Completions shown.
    #[serde(default)]
    pub suggestions_count: u64,
    /// Completions accepted.
    #[serde(default)]
    pub acceptances_count: u64,
    /// Lines suggested.
    #[serde(default)]
    pub lines_suggested: u64,
    /// Lines accepted.
    #[serde(default)]
    pub lines_accepted: u64,
}

impl From<UsageDayResponse> for UsageRecord {
    fn from(day: UsageDayResponse) -> Self {
        let mut record = UsageRecord::new(
            day.day,
            day.total_suggestions_count,
            day.total_acceptances_count,
            day.total_active_users,
        );
        record.total_lines_suggested = day.total_lines_suggested;
        record.total_lines_accepted = day.total_lines_accepted;
        record.total_chat_turns = day.total_chat_turns;
        record.total_chat_acceptances = day.total_chat_acceptances;
        record.total_active_chat_users = day.total_active_chat_users;

        // Rows are per language and editor; merge editors.
        day.breakdown.into_iter().fold(record, |record, row| {
            let stats = LanguageStats::new(row.suggestions_count, row.acceptances_count)
                .with_lines(row.lines_suggested, row.lines_accepted);
            record.with_language(row.language, stats)
        })
    }
}

#[derive(Debug, Deserialize)]
struct SeatResponse {
    created_at: DateTime<Utc>,
    #[serde(default)]
    last_activity_at: Option<DateTime<Utc>>,
    #[serde(default)]
    last_activity_editor: Option<String>,
    #[serde(default)]
    pending_cancellation_date: Option<String>,
    assignee: Account,
    #[serde(default)]
    assigning_team: Option<Team>,
}

#[derive(Debug, Deserialize)]
struct Account {
    login: String,
}

#[derive(Debug, Deserialize)]
struct Team {
    slug: String,
}

impl From<SeatResponse> for Seat {
    fn from(seat: SeatResponse) -> Self {
        Self {
            assignee: seat.assignee.login,
            created_at: seat.created_at,
            last_activity_at: seat.last_activity_at,
            last_activity_editor: seat.last_activity_editor,
            pending_cancellation_date: seat.pending_cancellation_date,
            assigning_team: seat.assigning_team.map(|t| t.slug),
        }
    }
}

/// Body of `GET /orgs/{org}/copilot/billing`.
#[derive(Debug, Deserialize)]
pub struct BillingResponse {
    /// Seat counters.
    #[serde(default)]
    pub seat_breakdown: SeatBreakdownResponse,
    /// `assign_all`, `assign_selected`, `disabled` or `unconfigured`.
    pub seat_management_setting: SeatManagement,
    /// `allow`, `block` or `unconfigured`.
    pub public_code_suggestions: PublicCodeSuggestions,
    /// IDE chat policy.
    #[serde(default)]
    pub ide_chat: Option<String>,
    /// github.com chat policy.
    #[serde(default)]
    pub platform_chat: Option<String>,
    /// CLI policy.
    #[serde(default)]
    pub cli: Option<String>,
    /// `business` or `enterprise`.
    #[serde(default)]
    pub plan_type: Option<String>,
}

/// Seat counters in a billing response.
#[derive(Debug, Default, Deserialize)]
#[allow(missing_docs)]
pub struct SeatBreakdownResponse {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub added_this_cycle: u64,
    #[serde(default)]
    pub pending_invitation: u64,
    #[serde(default)]
    pub pending_cancellation: u64,
    #[serde(default)]
    pub active_this_cycle: u64,
    #[serde(default)]
    pub inactive_this_cycle: u64,
}

impl BillingResponse {
    /// Converts to a billing snapshot at `cost_per_seat`.
    pub fn into_billing(self, cost_per_seat: f64) -> BillingInfo {
        let b = self.seat_breakdown;
        BillingInfo {
            total_seats: b.total,
            seat_management: self.seat_management_setting,
            cost_per_seat,
            public_code_suggestions: self.public_code_suggestions,
            plan_type: self.plan_type,
            breakdown: SeatBreakdown {
                added_this_cycle: b.added_this_cycle,
                pending_invitation: b.pending_invitation,
                pending_cancellation: b.pending_cancellation,
                active_this_cycle: b.active_this_cycle,
                inactive_this_cycle: b.inactive_this_cycle,
            },
        }
    }

    /// Converts to the Copilot section of a policy overview.
    pub fn into_settings(self) -> CopilotSettings {
        CopilotSettings {
            seat_management: self.seat_management_setting,
            public_code_suggestions: self.public_code_suggestions,
            ide_chat: self.ide_chat,
            platform_chat: self.platform_chat,
            cli: self.cli,
            plan_type: self.plan_type,
            total_seats: self.seat_breakdown.total,
        }
    }
}

// ============================================================================
// Endpoints
// ============================================================================

fn usage_request(path: String, window: &MetricsWindow) -> ApiRequest {
    ApiRequest::get(path)
        .query("since", window.since().format("%Y-%m-%d"))
        .query("until", window.until().format("%Y-%m-%d"))
}

impl GitHubClient {
    /// Daily usage for the organization within `window`.
    ///
    /// # Errors
    ///
    /// Returns the first page error.
    #[instrument(skip(self, window), fields(since = %window.since(), until = %window.until()))]
    pub async fn copilot_usage(
        &self,
        org: &str,
        window: &MetricsWindow,
    ) -> Result<Vec<UsageRecord>, FetchError> {
        let days: Vec<UsageDayResponse> = self
            .list(usage_request(format!("/orgs/{org}/copilot/usage"), window), None)
            .await?;
        debug!(days = days.len(), "Fetched usage");
        Ok(days.into_iter().map(UsageRecord::from).collect())
    }

    /// Daily usage for one team within `window`.
    ///
    /// # Errors
    ///
    /// Returns the first page error.
    #[instrument(skip(self, window))]
    pub async fn team_copilot_usage(
        &self,
        org: &str,
        team: &str,
        window: &MetricsWindow,
    ) -> Result<Vec<UsageRecord>, FetchError> {
        let days: Vec<UsageDayResponse> = self
            .list(
                usage_request(format!("/orgs/{org}/team/{team}/copilot/usage"), window),
                None,
            )
            .await?;
        Ok(days.into_iter().map(UsageRecord::from).collect())
    }

    /// Every Copilot seat in the organization.
    ///
    /// # Errors
    ///
    /// Returns the first page error.
    #[instrument(skip(self))]
    pub async fn copilot_seats(&self, org: &str) -> Result<Vec<Seat>, FetchError> {
        let seats: Vec<SeatResponse> = self
            .list(
                ApiRequest::get(format!("/orgs/{org}/copilot/billing/seats")),
                Some("seats"),
            )
            .await?;
        debug!(seats = seats.len(), "Fetched seats");
        Ok(seats.into_iter().map(Seat::from).collect())
    }

    /// Raw billing response, shared by the metrics report and the policy
    /// overview.
    ///
    /// # Errors
    ///
    /// Returns the request error.
    #[instrument(skip(self))]
    pub async fn copilot_billing_raw(&self, org: &str) -> Result<BillingResponse, FetchError> {
        self.get_json(ApiRequest::get(format!("/orgs/{org}/copilot/billing")))
            .await
    }

    /// Billing snapshot with seats priced at `cost_per_seat`.
    ///
    /// # Errors
    ///
    /// Returns the request error.
    pub async fn copilot_billing(
        &self,
        org: &str,
        cost_per_seat: f64,
    ) -> Result<BillingInfo, FetchError> {
        Ok(self.copilot_billing_raw(org).await?.into_billing(cost_per_seat))
    }
}
