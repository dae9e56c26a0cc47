//! Copilot metrics and seat reports.
//!
//! The metrics report fans out usage, seats, billing and per-team usage,
//! then folds the results into a [`MetricsSummary`]. Usage and seats are
//! required; billing and team usage degrade.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use ghpilot_core::{
    aggregate, BillingInfo, FieldOutcome, MetricsSummary, MetricsWindow, Seat, TeamUsage,
    UsageRecord,
};
use ghpilot_fetch::FetchError;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::client::GitHubClient;

/// Result of [`metrics_report`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Aggregated metrics.
    pub summary: MetricsSummary,
    /// Billing snapshot, or why it is missing.
    pub billing: FieldOutcome<BillingInfo>,
}

/// Turns a failed optional fetch into a degraded field.
pub(crate) fn degrade<T>(section: &str, result: Result<T, FetchError>) -> FieldOutcome<T> {
    match result {
        Ok(value) => FieldOutcome::available(value),
        Err(e) => {
            warn!(section, error = %e, "Section unavailable");
            FieldOutcome::unavailable(e.to_string(), e.remedy().map(str::to_string))
        }
    }
}

/// Adds one team's daily counters to the organization records of the same
/// day. Days without an organization record are dropped.
fn merge_team(records: &mut [UsageRecord], team: &str, team_records: Vec<UsageRecord>) {
    for day in team_records {
        if let Some(record) = records.iter_mut().find(|r| r.date == day.date) {
            record.teams.insert(
                team.to_string(),
                TeamUsage {
                    suggestions: day.total_suggestions,
                    acceptances: day.total_acceptances,
                    active_users: day.total_active_users,
                },
            );
        }
    }
}

/// Builds the metrics report for `org`.
///
/// # Errors
///
/// Returns the usage or seats error, or `FetchError::Timeout` when the
/// report deadline passes.
#[instrument(skip(client, window, teams), fields(teams = teams.len()))]
pub async fn metrics_report(
    client: &GitHubClient,
    org: &str,
    window: &MetricsWindow,
    teams: &[String],
    cost_per_seat: f64,
    now: DateTime<Utc>,
) -> Result<MetricsReport, FetchError> {
    client
        .with_deadline(async {
            let team_usage = join_all(
                teams
                    .iter()
                    .map(|team| client.team_copilot_usage(org, team, window)),
            );
            let (usage, seats, billing, team_usage) = tokio::join!(
                client.copilot_usage(org, window),
                client.copilot_seats(org),
                client.copilot_billing(org, cost_per_seat),
                team_usage,
            );

            let mut usage = usage?;
            let seats = seats?;

            for (team, result) in teams.iter().zip(team_usage) {
                match result {
                    Ok(records) => merge_team(&mut usage, team, records),
                    Err(e) => warn!(team = %team, error = %e, "Team usage unavailable"),
                }
            }

            let summary = aggregate(org, &usage, &seats, cost_per_seat, now);
            info!(
                days = summary.days_reported,
                seats = summary.total_seats,
                "Metrics report built"
            );

            Ok(MetricsReport {
                summary,
                billing: degrade("billing", billing),
            })
        })
        .await
}

// ============================================================================
// Seat Report
// ============================================================================

/// One seat with its activity classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatStatus {
    /// The seat.
    #[serde(flatten)]
    pub seat: Seat,
    /// Used within the activity window.
    pub active: bool,
    /// Days since last activity, `None` if never used.
    pub days_inactive: Option<i64>,
}

/// Seat listing for one organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatReport {
    /// Organization login.
    pub organization: String,
    /// Instant the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Seats in the organization.
    pub total_seats: usize,
    /// Seats used within the activity window.
    pub active_seats: usize,
    /// Seats not used within the activity window.
    pub inactive_seats: usize,
    /// Every seat, least recently active first.
    pub seats: Vec<SeatStatus>,
}

/// Lists every seat of `org` with its activity status.
///
/// # Errors
///
/// Returns the seats error.
pub async fn seat_report(
    client: &GitHubClient,
    org: &str,
    now: DateTime<Utc>,
) -> Result<SeatReport, FetchError> {
    let seats = client.with_deadline(client.copilot_seats(org)).await?;

    let mut seats: Vec<SeatStatus> = seats
        .into_iter()
        .map(|seat| SeatStatus {
            active: seat.is_active(now),
            days_inactive: seat.days_inactive(now),
            seat,
        })
        .collect();
    // Never-used seats first, then by staleness.
    seats.sort_by(|a, b| {
        b.days_inactive
            .unwrap_or(i64::MAX)
            .cmp(&a.days_inactive.unwrap_or(i64::MAX))
            .then_with(|| a.seat.assignee.cmp(&b.seat.assignee))
    });

    let active_seats = seats.iter().filter(|s| s.active).count();
    Ok(SeatReport {
        organization: org.to_string(),
        generated_at: now,
        total_seats: seats.len(),
        active_seats,
        inactive_seats: seats.len() - active_seats,
        seats,
    })
}
