//! Metrics aggregation.
//!
//! Folds a sequence of daily [`UsageRecord`]s and a seat list into a single
//! [`MetricsSummary`]. Inputs are only borrowed; the same inputs and the same
//! `now` always produce an equal summary.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::models::{LanguageStats, MetricsSummary, Seat, TeamStats, UsageRecord};

/// Aggregates usage records and seats into a summary.
///
/// - Suggestion, acceptance and line counts are summed over all records.
/// - Active users are reported as the peak daily value, not a sum.
/// - A seat is active iff it was used within the last 30 days before `now`.
/// - Costs are `seats * cost_per_seat`; savings count inactive seats only.
///
/// Empty input yields zero totals and an acceptance rate of 0. Totals are
/// kept as reported, but the rate is capped at 1 when a day reports more
/// acceptances than suggestions.
#[allow(clippy::cast_precision_loss)]
pub fn aggregate(
    organization: &str,
    usage: &[UsageRecord],
    seats: &[Seat],
    cost_per_seat: f64,
    now: DateTime<Utc>,
) -> MetricsSummary {
    let mut suggestions = 0u64;
    let mut acceptances = 0u64;
    let mut lines_suggested = 0u64;
    let mut lines_accepted = 0u64;
    let mut peak_active_users = 0u64;
    let mut languages: BTreeMap<String, LanguageStats> = BTreeMap::new();
    let mut teams: BTreeMap<String, TeamStats> = BTreeMap::new();

    for record in usage {
        suggestions += record.total_suggestions;
        acceptances += record.total_acceptances;
        lines_suggested += record.total_lines_suggested;
        lines_accepted += record.total_lines_accepted;
        peak_active_users = peak_active_users.max(record.total_active_users);

        for (language, stats) in &record.languages {
            languages.entry(language.clone()).or_default().accumulate(stats);
        }

        for (team, day) in &record.teams {
            let entry = teams.entry(team.clone()).or_default();
            entry.suggestions += day.suggestions;
            entry.acceptances += day.acceptances;
            entry.peak_active_users = entry.peak_active_users.max(day.active_users);
        }
    }

    let acceptance_rate = if suggestions > 0 {
        (acceptances as f64 / suggestions as f64).min(1.0)
    } else {
        0.0
    };

    let active_seats = seats.iter().filter(|seat| seat.is_active(now)).count() as u64;
    let total_seats = seats.len() as u64;
    let inactive_seats = total_seats - active_seats;

    MetricsSummary {
        organization: organization.to_string(),
        generated_at: now,
        period_start: usage.iter().map(|r| r.date).min(),
        period_end: usage.iter().map(|r| r.date).max(),
        days_reported: usage.len(),
        total_suggestions: suggestions,
        total_acceptances: acceptances,
        total_lines_suggested: lines_suggested,
        total_lines_accepted: lines_accepted,
        peak_active_users,
        acceptance_rate,
        languages,
        teams,
        active_seats,
        inactive_seats,
        total_seats,
        cost_per_seat,
        total_monthly_cost: total_seats as f64 * cost_per_seat,
        potential_savings: inactive_seats as f64 * cost_per_seat,
    }
}

// ============================================================================
// Tests
// ============================================================================
