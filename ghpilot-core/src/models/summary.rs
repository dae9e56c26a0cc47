//! Aggregated metrics summary.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::usage::LanguageStats;

/// Point-in-time Copilot metrics for one organization.
///
/// Built by [`crate::aggregate()`] on every report run and never mutated
/// afterwards. Rates are stored unrounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    /// Organization login.
    pub organization: String,
    /// Instant the report was generated (also the seat activity reference).
    pub generated_at: DateTime<Utc>,
    /// Earliest day covered by the usage records.
    pub period_start: Option<NaiveDate>,
    /// Latest day covered by the usage records.
    pub period_end: Option<NaiveDate>,
    /// Number of usage records folded in.
    pub days_reported: usize,
    /// Completions shown.
    pub total_suggestions: u64,
    /// Completions accepted.
    pub total_acceptances: u64,
    /// Lines suggested.
    pub total_lines_suggested: u64,
    /// Lines accepted.
    pub total_lines_accepted: u64,
    /// Highest daily active user count in the period.
    pub peak_active_users: u64,
    /// `total_acceptances / total_suggestions` capped at 1, 0 when nothing was
    /// suggested.
    pub acceptance_rate: f64,
    /// Per-language totals.
    pub languages: BTreeMap<String, LanguageStats>,
    /// Per-team totals.
    pub teams: BTreeMap<String, TeamStats>,
    /// Seats used within the activity window.
    pub active_seats: u64,
    /// Seats not used within the activity window.
    pub inactive_seats: u64,
    /// Seats processed (`active_seats + inactive_seats`).
    pub total_seats: u64,
    /// Monthly cost of one seat in USD.
    pub cost_per_seat: f64,
    /// `total_seats * cost_per_seat`.
    pub total_monthly_cost: f64,
    /// `inactive_seats * cost_per_seat`.
    pub potential_savings: f64,
}

impl MetricsSummary {
    /// Acceptance rate as a percentage in `[0, 100]`.
    pub fn acceptance_percent(&self) -> f64 {
        self.acceptance_rate * 100.0
    }

    /// Share of seats that are active, in `[0, 1]`.
    #[allow(clippy::cast_precision_loss)]
    pub fn seat_utilization(&self) -> f64 {
        if self.total_seats == 0 {
            0.0
        } else {
            self.active_seats as f64 / self.total_seats as f64
        }
    }

    /// The `n` languages with the most suggestions, ties broken by name.
    pub fn top_languages(&self, n: usize) -> Vec<(&str, &LanguageStats)> {
        let mut langs: Vec<_> = self
            .languages
            .iter()
            .map(|(name, stats)| (name.as_str(), stats))
            .collect();
        langs.sort_by(|a, b| b.1.suggestions.cmp(&a.1.suggestions).then(a.0.cmp(b.0)));
        langs.truncate(n);
        langs
    }
}

/// Accumulated usage for one team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStats {
    /// Completions shown.
    pub suggestions: u64,
    /// Completions accepted.
    pub acceptances: u64,
    /// Highest daily active member count.
    pub peak_active_users: u64,
}

impl TeamStats {
    /// Acceptance rate in `[0, 1]`, 0 when nothing was suggested.
    #[allow(clippy::cast_precision_loss)]
    pub fn acceptance_rate(&self) -> f64 {
        if self.suggestions == 0 {
            0.0
        } else {
            (self.acceptances as f64 / self.suggestions as f64).min(1.0)
        }
    }
}
