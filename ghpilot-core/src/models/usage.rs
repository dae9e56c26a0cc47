//! Daily Copilot usage types.
//!
//! - [`UsageRecord`] - One calendar day of activity for an organization
//! - [`LanguageStats`] - Per-language counters
//! - [`TeamUsage`] - Per-team counters for one day

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Usage Record
// ============================================================================

/// One calendar day of Copilot activity for an organization.
///
/// Records are produced by the API client and only read by the aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Day this record covers.
    pub date: NaiveDate,
    /// Completions shown.
    pub total_suggestions: u64,
    /// Completions accepted.
    pub total_acceptances: u64,
    /// Lines of code suggested.
    #[serde(default)]
    pub total_lines_suggested: u64,
    /// Lines of code accepted.
    #[serde(default)]
    pub total_lines_accepted: u64,
    /// Users with any completion activity that day.
    pub total_active_users: u64,
    /// Chat turns.
    #[serde(default)]
    pub total_chat_turns: u64,
    /// Chat suggestions accepted.
    #[serde(default)]
    pub total_chat_acceptances: u64,
    /// Users with any chat activity that day.
    #[serde(default)]
    pub total_active_chat_users: u64,
    /// Per-language breakdown, keyed by language name.
    #[serde(default)]
    pub languages: BTreeMap<String, LanguageStats>,
    /// Per-team breakdown, keyed by team slug.
    #[serde(default)]
    pub teams: BTreeMap<String, TeamUsage>,
}

impl UsageRecord {
    /// Creates a record with the given day totals and no breakdowns.
    pub fn new(date: NaiveDate, suggestions: u64, acceptances: u64, active_users: u64) -> Self {
        Self {
            date,
            total_suggestions: suggestions,
            total_acceptances: acceptances,
            total_lines_suggested: 0,
            total_lines_accepted: 0,
            total_active_users: active_users,
            total_chat_turns: 0,
            total_chat_acceptances: 0,
            total_active_chat_users: 0,
            languages: BTreeMap::new(),
            teams: BTreeMap::new(),
        }
    }

    /// Adds (or merges into) a language entry.
    pub fn with_language(mut self, language: impl Into<String>, stats: LanguageStats) -> Self {
        self.languages
            .entry(language.into())
            .or_default()
            .accumulate(&stats);
        self
    }

    /// Sets the usage of one team for this day.
    pub fn with_team(mut self, team: impl Into<String>, usage: TeamUsage) -> Self {
        self.teams.insert(team.into(), usage);
        self
    }
}

// ============================================================================
// Language Stats
// ============================================================================

/// Counters for one language, either for one day or accumulated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageStats {
    /// Completions shown.
    pub suggestions: u64,
    /// Completions accepted.
    pub acceptances: u64,
    /// Lines suggested.
    #[serde(default)]
    pub lines_suggested: u64,
    /// Lines accepted.
    #[serde(default)]
    pub lines_accepted: u64,
}

impl LanguageStats {
    /// Creates stats from suggestion/acceptance counts.
    pub fn new(suggestions: u64, acceptances: u64) -> Self {
        Self {
            suggestions,
            acceptances,
            ..Self::default()
        }
    }

    /// Sets the line counters.
    pub fn with_lines(mut self, suggested: u64, accepted: u64) -> Self {
        self.lines_suggested = suggested;
        self.lines_accepted = accepted;
        self
    }

    /// Adds another set of counters into this one.
    pub fn accumulate(&mut self, other: &LanguageStats) {
        self.suggestions += other.suggestions;
        self.acceptances += other.acceptances;
        self.lines_suggested += other.lines_suggested;
        self.lines_accepted += other.lines_accepted;
    }

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

// ============================================================================
// Team Usage
// ============================================================================

/// One team's usage for one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamUsage {
    /// Completions shown to team members.
    pub suggestions: u64,
    /// Completions accepted by team members.
    pub acceptances: u64,
    /// Active team members that day.
    pub active_users: u64,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn test_language_rate_zero_when_no_suggestions() {
        assert_eq!(LanguageStats::default().acceptance_rate(), 0.0);
        assert_eq!(LanguageStats::new(10, 4).acceptance_rate(), 0.4);
    }

    #[test]
    fn test_with_language_merges_duplicates() {
        let record = UsageRecord::new(day(1), 30, 10, 5)
            .with_language("rust", LanguageStats::new(10, 5).with_lines(20, 8))
            .with_language("rust", LanguageStats::new(5, 1).with_lines(4, 2));

        let rust = record.languages["rust"];
        assert_eq!(rust.suggestions, 15);
        assert_eq!(rust.acceptances, 6);
        assert_eq!(rust.lines_suggested, 24);
        assert_eq!(rust.lines_accepted, 10);
    }

    #[test]
    fn test_breakdowns_default_when_missing() {
        let json = r#"{
            "date": "2024-06-01",
            "total_suggestions": 12,
            "total_acceptances": 3,
            "total_active_users": 2
        }"#;

        let record: UsageRecord = serde_json::from_str(json).unwrap();
        assert!(record.languages.is_empty());
        assert!(record.teams.is_empty());
        assert_eq!(record.total_lines_accepted, 0);
    }
}
