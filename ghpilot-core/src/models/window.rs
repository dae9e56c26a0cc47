//! Report date bounds.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Default report length in days.
const DEFAULT_WINDOW_DAYS: i64 = 30;

/// Inclusive date range a metrics report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsWindow {
    since: NaiveDate,
    until: NaiveDate,
}

impl MetricsWindow {
    /// Creates a window, rejecting `since > until`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidData` if the range is inverted.
    pub fn new(since: NaiveDate, until: NaiveDate) -> Result<Self, CoreError> {
        if since > until {
            return Err(CoreError::InvalidData(format!(
                "window start {since} is after window end {until}"
            )));
        }
        Ok(Self { since, until })
    }

    /// Resolves optional bounds against `today`.
    ///
    /// A missing end defaults to `today`; a missing start defaults to 30
    /// days before the end.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidData` if the resolved range is inverted.
    pub fn resolve(
        since: Option<NaiveDate>,
        until: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Self, CoreError> {
        let until = until.unwrap_or(today);
        let since = since.unwrap_or(until - Duration::days(DEFAULT_WINDOW_DAYS));
        Self::new(since, until)
    }

    /// First day of the window.
    pub fn since(&self) -> NaiveDate {
        self.since
    }

    /// Last day of the window.
    pub fn until(&self) -> NaiveDate {
        self.until
    }

    /// Returns true if `date` falls inside the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.since <= date && date <= self.until
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_inverted_window_rejected() {
        assert!(MetricsWindow::new(date("2024-06-10"), date("2024-06-01")).is_err());
    }

    #[test]
    fn test_resolve_defaults() {
        let today = date("2024-06-30");
        let window = MetricsWindow::resolve(None, None, today).unwrap();
        assert_eq!(window.until(), today);
        assert_eq!(window.since(), date("2024-05-31"));

        let window = MetricsWindow::resolve(None, Some(date("2024-03-31")), today).unwrap();
        assert_eq!(window.since(), date("2024-03-01"));
        assert!(window.contains(date("2024-03-15")));
        assert!(!window.contains(date("2024-04-01")));
    }
}
