//! Copilot seat assignments.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Trailing window, in days, within which a seat counts as active.
pub const ACTIVE_WINDOW_DAYS: i64 = 30;

/// One Copilot license assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    /// Login of the user holding the seat.
    pub assignee: String,
    /// When the seat was assigned.
    pub created_at: DateTime<Utc>,
    /// Last Copilot activity, if the user ever used it.
    pub last_activity_at: Option<DateTime<Utc>>,
    /// Editor used for the last activity.
    #[serde(default)]
    pub last_activity_editor: Option<String>,
    /// Date the seat will be removed, if a cancellation is pending.
    #[serde(default)]
    pub pending_cancellation_date: Option<String>,
    /// Team through which the seat was granted.
    #[serde(default)]
    pub assigning_team: Option<String>,
}

impl Seat {
    /// Creates a seat with no editor, cancellation or team information.
    pub fn new(
        assignee: impl Into<String>,
        created_at: DateTime<Utc>,
        last_activity_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            assignee: assignee.into(),
            created_at,
            last_activity_at,
            last_activity_editor: None,
            pending_cancellation_date: None,
            assigning_team: None,
        }
    }

    /// Returns true if the seat was used within the last
    /// [`ACTIVE_WINDOW_DAYS`] days relative to `now`.
    ///
    /// A seat that has never been used is inactive.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.last_activity_at
            .is_some_and(|last| now - last <= Duration::days(ACTIVE_WINDOW_DAYS))
    }

    /// Whole days since the last activity, `None` if never used.
    pub fn days_inactive(&self, now: DateTime<Utc>) -> Option<i64> {
        self.last_activity_at.map(|last| (now - last).num_days())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_window_boundary() {
        let now = Utc::now();
        let created = now - Duration::days(100);

        let exactly_30 = Seat::new("a", created, Some(now - Duration::days(30)));
        let just_over = Seat::new(
            "b",
            created,
            Some(now - Duration::days(30) - Duration::seconds(1)),
        );

        assert!(exactly_30.is_active(now));
        assert!(!just_over.is_active(now));
    }

    #[test]
    fn test_never_used_seat_is_inactive() {
        let now = Utc::now();
        let seat = Seat::new("ghost", now - Duration::days(2), None);
        assert!(!seat.is_active(now));
        assert_eq!(seat.days_inactive(now), None);
    }

    #[test]
    fn test_days_inactive() {
        let now = Utc::now();
        let seat = Seat::new("dev", now - Duration::days(90), Some(now - Duration::days(12)));
        assert_eq!(seat.days_inactive(now), Some(12));
    }
}
