//! Integration tests for the metrics aggregator.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use ghpilot_core::{aggregate, Seat, UsageRecord};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
}

#[test]
fn test_end_to_end_example() {
    let now = Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap();
    let created = now - Duration::days(200);

    let usage = vec![
        UsageRecord::new(day(28), 100, 60, 8),
        UsageRecord::new(day(29), 50, 20, 6),
    ];
    let seats = vec![
        Seat::new("recent", created, Some(now - Duration::days(5))),
        Seat::new("stale", created, Some(now - Duration::days(40))),
        Seat::new("never", created, None),
    ];

    let summary = aggregate("Acme", &usage, &seats, 19.0, now);

    assert_eq!(summary.total_suggestions, 150);
    assert_eq!(summary.total_acceptances, 80);
    assert!((summary.acceptance_rate - 80.0 / 150.0).abs() < f64::EPSILON);
    assert!((summary.acceptance_rate - 0.533).abs() < 0.001);
    assert_eq!(summary.active_seats, 1);
    assert_eq!(summary.inactive_seats, 2);
    assert_eq!(summary.total_monthly_cost, 57.0);
    assert_eq!(summary.potential_savings, 38.0);
}

#[test]
fn test_empty_usage_yields_zeros() {
    let summary = aggregate("Acme", &[], &[], 19.0, Utc::now());

    assert_eq!(summary.total_suggestions, 0);
    assert_eq!(summary.total_acceptances, 0);
    assert_eq!(summary.total_lines_accepted, 0);
    assert_eq!(summary.peak_active_users, 0);
    assert_eq!(summary.acceptance_rate, 0.0);
    assert_eq!(summary.total_seats, 0);
    assert_eq!(summary.total_monthly_cost, 0.0);
    assert!(summary.period_start.is_none());
    assert!(summary.languages.is_empty());
}

#[test]
fn test_acceptance_rate_bounds() {
    let cases = [(1, 0), (1, 1), (7, 3), (1_000_000, 999_999), (3, 3)];

    for (suggestions, acceptances) in cases {
        let usage = vec![UsageRecord::new(day(1), suggestions, acceptances, 1)];
        let summary = aggregate("Acme", &usage, &[], 19.0, Utc::now());

        assert!(
            (0.0..=1.0).contains(&summary.acceptance_rate),
            "rate out of bounds for {suggestions}/{acceptances}"
        );
        #[allow(clippy::cast_precision_loss)]
        let expected = acceptances as f64 / suggestions as f64;
        assert_eq!(summary.acceptance_rate, expected);
    }
}

#[test]
fn test_acceptances_above_suggestions_cap_the_rate() {
    let usage = vec![UsageRecord::new(day(1), 10, 12, 1)];
    let summary = aggregate("Acme", &usage, &[], 19.0, Utc::now());

    assert_eq!(summary.total_acceptances, 12);
    assert_eq!(summary.acceptance_rate, 1.0);
}

#[test]
fn test_zero_suggestions_with_days_is_zero_rate() {
    let usage = vec![UsageRecord::new(day(1), 0, 0, 4), UsageRecord::new(day(2), 0, 0, 2)];
    let summary = aggregate("Acme", &usage, &[], 19.0, Utc::now());
    assert_eq!(summary.acceptance_rate, 0.0);
    assert_eq!(summary.peak_active_users, 4);
}

#[test]
fn test_seat_counts_always_sum_to_total() {
    let now = Utc::now();
    let seats: Vec<Seat> = (0..25)
        .map(|i| {
            let last = match i % 3 {
                0 => None,
                1 => Some(now - Duration::days(i)),
                _ => Some(now - Duration::days(i * 3)),
            };
            Seat::new(format!("user{i}"), now - Duration::days(365), last)
        })
        .collect();

    let summary = aggregate("Acme", &[], &seats, 19.0, now);

    assert_eq!(summary.active_seats + summary.inactive_seats, summary.total_seats);
    assert_eq!(summary.total_seats, 25);

    let never_used = seats.iter().filter(|s| s.last_activity_at.is_none()).count() as u64;
    assert!(summary.inactive_seats >= never_used);
}

#[test]
fn test_aggregation_is_idempotent() {
    let now = Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap();
    let usage = vec![
        UsageRecord::new(day(1), 40, 13, 9),
        UsageRecord::new(day(2), 22, 9, 11),
    ];
    let seats = vec![
        Seat::new("a", now - Duration::days(60), Some(now - Duration::days(1))),
        Seat::new("b", now - Duration::days(60), None),
    ];

    let first = aggregate("Acme", &usage, &seats, 21.0, now);
    let second = aggregate("Acme", &usage, &seats, 21.0, now);

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}
