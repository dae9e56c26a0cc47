//! Scenario tests against a mock GitHub server.

use std::time::Duration;

use chrono::{NaiveDate, TimeZone, Utc};
use ghpilot_core::{MetricsWindow, RepoRef};
use ghpilot_fetch::{Credentials, FetchSettings};
use ghpilot_github::{assign_issue, metrics_report, GitHubClient};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client(server: &MockServer) -> GitHubClient {
    let settings = FetchSettings::default()
        .with_api_base(server.uri())
        .with_timeout(Duration::from_secs(5));
    GitHubClient::connect(settings, &Credentials::Token("ghs_test".to_string()))
        .await
        .unwrap()
}

fn usage_day(
    day: &str,
    suggestions: u64,
    acceptances: u64,
    users: u64,
    language: &str,
) -> serde_json::Value {
    json!({
        "day": day,
        "total_suggestions_count": suggestions,
        "total_acceptances_count": acceptances,
        "total_active_users": users,
        "breakdown": [{
            "language": language,
            "editor": "vscode",
            "suggestions_count": suggestions,
            "acceptances_count": acceptances
        }]
    })
}

fn seat(login: &str, last_activity_at: serde_json::Value) -> serde_json::Value {
    json!({
        "created_at": "2024-01-01T00:00:00Z",
        "last_activity_at": last_activity_at,
        "assignee": {"login": login}
    })
}

#[tokio::test]
async fn metrics_report_end_to_end() {
    let server = MockServer::start().await;
    let now = Utc.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).unwrap();

    Mock::given(method("GET"))
        .and(path("/orgs/acme/copilot/usage"))
        .and(query_param("since", "2024-06-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            usage_day("2024-06-01", 100, 50, 4, "rust"),
            usage_day("2024-06-02", 50, 30, 6, "python")
        ])))
        .mount(&server)
        .await;

    // Seats span two pages linked by a `Link` header.
    let next = format!(
        "<{}/orgs/acme/copilot/billing/seats?page=2&per_page=100>; rel=\"next\"",
        server.uri()
    );
    Mock::given(method("GET"))
        .and(path("/orgs/acme/copilot/billing/seats"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("link", next.as_str())
                .set_body_json(json!({"total_seats": 3, "seats": [
                    seat("alice", json!("2024-06-01T00:00:00Z")),
                    seat("bob", json!("2024-03-01T00:00:00Z"))
                ]})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orgs/acme/copilot/billing/seats"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("link", "<https://example.invalid/?page=1>; rel=\"prev\"")
                .set_body_json(json!({"total_seats": 3, "seats": [
                    seat("carol", serde_json::Value::Null)
                ]})),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/orgs/acme/copilot/billing"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "message": "Resource not accessible by integration"
        })))
        .mount(&server)
        .await;

    let client = client(&server).await;
    let window = MetricsWindow::new(
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(),
    )
    .unwrap();

    let report = metrics_report(&client, "acme", &window, &[], 19.0, now)
        .await
        .unwrap();
    let s = &report.summary;

    assert_eq!((s.total_suggestions, s.total_acceptances), (150, 80));
    assert!((s.acceptance_rate - 0.5333).abs() < 1e-3);
    assert_eq!(s.peak_active_users, 6);
    assert_eq!((s.active_seats, s.inactive_seats, s.total_seats), (1, 2, 3));
    assert!((s.total_monthly_cost - 57.0).abs() < 1e-9);
    assert!((s.potential_savings - 38.0).abs() < 1e-9);
    assert_eq!(s.top_languages(1)[0].0, "rust");
    assert!(!report.billing.is_available());
}

#[tokio::test]
async fn assigning_nonexistent_user_yields_failure_outcome() {
    let server = MockServer::start().await;

    // GitHub accepts the request but leaves the unknown user out.
    Mock::given(method("POST"))
        .and(path("/repos/octo-org/widgets/issues/123/assignees"))
        .and(body_json(json!({"assignees": ["no-such-user"]})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "number": 123,
            "title": "Flaky test",
            "state": "open",
            "labels": [],
            "assignees": [],
            "html_url": "https://github.com/octo-org/widgets/issues/123",
            "created_at": "2024-05-01T09:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server).await;
    let repo = RepoRef::new("octo-org", "widgets");

    let outcome = assign_issue(&client, &repo, 123, &["no-such-user".to_string()]).await;

    assert!(!outcome.success);
    assert_eq!(outcome.issue_number, 123);
    assert!(outcome.error.is_some());
}

#[tokio::test]
async fn assignment_rejected_with_validation_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repos/octo-org/widgets/issues/5/assignees"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"message": "Validation Failed"})),
        )
        .mount(&server)
        .await;

    let client = client(&server).await;
    let repo = RepoRef::new("octo-org", "widgets");

    let outcome = assign_issue(&client, &repo, 5, &["octocat".to_string()]).await;
    assert!(!outcome.success);
    assert!(outcome.error.unwrap().contains("Validation Failed"));
}
