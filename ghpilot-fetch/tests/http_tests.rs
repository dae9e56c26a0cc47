//! HTTP-level tests of the transport and the installation token exchange.

use std::time::Duration;

use chrono::Utc;
use ghpilot_fetch::{
    exchange_installation_token, paginate, ApiRequest, AppCredentials, Credentials, FetchContext,
    FetchError, FetchSettings, HttpTransport, Page, PageOptions, Transport,
};
use serde_json::{json, Value};
use wiremock::matchers::{header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_KEY: &[u8] = include_bytes!("fixtures/test_app_key.pem");

fn transport(server: &MockServer) -> HttpTransport {
    HttpTransport::new(&server.uri(), "ghs_test", Duration::from_secs(5)).unwrap()
}

async fn status_error(status: u16, template: ResponseTemplate) -> FetchError {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orgs/acme"))
        .respond_with(template)
        .mount(&server)
        .await;

    let err = transport(&server)
        .send(ApiRequest::get("/orgs/acme"))
        .await
        .unwrap_err();
    assert!(!matches!(err, FetchError::Network(_)), "status {status} mapped to {err:?}");
    err
}

#[tokio::test]
async fn sends_github_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orgs/acme"))
        .and(header("authorization", "Bearer ghs_test"))
        .and(header("accept", "application/vnd.github+json"))
        .and(header("x-github-api-version", "2022-11-28"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"login": "acme"})))
        .expect(1)
        .mount(&server)
        .await;

    let response = transport(&server)
        .send(ApiRequest::get("/orgs/acme"))
        .await
        .unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.body["login"], "acme");
    assert!(response.link.is_none());
}

#[tokio::test]
async fn maps_error_statuses() {
    let message = |m: &str| json!({"message": m, "documentation_url": "https://docs.github.com"});
    let reply = |status: u16, m: &str| ResponseTemplate::new(status).set_body_json(message(m));

    let err = status_error(401, reply(401, "Bad credentials")).await;
    assert!(matches!(err, FetchError::Unauthorized(ref m) if m == "Bad credentials"));

    let err = status_error(403, reply(403, "Resource not accessible by integration")).await;
    assert!(matches!(err, FetchError::Forbidden(ref m) if m.contains("not accessible")));
    assert!(err.remedy().is_some());

    let err = status_error(
        403,
        ResponseTemplate::new(403)
            .insert_header("x-ratelimit-remaining", "0")
            .insert_header("x-ratelimit-reset", "1700000000")
            .set_body_json(message("API rate limit exceeded")),
    )
    .await;
    assert!(matches!(err, FetchError::RateLimited { reset_at: Some(_), .. }));
    assert!(err.is_transient());

    let err = status_error(
        429,
        ResponseTemplate::new(429).insert_header("retry-after", "30"),
    )
    .await;
    assert!(matches!(err, FetchError::RateLimited { retry_after: Some(30), .. }));

    let err = status_error(404, reply(404, "Not Found")).await;
    assert!(matches!(err, FetchError::NotFound(_)));

    let err = status_error(422, reply(422, "Validation Failed")).await;
    assert!(matches!(err, FetchError::Validation(_)));

    let err = status_error(502, ResponseTemplate::new(502).set_body_string("bad gateway")).await;
    assert!(matches!(
        err,
        FetchError::UnexpectedStatus { status: 502, ref message } if message == "bad gateway"
    ));
}

#[tokio::test]
async fn no_content_yields_null_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/o/r/assignees/octocat"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let response = transport(&server)
        .send(ApiRequest::get("/repos/o/r/assignees/octocat"))
        .await
        .unwrap();
    assert_eq!(response.status, 204);
    assert_eq!(response.body, Value::Null);
}

#[tokio::test]
async fn paginates_over_link_headers() {
    let server = MockServer::start().await;
    let next = format!("<{}/repos/o/r/issues?page=2&per_page=2>; rel=\"next\"", server.uri());

    Mock::given(method("GET"))
        .and(path("/repos/o/r/issues"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("link", next.as_str())
                .set_body_json(json!([{"number": 1}, {"number": 2}])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/o/r/issues"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("link", "<https://example.invalid/x?page=1>; rel=\"first\"")
                .set_body_json(json!([{"number": 3}])),
        )
        .mount(&server)
        .await;

    let transport = &transport(&server);
    let options = PageOptions {
        per_page: 2,
        max_pages: 10,
    };
    let items: Vec<Value> = paginate(options, move |page| {
        let request = page.apply(ApiRequest::get("/repos/o/r/issues"));
        async move { Page::from_response(transport.send(request).await?, None) }
    })
    .await
    .unwrap();

    let numbers: Vec<u64> = items.iter().filter_map(|i| i["number"].as_u64()).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
}

#[tokio::test]
async fn exchanges_installation_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/app/installations/42/access_tokens"))
        .and(header("authorization", "Bearer app-jwt"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "token": "ghs_installation",
            "expires_at": "2030-01-01T00:00:00Z",
            "permissions": {"issues": "write"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let jwt_transport =
        HttpTransport::new(&server.uri(), "app-jwt", Duration::from_secs(5)).unwrap();
    let token = exchange_installation_token(&jwt_transport, 42).await.unwrap();

    assert_eq!(token.token, "ghs_installation");
    assert!(!token.is_expired(Utc::now()));
}

#[tokio::test]
async fn connect_authenticates_app_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/app/installations/7/access_tokens"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "token": "ghs_from_app",
            "expires_at": "2030-01-01T00:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orgs/acme"))
        .and(header("authorization", "Bearer ghs_from_app"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"login": "acme"})))
        .expect(2)
        .mount(&server)
        .await;

    let credentials = Credentials::App(AppCredentials {
        app_id: "12345".to_string(),
        private_key_pem: TEST_KEY.to_vec(),
        installation_id: 7,
    });
    let settings = FetchSettings::default().with_api_base(server.uri());
    let ctx = FetchContext::connect(settings, &credentials).await.unwrap();

    for _ in 0..2 {
        ctx.transport.send(ApiRequest::get("/orgs/acme")).await.unwrap();
    }
    assert_eq!(ctx.access_token().map(|t| t.token.as_str()), Some("ghs_from_app"));
}

#[tokio::test]
async fn rejected_exchange_is_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/app/installations/7/access_tokens"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"message": "A JSON web token could not be decoded"})),
        )
        .mount(&server)
        .await;

    let credentials = Credentials::App(AppCredentials {
        app_id: "12345".to_string(),
        private_key_pem: TEST_KEY.to_vec(),
        installation_id: 7,
    });
    let settings = FetchSettings::default().with_api_base(server.uri());
    let err = FetchContext::connect(settings, &credentials).await.unwrap_err();
    assert!(matches!(err, FetchError::Unauthorized(_)));
}
