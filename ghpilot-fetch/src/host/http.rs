//! reqwest-backed [`Transport`] for the GitHub REST API.
//!
//! Adds to every request:
//! - GitHub media type, API version and bearer token headers
//! - A per-request timeout
//! - Request/response tracing
//! - A host check so absolute URLs (from `Link` headers) never carry the
//!   token to another host or over a weaker scheme

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::error::FetchError;
use crate::transport::{ApiRequest, ApiResponse, Method, Transport};

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default GitHub API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// GitHub API version header value.
pub const GITHUB_API_VERSION: &str = "2022-11-28";

/// User agent string for ghpilot.
const USER_AGENT: &str = concat!("ghpilot/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// HTTP Transport
// ============================================================================

/// Authenticated HTTP transport.
#[derive(Clone)]
pub struct HttpTransport {
    inner: Client,
    base: Url,
    timeout: Duration,
}

impl HttpTransport {
    /// Creates a transport that sends `Authorization: Bearer <token>`.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidResponse` for an unparseable base URL and
    /// `FetchError::Authentication` if the token is not a valid header value.
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Result<Self, FetchError> {
        let base = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| FetchError::InvalidResponse(format!("invalid API URL {base_url}: {e}")))?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| FetchError::Authentication(format!("invalid token: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );

        let inner = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            inner,
            base,
            timeout,
        })
    }

    /// Returns the API base URL.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Resolves a relative path or absolute URL against the base.
    fn resolve(&self, path: &str) -> Result<Url, FetchError> {
        if path.starts_with("http://") || path.starts_with("https://") {
            let url = Url::parse(path)
                .map_err(|e| FetchError::InvalidResponse(format!("invalid URL {path}: {e}")))?;
            self.check_host(&url)?;
            return Ok(url);
        }

        let joined = format!("{}{}", self.base.as_str().trim_end_matches('/'), path);
        Url::parse(&joined)
            .map_err(|e| FetchError::InvalidResponse(format!("invalid URL {joined}: {e}")))
    }

    /// Rejects absolute URLs that point away from the API host or scheme.
    fn check_host(&self, url: &Url) -> Result<(), FetchError> {
        if url.scheme() != self.base.scheme() {
            return Err(FetchError::InvalidResponse(format!(
                "refusing to follow {} URL from a {} API base",
                url.scheme(),
                self.base.scheme()
            )));
        }
        if url.host_str() == self.base.host_str() && url.port() == self.base.port() {
            Ok(())
        } else {
            Err(FetchError::InvalidResponse(format!(
                "refusing to follow URL on foreign host: {}",
                url.host_str().unwrap_or("<none>")
            )))
        }
    }

    fn map_send_error(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout.as_secs())
        } else {
            err.into()
        }
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base", &self.base.as_str())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// GitHub error body.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, FetchError> {
        let url = self.resolve(&request.path)?;
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.inner.request(method, url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        debug!("Sending request");
        let response = builder.send().await.map_err(|e| self.map_send_error(e))?;
        let status = response.status();
        let headers = response.headers().clone();
        debug!(status = %status, "Response received");

        let text = response.text().await.map_err(|e| self.map_send_error(e))?;

        if status.is_success() {
            let body = if status == StatusCode::NO_CONTENT || text.trim().is_empty() {
                Value::Null
            } else {
                serde_json::from_str(&text)?
            };
            let link = headers
                .get(header::LINK)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            return Ok(ApiResponse {
                status: status.as_u16(),
                link,
                body,
            });
        }

        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|b| b.message)
            .unwrap_or(text);
        let reset = headers
            .get("x-ratelimit-reset")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<i64>().ok());

        Err(FetchError::from_status(
            status.as_u16(),
            message,
            header_u64(&headers, "x-ratelimit-remaining"),
            reset,
            header_u64(&headers, header::RETRY_AFTER.as_str()),
        ))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(base: &str) -> HttpTransport {
        HttpTransport::new(base, "t0ken", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_resolve_relative_keeps_base_path() {
        let t = transport("https://ghe.example.com/api/v3/");
        let url = t.resolve("/orgs/acme").unwrap();
        assert_eq!(url.as_str(), "https://ghe.example.com/api/v3/orgs/acme");
    }

    #[test]
    fn test_resolve_absolute_same_host() {
        let t = transport(DEFAULT_API_BASE);
        let url = t
            .resolve("https://api.github.com/orgs/acme/copilot/billing/seats?page=2")
            .unwrap();
        assert_eq!(url.query(), Some("page=2"));
    }

    #[test]
    fn test_resolve_rejects_foreign_host() {
        let t = transport(DEFAULT_API_BASE);
        assert!(t.resolve("https://evil.com/steal").is_err());
    }

    #[test]
    fn test_resolve_rejects_scheme_downgrade() {
        let t = transport(DEFAULT_API_BASE);
        let err = t
            .resolve("http://api.github.com/orgs/acme/copilot/billing/seats?page=2")
            .unwrap_err();
        assert!(matches!(err, FetchError::InvalidResponse(_)));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(HttpTransport::new("not a url", "t", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let t = transport(DEFAULT_API_BASE);
        assert!(!format!("{t:?}").contains("t0ken"));
    }
}
