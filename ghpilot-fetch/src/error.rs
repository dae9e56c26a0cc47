//! Fetch error types.

use chrono::{DateTime, Utc};
use thiserror::Error;

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for GitHub API operations.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Credentials were rejected (HTTP 401).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The credentials lack a permission (HTTP 403).
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Organization, repository, user or feature not found (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// API quota exhausted.
    #[error("Rate limited, retry after {retry_after:?} seconds")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after: Option<u64>,
        /// When the quota resets.
        reset_at: Option<DateTime<Utc>>,
    },

    /// The request was rejected as invalid (HTTP 422), or a requested change
    /// was not applied.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Any other non-success status.
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// GitHub's error message or the raw body.
        message: String,
    },

    /// Connection-level failure.
    #[error("Network error: {0}")]
    Network(String),

    /// Request or report deadline exceeded.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// App authentication could not be performed (bad key, bad app id).
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Response body did not have the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Pagination did not finish within the page cap.
    #[error("Pagination exceeded {0} pages")]
    PageLimitExceeded(u32),
}

impl FetchError {
    /// Maps a non-success HTTP status to an error.
    ///
    /// `message` should be GitHub's `message` field when present.
    /// `rate_limit_remaining` and `rate_limit_reset` come from the
    /// `x-ratelimit-*` headers; `retry_after` from `Retry-After`.
    pub fn from_status(
        status: u16,
        message: impl Into<String>,
        rate_limit_remaining: Option<u64>,
        rate_limit_reset: Option<i64>,
        retry_after: Option<u64>,
    ) -> Self {
        let message = message.into();
        let reset_at = rate_limit_reset.and_then(|ts| DateTime::from_timestamp(ts, 0));

        match status {
            401 => Self::Unauthorized(message),
            403 if rate_limit_remaining == Some(0) || retry_after.is_some() => {
                Self::RateLimited {
                    retry_after,
                    reset_at,
                }
            }
            429 => Self::RateLimited {
                retry_after,
                reset_at,
            },
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            422 => Self::Validation(message),
            _ => Self::UnexpectedStatus { status, message },
        }
    }

    /// Returns a suggested fix the user can act on, if one is known.
    pub fn remedy(&self) -> Option<&'static str> {
        match self {
            Self::Unauthorized(_) | Self::Authentication(_) => Some(
                "check GITHUB_APP_ID, GITHUB_PRIVATE_KEY_PATH and GITHUB_INSTALLATION_ID \
                 (or GITHUB_TOKEN) and that the app is installed on the organization",
            ),
            Self::Forbidden(_) => Some(
                "grant the GitHub App the required permission \
                 (e.g. Administration: read, GitHub Copilot Business: read, Issues: write)",
            ),
            Self::NotFound(_) => Some(
                "check the organization/repository name and that Copilot is enabled \
                 for the organization",
            ),
            Self::RateLimited { .. } => Some("wait for the rate limit window to reset"),
            Self::Validation(_) => Some(
                "check that the users exist and have access to the repository",
            ),
            Self::Timeout(_) => Some(
                "raise GITHUB_TIMEOUT_SECS or REPORT_DEADLINE_SECS for large organizations",
            ),
            Self::PageLimitExceeded(_) => Some("narrow the query or raise the page cap"),
            Self::Network(_) => Some("check network connectivity and GITHUB_API_URL"),
            Self::UnexpectedStatus { .. }
            | Self::InvalidResponse(_)
            | Self::Json(_) => None,
        }
    }

    /// Returns true if this is a transient error that might succeed later.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::Network(_) | Self::Timeout(_)
        )
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(0)
        } else if err.is_decode() {
            FetchError::InvalidResponse(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            FetchError::from_status(401, "Bad credentials", None, None, None),
            FetchError::Unauthorized(_)
        ));
        assert!(matches!(
            FetchError::from_status(
                403,
                "Resource not accessible by integration",
                Some(4000),
                None,
                None
            ),
            FetchError::Forbidden(_)
        ));
        assert!(matches!(
            FetchError::from_status(404, "Not Found", None, None, None),
            FetchError::NotFound(_)
        ));
        assert!(matches!(
            FetchError::from_status(422, "Validation Failed", None, None, None),
            FetchError::Validation(_)
        ));
        assert!(matches!(
            FetchError::from_status(502, "Bad Gateway", None, None, None),
            FetchError::UnexpectedStatus { status: 502, .. }
        ));
    }

    #[test]
    fn test_exhausted_quota_on_403_is_rate_limit() {
        let err = FetchError::from_status(
            403,
            "API rate limit exceeded",
            Some(0),
            Some(1_717_243_200),
            None,
        );
        match err {
            FetchError::RateLimited { reset_at, .. } => {
                assert_eq!(reset_at.unwrap().timestamp(), 1_717_243_200);
            }
            other => panic!("expected rate limit, got {other:?}"),
        }
        assert!(FetchError::from_status(429, "", None, None, Some(30)).is_transient());
    }

    #[test]
    fn test_remedies() {
        let forbidden = FetchError::Forbidden("Resource not accessible".to_string());
        assert!(forbidden.remedy().unwrap().contains("permission"));
        assert!(FetchError::InvalidResponse("x".to_string()).remedy().is_none());
        assert!(!forbidden.is_transient());
    }
}
