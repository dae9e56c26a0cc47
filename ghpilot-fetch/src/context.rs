//! Fetch context shared by every API call.
//!
//! A context bundles the authenticated transport with the settings that
//! govern requests. It is built once per run and then only borrowed.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::auth::{authenticate, AccessToken, Credentials};
use crate::error::FetchError;
use crate::host::http::{HttpTransport, DEFAULT_API_BASE, DEFAULT_TIMEOUT_SECS};
use crate::paginate::{PageOptions, DEFAULT_MAX_PAGES, DEFAULT_PER_PAGE};
use crate::transport::Transport;

/// Default overall deadline for one report.
pub const DEFAULT_REPORT_DEADLINE_SECS: u64 = 300;

// ============================================================================
// Fetch Settings
// ============================================================================

/// Settings for fetch operations.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchSettings {
    /// API base URL.
    pub api_base: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Page size and page cap for list endpoints.
    pub pages: PageOptions,
    /// Overall deadline for a multi-request report.
    pub report_deadline: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            pages: PageOptions {
                per_page: DEFAULT_PER_PAGE,
                max_pages: DEFAULT_MAX_PAGES,
            },
            report_deadline: Duration::from_secs(DEFAULT_REPORT_DEADLINE_SECS),
        }
    }
}

impl FetchSettings {
    /// Sets the API base URL.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the report deadline.
    pub fn with_report_deadline(mut self, deadline: Duration) -> Self {
        self.report_deadline = deadline;
        self
    }
}

// ============================================================================
// Fetch Context
// ============================================================================

/// Authenticated transport plus settings.
#[derive(Clone)]
pub struct FetchContext {
    /// Transport every request goes through.
    pub transport: Arc<dyn Transport>,
    /// Fetch settings.
    pub settings: FetchSettings,
    access_token: Option<AccessToken>,
}

impl FetchContext {
    /// Authenticates once and builds an HTTP-backed context.
    ///
    /// # Errors
    ///
    /// Returns the authentication error, or `FetchError::InvalidResponse`
    /// if the API base URL is malformed.
    pub async fn connect(
        settings: FetchSettings,
        credentials: &Credentials,
    ) -> Result<Self, FetchError> {
        let token = authenticate(credentials, &settings.api_base, settings.timeout).await?;
        let transport = HttpTransport::new(&settings.api_base, &token.token, settings.timeout)?;
        info!(api_base = %settings.api_base, "Connected to GitHub");

        Ok(Self {
            transport: Arc::new(transport),
            settings,
            access_token: Some(token),
        })
    }

    /// Creates a builder for customizing the context.
    pub fn builder(transport: Arc<dyn Transport>) -> FetchContextBuilder {
        FetchContextBuilder::new(transport)
    }

    /// The token obtained by [`FetchContext::connect`], if any.
    pub fn access_token(&self) -> Option<&AccessToken> {
        self.access_token.as_ref()
    }

    /// Returns the per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.settings.timeout
    }
}

impl std::fmt::Debug for FetchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchContext")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Fetch Context Builder
// ============================================================================

/// Builder for a context around an existing transport.
pub struct FetchContextBuilder {
    transport: Arc<dyn Transport>,
    settings: FetchSettings,
}

impl FetchContextBuilder {
    /// Creates a new builder.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            settings: FetchSettings::default(),
        }
    }

    /// Sets the fetch settings.
    pub fn settings(mut self, settings: FetchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the page size.
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.settings.pages.per_page = per_page;
        self
    }

    /// Sets the page cap.
    pub fn max_pages(mut self, max_pages: u32) -> Self {
        self.settings.pages.max_pages = max_pages;
        self
    }

    /// Sets the report deadline.
    pub fn report_deadline(mut self, deadline: Duration) -> Self {
        self.settings.report_deadline = deadline;
        self
    }

    /// Builds the fetch context.
    pub fn build(self) -> FetchContext {
        FetchContext {
            transport: self.transport,
            settings: self.settings,
            access_token: None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{ApiRequest, ApiResponse};
    use async_trait::async_trait;

    struct Null;

    #[async_trait]
    impl Transport for Null {
        async fn send(&self, _request: ApiRequest) -> Result<ApiResponse, FetchError> {
            Ok(ApiResponse::no_content())
        }
    }

    #[test]
    fn test_default_settings() {
        let settings = FetchSettings::default();
        assert_eq!(settings.api_base, "https://api.github.com");
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert_eq!(settings.pages.per_page, 100);
        assert_eq!(settings.pages.max_pages, 100);
        assert_eq!(settings.report_deadline, Duration::from_secs(300));
    }

    #[test]
    fn test_context_builder() {
        let ctx = FetchContext::builder(Arc::new(Null))
            .per_page(10)
            .max_pages(5)
            .report_deadline(Duration::from_secs(1))
            .build();

        assert_eq!(ctx.settings.pages.per_page, 10);
        assert_eq!(ctx.settings.pages.max_pages, 5);
        assert_eq!(ctx.settings.report_deadline, Duration::from_secs(1));
        assert!(ctx.access_token().is_none());
    }

    #[tokio::test]
    async fn test_connect_with_token_keeps_token() {
        let ctx = FetchContext::connect(
            FetchSettings::default(),
            &Credentials::Token("ghs_abc".to_string()),
        )
        .await
        .unwrap();
        assert_eq!(ctx.access_token().map(|t| t.token.as_str()), Some("ghs_abc"));
    }
}
