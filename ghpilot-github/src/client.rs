//! Authenticated GitHub client.
//!
//! Built once per run with [`GitHubClient::connect`] and passed by reference
//! to every operation. The endpoint methods live next to their scenario in
//! [`crate::copilot`], [`crate::issues`] and [`crate::policy`].

use std::future::Future;
use std::sync::Arc;

use ghpilot_fetch::{
    paginate, AccessToken, ApiRequest, ApiResponse, Credentials, FetchContext, FetchError,
    FetchSettings, Page, Transport,
};
use serde::de::DeserializeOwned;
use tracing::warn;

/// Immutable, authenticated GitHub API client.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    ctx: FetchContext,
}

impl GitHubClient {
    /// Authenticates once and returns a ready client.
    ///
    /// # Errors
    ///
    /// Returns the authentication error.
    pub async fn connect(
        settings: FetchSettings,
        credentials: &Credentials,
    ) -> Result<Self, FetchError> {
        Ok(Self::from_context(FetchContext::connect(settings, credentials).await?))
    }

    /// Wraps an existing context.
    pub fn from_context(ctx: FetchContext) -> Self {
        Self { ctx }
    }

    /// Creates a client over `transport` with default settings.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self::from_context(FetchContext::builder(transport).build())
    }

    /// Returns the fetch context.
    pub fn context(&self) -> &FetchContext {
        &self.ctx
    }

    /// Returns the fetch settings.
    pub fn settings(&self) -> &FetchSettings {
        &self.ctx.settings
    }

    /// Token obtained at connect time, if any.
    pub fn access_token(&self) -> Option<&AccessToken> {
        self.ctx.access_token()
    }

    // ========================================================================
    // Request helpers
    // ========================================================================

    pub(crate) async fn send(&self, request: ApiRequest) -> Result<ApiResponse, FetchError> {
        self.ctx.transport.send(request).await
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<T, FetchError> {
        self.send(request).await?.parse()
    }

    /// Fetches every page of a list endpoint.
    ///
    /// `field` names the array inside an object body; `None` when the body
    /// is the array itself.
    pub(crate) async fn list<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        field: Option<&str>,
    ) -> Result<Vec<T>, FetchError> {
        let transport = &self.ctx.transport;
        paginate(self.ctx.settings.pages, move |page| {
            let request = page.apply(request.clone());
            async move { Page::from_response(transport.send(request).await?, field) }
        })
        .await
    }

    /// Runs `fut` under the report deadline.
    pub(crate) async fn with_deadline<T, F>(&self, fut: F) -> Result<T, FetchError>
    where
        F: Future<Output = Result<T, FetchError>>,
    {
        let deadline = self.ctx.settings.report_deadline;
        if let Ok(result) = tokio::time::timeout(deadline, fut).await {
            result
        } else {
            warn!(deadline_secs = deadline.as_secs(), "Report deadline exceeded");
            Err(FetchError::Timeout(deadline.as_secs()))
        }
    }
}
