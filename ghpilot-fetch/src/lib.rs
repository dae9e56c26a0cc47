// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # ghpilot Fetch
//!
//! Transport, authentication and pagination for the GitHub REST API.
//!
//! ## Layers
//!
//! - [`transport::Transport`] - the seam every request goes through
//! - [`host::http::HttpTransport`] - `reqwest` implementation with GitHub headers
//! - [`auth`] - GitHub App JWT and installation token exchange
//! - [`paginate`] - `Link` cursor pagination with a page size fallback
//! - [`context::FetchContext`] - authenticated transport plus settings
//!
//! ## Example
//!
//! ```ignore
//! use ghpilot_fetch::{Credentials, FetchContext, FetchSettings};
//!
//! let ctx = FetchContext::connect(FetchSettings::default(), &credentials).await?;
//! let response = ctx.transport.send(ApiRequest::get("/orgs/acme")).await?;
//! ```

pub mod auth;
pub mod context;
pub mod error;
pub mod host;
pub mod paginate;
pub mod transport;

// Errors
pub use error::FetchError;

// Auth
pub use auth::{
    authenticate, exchange_installation_token, generate_jwt, AccessToken, AppCredentials,
    Credentials, GitHubAppClaims,
};

// Transport
pub use host::http::{HttpTransport, DEFAULT_API_BASE, DEFAULT_TIMEOUT_SECS, GITHUB_API_VERSION};
pub use transport::{ApiRequest, ApiResponse, Method, Transport};

// Pagination & context
pub use context::{
    FetchContext, FetchContextBuilder, FetchSettings, DEFAULT_REPORT_DEADLINE_SECS,
};
pub use paginate::{
    paginate, NextPage, Page, PageOptions, PageRequest, DEFAULT_MAX_PAGES, DEFAULT_PER_PAGE,
};
