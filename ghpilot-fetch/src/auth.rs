//! GitHub App authentication.
//!
//! Authenticates as a GitHub App with an RS256 JWT, then exchanges the JWT
//! for a short-lived installation access token. A pre-issued token can be
//! used instead.

use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::error::FetchError;
use crate::host::http::HttpTransport;
use crate::transport::{ApiRequest, Transport};

/// Backdating applied to `iat` to absorb clock skew.
const CLOCK_SKEW_SECS: i64 = 60;

/// JWT lifetime; GitHub rejects anything above 10 minutes.
const JWT_LIFETIME_SECS: i64 = 600;

// ============================================================================
// Credentials
// ============================================================================

/// GitHub App identity.
#[derive(Clone)]
pub struct AppCredentials {
    /// GitHub App ID.
    pub app_id: String,
    /// RSA private key in PEM format.
    pub private_key_pem: Vec<u8>,
    /// Installation to act as.
    pub installation_id: u64,
}

impl AppCredentials {
    /// Loads the private key from a PEM file.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Authentication` if the file cannot be read.
    pub fn from_key_file(
        app_id: impl Into<String>,
        private_key_path: &Path,
        installation_id: u64,
    ) -> Result<Self, FetchError> {
        let private_key_pem = std::fs::read(private_key_path).map_err(|e| {
            FetchError::Authentication(format!(
                "failed to read private key {}: {e}",
                private_key_path.display()
            ))
        })?;

        Ok(Self {
            app_id: app_id.into(),
            private_key_pem,
            installation_id,
        })
    }
}

impl fmt::Debug for AppCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppCredentials")
            .field("app_id", &self.app_id)
            .field("installation_id", &self.installation_id)
            .finish_non_exhaustive()
    }
}

/// How to obtain an access token.
#[derive(Clone)]
pub enum Credentials {
    /// Authenticate as a GitHub App installation.
    App(AppCredentials),
    /// Use a pre-issued token as is.
    Token(String),
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::App(app) => f.debug_tuple("App").field(app).finish(),
            Self::Token(_) => f.write_str("Token(<redacted>)"),
        }
    }
}

// ============================================================================
// Access Token
// ============================================================================

/// A short-lived access credential.
#[derive(Clone, Serialize, Deserialize)]
pub struct AccessToken {
    /// Bearer token.
    pub token: String,
    /// Expiry; `None` for pre-issued tokens.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Returns true if the token has expired at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// JWT
// ============================================================================

/// JWT claims for GitHub App authentication.
#[derive(Debug, Serialize, Deserialize)]
pub struct GitHubAppClaims {
    /// Issued at time (Unix timestamp).
    pub iat: i64,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issuer (GitHub App ID).
    pub iss: String,
}

/// Generates a JWT for GitHub App authentication, valid for 10 minutes.
///
/// # Errors
///
/// Returns `FetchError::Authentication` if the key is not an RSA PEM key.
pub fn generate_jwt(
    app_id: &str,
    private_key_pem: &[u8],
    now: DateTime<Utc>,
) -> Result<String, FetchError> {
    let now = now.timestamp();
    let claims = GitHubAppClaims {
        iat: now - CLOCK_SKEW_SECS,
        exp: now + JWT_LIFETIME_SECS,
        iss: app_id.to_string(),
    };

    let encoding_key = EncodingKey::from_rsa_pem(private_key_pem).map_err(|e| {
        FetchError::Authentication(format!("failed to parse private key as RSA PEM: {e}"))
    })?;

    encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
        .map_err(|e| FetchError::Authentication(format!("failed to encode JWT: {e}")))
}

// ============================================================================
// Token Exchange
// ============================================================================

/// Exchanges an app JWT for an installation access token.
///
/// `transport` must authenticate with the JWT.
///
/// # Errors
///
/// Returns the transport error (typically `Unauthorized` or `NotFound` for a
/// wrong app or installation id).
#[instrument(skip(transport))]
pub async fn exchange_installation_token(
    transport: &dyn Transport,
    installation_id: u64,
) -> Result<AccessToken, FetchError> {
    let request = ApiRequest::post(
        format!("/app/installations/{installation_id}/access_tokens"),
        &serde_json::json!({}),
    )?;

    let token: AccessToken = transport.send(request).await?.parse()?;
    debug!(expires_at = ?token.expires_at, "Installation token issued");
    Ok(token)
}

/// Obtains an access token for `credentials`.
///
/// App credentials are exchanged once; pre-issued tokens are returned as is.
///
/// # Errors
///
/// Returns `FetchError::Authentication` for key problems and the transport
/// error if GitHub rejects the exchange.
pub async fn authenticate(
    credentials: &Credentials,
    api_base: &str,
    timeout: Duration,
) -> Result<AccessToken, FetchError> {
    match credentials {
        Credentials::Token(token) => Ok(AccessToken {
            token: token.clone(),
            expires_at: None,
        }),
        Credentials::App(app) => {
            info!(
                app_id = %app.app_id,
                installation_id = app.installation_id,
                "Authenticating as GitHub App"
            );
            let jwt = generate_jwt(&app.app_id, &app.private_key_pem, Utc::now())?;
            let transport = HttpTransport::new(api_base, &jwt, timeout)?;
            exchange_installation_token(&transport, app.installation_id).await
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
