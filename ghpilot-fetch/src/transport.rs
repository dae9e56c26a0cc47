//! Transport seam between API callers and HTTP.
//!
//! Every GitHub call goes through [`Transport::send`]. The production
//! implementation is [`crate::HttpTransport`]; tests plug in fakes.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::error::FetchError;

// ============================================================================
// Method
// ============================================================================

/// HTTP methods used against the GitHub API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PATCH
    Patch,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl Method {
    /// Returns the method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Request
// ============================================================================

/// A request against the GitHub API.
///
/// `path` is either relative to the API base (`/orgs/acme`) or an absolute
/// URL, as found in `Link` headers.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Relative path or absolute URL.
    pub path: String,
    /// Query parameters.
    pub query: Vec<(String, String)>,
    /// JSON body.
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Creates a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Creates a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Json` if the body cannot be serialized.
    pub fn post<T: Serialize + ?Sized>(
        path: impl Into<String>,
        body: &T,
    ) -> Result<Self, FetchError> {
        Ok(Self {
            method: Method::Post,
            path: path.into(),
            query: Vec::new(),
            body: Some(serde_json::to_value(body)?),
        })
    }

    /// Adds a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Returns the value of a query parameter, if set.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

// ============================================================================
// Response
// ============================================================================

/// A successful API response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code (2xx).
    pub status: u16,
    /// Raw `Link` header, if the response was paginated.
    pub link: Option<String>,
    /// Parsed body; `Value::Null` for empty bodies.
    pub body: Value,
}

impl ApiResponse {
    /// Creates a response with a JSON body and no `Link` header.
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            link: None,
            body,
        }
    }

    /// Creates a `204 No Content` response.
    pub fn no_content() -> Self {
        Self::json(204, Value::Null)
    }

    /// Sets the `Link` header.
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Deserializes the body.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidResponse` if the body has the wrong shape.
    pub fn parse<T: DeserializeOwned>(self) -> Result<T, FetchError> {
        serde_json::from_value(self.body)
            .map_err(|e| FetchError::InvalidResponse(format!("unexpected body: {e}")))
    }
}

// ============================================================================
// Transport Trait
// ============================================================================

/// Sends authenticated requests to the GitHub API.
///
/// Implementations return `Ok` only for 2xx responses and map every other
/// status with [`FetchError::from_status`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one request.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, FetchError>;
}
