//! In-memory transport for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use ghpilot_fetch::{ApiRequest, ApiResponse, FetchError, Method, Transport};
use serde_json::Value;

type Responder = Box<dyn Fn(&ApiRequest) -> Result<ApiResponse, FetchError> + Send + Sync>;

struct Route {
    method: Method,
    path: String,
    respond: Responder,
}

/// Routes requests by method and exact path; records every call.
pub(crate) struct FakeTransport {
    routes: Vec<Route>,
    calls: Mutex<Vec<ApiRequest>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self {
            routes: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn on(
        mut self,
        method: Method,
        path: &str,
        respond: impl Fn(&ApiRequest) -> Result<ApiResponse, FetchError> + Send + Sync + 'static,
    ) -> Self {
        self.routes.push(Route {
            method,
            path: path.to_string(),
            respond: Box::new(respond),
        });
        self
    }

    /// Answers GET `path` with `200` and `body`.
    pub(crate) fn get(self, path: &str, body: Value) -> Self {
        self.on(Method::Get, path, move |_| Ok(ApiResponse::json(200, body.clone())))
    }

    /// Answers GET `path` with the error built by `err`.
    pub(crate) fn fail(self, path: &str, err: fn() -> FetchError) -> Self {
        self.on(Method::Get, path, move |_| Err(err()))
    }

    pub(crate) fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, path: &str) -> usize {
        self.calls().iter().filter(|c| c.path == path).count()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, FetchError> {
        self.calls.lock().unwrap().push(request.clone());
        self.routes
            .iter()
            .find(|r| r.method == request.method && r.path == request.path)
            .map_or_else(
                || {
                    Err(FetchError::NotFound(format!(
                        "no route for {} {}",
                        request.method, request.path
                    )))
                },
                |r| (r.respond)(&request),
            )
    }
}
