//! Pagination over GitHub list endpoints.
//!
//! Pages are requested until the last one. When a response carries a `Link`
//! header its `rel="next"` URL is followed and pagination stops when there is
//! none. Without a `Link` header the size heuristic applies: a page with
//! fewer than `per_page` items is the last one, so a full final page costs
//! one extra (empty) request.
//!
//! Any page failure aborts the whole pagination and partial results are
//! dropped. The number of requests is capped by [`PageOptions::max_pages`].

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use tracing::{debug, trace};

use crate::error::FetchError;
use crate::transport::{ApiRequest, ApiResponse};

/// GitHub's maximum page size.
pub const DEFAULT_PER_PAGE: u32 = 100;

/// Default cap on requests per pagination.
pub const DEFAULT_MAX_PAGES: u32 = 100;

// ============================================================================
// Options & Requests
// ============================================================================

/// Page size and request cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageOptions {
    /// Items requested per page.
    pub per_page: u32,
    /// Maximum number of requests.
    pub max_pages: u32,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

/// Which page to fetch next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub number: u32,
    /// Requested page size.
    pub per_page: u32,
    /// `rel="next"` URL from the previous response, if any.
    pub next_url: Option<String>,
}

impl PageRequest {
    /// The first page.
    pub fn first(per_page: u32) -> Self {
        Self {
            number: 1,
            per_page,
            next_url: None,
        }
    }

    /// Applies this page to a list request.
    ///
    /// A `next` URL already carries every query parameter and replaces the
    /// request path; otherwise `per_page` and `page` are appended.
    pub fn apply(&self, request: ApiRequest) -> ApiRequest {
        match &self.next_url {
            Some(url) => ApiRequest {
                path: url.clone(),
                query: Vec::new(),
                ..request
            },
            None => request
                .query("per_page", self.per_page)
                .query("page", self.number),
        }
    }

    fn advance(&self) -> Self {
        Self {
            number: self.number + 1,
            per_page: self.per_page,
            next_url: None,
        }
    }

    fn follow(&self, url: String) -> Self {
        Self {
            number: self.number + 1,
            per_page: self.per_page,
            next_url: Some(url),
        }
    }
}

// ============================================================================
// Pages
// ============================================================================

/// How the end of a listing is detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// The response had a `Link` header; `None` means this is the last page.
    Cursor(Option<String>),
    /// No `Link` header; fall back to the page size heuristic.
    Unknown,
}

impl NextPage {
    /// Reads the `rel="next"` URL from a `Link` header.
    pub fn from_link_header(link: Option<&str>) -> Self {
        let Some(link) = link else {
            return Self::Unknown;
        };

        let next = link.split(',').find_map(|part| {
            let mut pieces = part.split(';');
            let url = pieces.next()?.trim();
            let is_next = pieces.any(|p| {
                let p = p.trim();
                p == r#"rel="next""# || p == "rel=next"
            });
            if !is_next {
                return None;
            }
            url.strip_prefix('<')
                .and_then(|u| u.strip_suffix('>'))
                .map(str::to_string)
        });

        Self::Cursor(next)
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Continuation.
    pub next: NextPage,
}

impl<T: DeserializeOwned> Page<T> {
    /// Builds a page from a list response.
    ///
    /// `field` names the array inside an object body (e.g. `"seats"`);
    /// `None` means the body itself is the array.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidResponse` if the body has the wrong shape.
    pub fn from_response(response: ApiResponse, field: Option<&str>) -> Result<Self, FetchError> {
        let next = NextPage::from_link_header(response.link.as_deref());

        let array = match (field, response.body) {
            (None, body @ Value::Array(_)) => body,
            (Some(name), Value::Object(mut map)) => {
                map.remove(name).unwrap_or(Value::Array(Vec::new()))
            }
            (_, Value::Null) => Value::Array(Vec::new()),
            (field, _) => {
                return Err(FetchError::InvalidResponse(match field {
                    Some(name) => format!("expected an object with a '{name}' array"),
                    None => "expected an array".to_string(),
                }));
            }
        };

        let items = serde_json::from_value(array)
            .map_err(|e| FetchError::InvalidResponse(format!("unexpected list item: {e}")))?;

        Ok(Self { items, next })
    }
}

// ============================================================================
// Paginate
// ============================================================================

/// Fetches every page and concatenates the items.
///
/// # Errors
///
/// Returns the first page error, or `FetchError::PageLimitExceeded` if the
/// listing does not end within `options.max_pages` requests.
pub async fn paginate<T, F, Fut>(options: PageOptions, mut fetch: F) -> Result<Vec<T>, FetchError>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<Page<T>, FetchError>>,
{
    let per_page = usize::try_from(options.per_page).unwrap_or(usize::MAX);
    let mut items = Vec::new();
    let mut request = PageRequest::first(options.per_page);
    let mut pages = 0u32;

    loop {
        if pages >= options.max_pages {
            return Err(FetchError::PageLimitExceeded(options.max_pages));
        }

        let page = fetch(request.clone()).await?;
        pages += 1;
        let count = page.items.len();
        trace!(page = request.number, count, "Fetched page");
        items.extend(page.items);

        request = match page.next {
            NextPage::Cursor(Some(url)) => request.follow(url),
            NextPage::Cursor(None) => break,
            NextPage::Unknown if count < per_page => break,
            NextPage::Unknown => request.advance(),
        };
    }

    debug!(pages, items = items.len(), "Pagination complete");
    Ok(items)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Serves pages of the given sizes, then empty pages.
    async fn run_sizes(
        sizes: &[usize],
        options: PageOptions,
    ) -> (Result<Vec<usize>, FetchError>, u32) {
        let mut calls = 0u32;
        let result = paginate(options, |req: PageRequest| {
            calls += 1;
            let idx = (req.number - 1) as usize;
            let size = sizes.get(idx).copied().unwrap_or(0);
            async move {
                Ok(Page {
                    items: (0..size).collect(),
                    next: NextPage::Unknown,
                })
            }
        })
        .await;
        (result, calls)
    }

    #[tokio::test]
    async fn test_short_last_page_stops() {
        let (result, calls) = run_sizes(&[100, 100, 37], PageOptions::default()).await;
        assert_eq!(result.unwrap().len(), 237);
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn test_full_last_page_costs_one_empty_request() {
        let (result, calls) = run_sizes(&[100, 100, 100], PageOptions::default()).await;
        assert_eq!(result.unwrap().len(), 300);
        assert_eq!(calls, 4);
    }

    #[tokio::test]
    async fn test_empty_first_page() {
        let (result, calls) = run_sizes(&[], PageOptions::default()).await;
        assert!(result.unwrap().is_empty());
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_page_cap_is_an_error_not_truncation() {
        let options = PageOptions {
            per_page: 2,
            max_pages: 3,
        };
        let (result, calls) = run_sizes(&[2, 2, 2, 2, 1], options).await;
        assert!(matches!(result, Err(FetchError::PageLimitExceeded(3))));
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn test_error_discards_partial_results() {
        let result: Result<Vec<u32>, _> = paginate(PageOptions::default(), |req| async move {
            if req.number == 2 {
                Err(FetchError::Forbidden("nope".to_string()))
            } else {
                Ok(Page {
                    items: vec![1; 100],
                    next: NextPage::Unknown,
                })
            }
        })
        .await;
        assert!(matches!(result, Err(FetchError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_cursor_mode_follows_next_links() {
        let mut seen = Vec::new();
        let result = paginate(PageOptions::default(), |req: PageRequest| {
            seen.push(req.next_url.clone());
            async move {
                // Short pages must not stop a cursor listing.
                let next = match req.number {
                    1 => NextPage::Cursor(Some("https://api.github.com/x?page=2".to_string())),
                    2 => NextPage::Cursor(Some("https://api.github.com/x?page=3".to_string())),
                    _ => NextPage::Cursor(None),
                };
                Ok(Page {
                    items: vec![req.number; 3],
                    next,
                })
            }
        })
        .await
        .unwrap();

        assert_eq!(result, vec![1, 1, 1, 2, 2, 2, 3, 3, 3]);
        assert_eq!(
            seen,
            vec![
                None,
                Some("https://api.github.com/x?page=2".to_string()),
                Some("https://api.github.com/x?page=3".to_string()),
            ]
        );
    }

    #[test]
    fn test_link_header_parsing() {
        let link = concat!(
            r#"<https://api.github.com/repositories/1/issues?page=2&per_page=100>; rel="next", "#,
            r#"<https://api.github.com/repositories/1/issues?page=5&per_page=100>; rel="last""#,
        );
        assert_eq!(
            NextPage::from_link_header(Some(link)),
            NextPage::Cursor(Some(
                "https://api.github.com/repositories/1/issues?page=2&per_page=100".to_string()
            ))
        );

        let last = concat!(
            r#"<https://api.github.com/x?page=1>; rel="prev", "#,
            r#"<https://api.github.com/x?page=1>; rel="first""#,
        );
        assert_eq!(NextPage::from_link_header(Some(last)), NextPage::Cursor(None));
        assert_eq!(NextPage::from_link_header(None), NextPage::Unknown);
    }

    #[test]
    fn test_apply_page_to_request() {
        let base = ApiRequest::get("/repos/o/r/issues").query("state", "open");

        let first = PageRequest::first(50).apply(base.clone());
        assert_eq!(first.query_value("page"), Some("1"));
        assert_eq!(first.query_value("per_page"), Some("50"));
        assert_eq!(first.query_value("state"), Some("open"));

        let followed = PageRequest::first(50)
            .follow("https://api.github.com/repos/o/r/issues?page=2".to_string())
            .apply(base);
        assert_eq!(followed.path, "https://api.github.com/repos/o/r/issues?page=2");
        assert!(followed.query.is_empty());
    }

    #[test]
    fn test_page_from_object_body() {
        let response = ApiResponse::json(
            200,
            serde_json::json!({"total_seats": 2, "seats": [{"n": 1}, {"n": 2}]}),
        );
        let page: Page<Value> = Page::from_response(response, Some("seats")).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.next, NextPage::Unknown);

        let bad = ApiResponse::json(200, serde_json::json!({"seats": 3}));
        assert!(Page::<Value>::from_response(bad, None).is_err());
    }
}
