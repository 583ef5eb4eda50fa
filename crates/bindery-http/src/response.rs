//! Outbound responses.
//!
//! [`Response`] is a plain status + headers + body triple. Redirects carry
//! a `Location` header with status 302, which is what a browser-facing
//! editing flow wants after a successful submit.

use http::header::{ALLOW, LOCATION};
use http::{HeaderMap, HeaderValue, Method, StatusCode};

/// An outbound HTTP response.
///
/// # Examples
///
/// ```
/// use bindery_http::Response;
///
/// let response = Response::redirect("/books/7/");
/// assert_eq!(response.status(), http::StatusCode::FOUND);
/// assert_eq!(response.location(), Some("/books/7/"));
/// ```
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

impl Response {
    /// Creates a response with the given status and body.
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// 200 OK.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, body)
    }

    /// 302 Found with a `Location` header.
    pub fn redirect(url: &str) -> Self {
        let mut response = Self::new(StatusCode::FOUND, "");
        if let Ok(value) = HeaderValue::from_str(url) {
            response.headers.insert(LOCATION, value);
        }
        response
    }

    /// 400 Bad Request.
    pub fn bad_request(body: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, body)
    }

    /// 403 Forbidden.
    pub fn forbidden(body: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, body)
    }

    /// 404 Not Found.
    pub fn not_found(body: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, body)
    }

    /// 405 Method Not Allowed, listing the permitted methods in an
    /// `Allow` header.
    pub fn method_not_allowed(permitted: &[Method]) -> Self {
        let allowed = permitted
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let mut response = Self::new(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
        if let Ok(value) = HeaderValue::from_str(&allowed) {
            response.headers.insert(ALLOW, value);
        }
        response
    }

    /// 500 Internal Server Error.
    pub fn server_error(body: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, body)
    }

    /// Sets a header, replacing any existing value.
    #[must_use]
    pub fn with_header(mut self, name: http::header::HeaderName, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.insert(name, value);
        }
        self
    }

    /// The response status.
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// The response headers.
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The response body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns `true` for 3xx responses.
    pub fn is_redirect(&self) -> bool {
        self.status.is_redirection()
    }

    /// The `Location` header, if present and valid UTF-8.
    pub fn location(&self) -> Option<&str> {
        self.headers.get(LOCATION).and_then(|v| v.to_str().ok())
    }
}
