//! Inbound requests as the controllers see them.
//!
//! The host application owns URL routing and body transport; by the time a
//! [`Request`] reaches a controller it carries just the pieces the editing
//! flow needs: the method, the path, the parsed form body, and the path
//! identifier the route extracted (e.g. the `7` in `/books/7/edit/`).

use http::Method;

use crate::formdata::FormData;

/// One inbound request, reduced to what a controller consumes.
///
/// # Examples
///
/// ```
/// use bindery_http::Request;
///
/// let request = Request::post("/books/create/", "title=Dune");
/// assert_eq!(request.method(), &http::Method::POST);
/// assert_eq!(request.form_data().get("title"), Some("Dune"));
/// ```
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    form_data: FormData,
    identifier: Option<String>,
}

impl Request {
    /// Creates a request with an empty body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            form_data: FormData::new(),
            identifier: None,
        }
    }

    /// Creates a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Creates a POST request with a form-urlencoded body.
    pub fn post(path: impl Into<String>, body: &str) -> Self {
        let mut request = Self::new(Method::POST, path);
        request.form_data = FormData::parse(body);
        request
    }

    /// Attaches the path identifier the route extracted.
    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Replaces the parsed form body.
    #[must_use]
    pub fn with_form_data(mut self, form_data: FormData) -> Self {
        self.form_data = form_data;
        self
    }

    /// The request method.
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// The request path, as routed.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The parsed form body (empty for bodyless requests).
    pub const fn form_data(&self) -> &FormData {
        &self.form_data
    }

    /// The path identifier, if the route carried one.
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_request() {
        let request = Request::get("/books/create/");
        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.path(), "/books/create/");
        assert!(request.form_data().is_empty());
        assert_eq!(request.identifier(), None);
    }

    #[test]
    fn test_post_request_parses_body() {
        let request = Request::post("/books/create/", "title=Dune&pages=412");
        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.form_data().get("pages"), Some("412"));
    }

    #[test]
    fn test_identifier() {
        let request = Request::get("/books/7/edit/").with_identifier("7");
        assert_eq!(request.identifier(), Some("7"));
    }
}
