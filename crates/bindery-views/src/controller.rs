//! The request-handling seam.
//!
//! A [`Controller`] is the unit a router mounts. Its `dispatch` method
//! routes by HTTP method: safe methods go to [`Controller::display`],
//! `POST` goes to [`Controller::submit`], anything else is refused with a
//! 405 carrying an `Allow` header. Handlers return [`BinderyResult`] and
//! never build error responses inline; failures are converted in one place,
//! [`error_response`], which also decides what the client may see.

use async_trait::async_trait;

use bindery_core::{BinderyError, BinderyResult};
use bindery_http::{Request, Response};

/// A two-handler request processor: one path for showing state, one for
/// changing it.
///
/// `HEAD` is routed like `GET`; a fronting server is expected to strip the
/// body.
#[async_trait]
pub trait Controller: Send + Sync {
    /// Handles safe methods. Must not mutate anything.
    async fn display(&self, request: &Request) -> BinderyResult<Response>;

    /// Handles `POST`.
    async fn submit(&self, request: &Request) -> BinderyResult<Response>;

    /// Routes a request by method and converts handler errors into
    /// responses.
    async fn dispatch(&self, request: &Request) -> Response {
        let outcome = match *request.method() {
            http::Method::GET | http::Method::HEAD => self.display(request).await,
            http::Method::POST => self.submit(request).await,
            _ => {
                tracing::warn!(
                    method = %request.method(),
                    path = request.path(),
                    "method not allowed"
                );
                return Response::method_not_allowed(&[
                    http::Method::GET,
                    http::Method::HEAD,
                    http::Method::POST,
                ]);
            }
        };
        match outcome {
            Ok(response) => response,
            Err(err) => error_response(&err, request.path()),
        }
    }
}

/// Converts a failed request into the response the client sees.
///
/// Client errors keep their message in the body. Server-side failures are
/// logged with the real cause and answered with a generic body so internal
/// details never leave the process.
pub fn error_response(err: &BinderyError, path: &str) -> Response {
    if err.status_code() >= 500 {
        tracing::error!(path, error = %err, "request failed");
        return Response::server_error("Server Error");
    }
    tracing::warn!(path, status = err.status_code(), error = %err, "request rejected");
    match err {
        BinderyError::BadRequest(msg) => Response::bad_request(msg.as_str()),
        BinderyError::Forbidden(msg) => Response::forbidden(msg.as_str()),
        BinderyError::NotFound(msg) => Response::not_found(msg.as_str()),
        BinderyError::MethodNotAllowed(_) => Response::method_not_allowed(&[
            http::Method::GET,
            http::Method::HEAD,
            http::Method::POST,
        ]),
        _ => Response::server_error("Server Error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubController;

    #[async_trait]
    impl Controller for StubController {
        async fn display(&self, _request: &Request) -> BinderyResult<Response> {
            Ok(Response::ok("shown"))
        }

        async fn submit(&self, _request: &Request) -> BinderyResult<Response> {
            Err(BinderyError::NotFound("record 9".into()))
        }
    }

    #[tokio::test]
    async fn test_get_routes_to_display() {
        let response = StubController.dispatch(&Request::get("/books/add/")).await;
        assert_eq!(response.status(), http::StatusCode::OK);
        assert_eq!(response.body(), "shown");
    }

    #[tokio::test]
    async fn test_head_routes_to_display() {
        let request = Request::new(http::Method::HEAD, "/books/add/");
        let response = StubController.dispatch(&request).await;
        assert_eq!(response.status(), http::StatusCode::OK);
    }

    #[tokio::test]
    async fn test_post_routes_to_submit() {
        let request = Request::post("/books/9/edit/", "");
        let response = StubController.dispatch(&request).await;
        assert_eq!(response.status(), http::StatusCode::NOT_FOUND);
        assert_eq!(response.body(), "record 9");
    }

    #[tokio::test]
    async fn test_unsupported_method_is_refused_with_allow_header() {
        let request = Request::new(http::Method::PUT, "/books/add/");
        let response = StubController.dispatch(&request).await;
        assert_eq!(response.status(), http::StatusCode::METHOD_NOT_ALLOWED);
        let allow = response
            .headers()
            .get(http::header::ALLOW)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        assert_eq!(allow, "GET, HEAD, POST");
    }

    #[test]
    fn test_client_error_keeps_its_message() {
        let err = BinderyError::BadRequest("no identifier".into());
        let response = error_response(&err, "/books/edit/");
        assert_eq!(response.status(), http::StatusCode::BAD_REQUEST);
        assert_eq!(response.body(), "no identifier");
    }

    #[test]
    fn test_server_error_body_is_generic() {
        let err = BinderyError::Persistence("connection reset by peer".into());
        let response = error_response(&err, "/books/add/");
        assert_eq!(response.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body(), "Server Error");
        assert!(!response.body().contains("connection reset"));
    }
}
