//! Request gating.
//!
//! A [`Gated`] controller consults its [`AccessGate`] before doing anything
//! else. A refused request is answered 403 straight away: no form is
//! built, no store or renderer is touched.

use async_trait::async_trait;

use bindery_core::{BinderyError, BinderyResult};
use bindery_http::{Request, Response};

use crate::controller::Controller;

/// Decides whether a request may reach the controller behind the gate.
#[async_trait]
pub trait AccessGate: Send + Sync {
    /// Returns `true` when the request may proceed.
    async fn permit(&self, request: &Request) -> bool;
}

/// Any plain predicate over a request is a gate.
#[async_trait]
impl<F> AccessGate for F
where
    F: Fn(&Request) -> bool + Send + Sync,
{
    async fn permit(&self, request: &Request) -> bool {
        self(request)
    }
}

/// A controller wrapped behind an access gate.
///
/// The gate runs before method routing, so even a request that would be
/// refused with 405 is answered 403 first.
pub struct Gated<C, G> {
    inner: C,
    gate: G,
}

impl<C: Controller, G: AccessGate> Gated<C, G> {
    pub fn new(inner: C, gate: G) -> Self {
        Self { inner, gate }
    }
}

#[async_trait]
impl<C: Controller, G: AccessGate> Controller for Gated<C, G> {
    async fn display(&self, request: &Request) -> BinderyResult<Response> {
        if !self.gate.permit(request).await {
            return Err(refused(request));
        }
        self.inner.display(request).await
    }

    async fn submit(&self, request: &Request) -> BinderyResult<Response> {
        if !self.gate.permit(request).await {
            return Err(refused(request));
        }
        self.inner.submit(request).await
    }

    async fn dispatch(&self, request: &Request) -> Response {
        if !self.gate.permit(request).await {
            let err = refused(request);
            return crate::controller::error_response(&err, request.path());
        }
        self.inner.dispatch(request).await
    }
}

fn refused(request: &Request) -> BinderyError {
    tracing::warn!(path = request.path(), "request refused by access gate");
    BinderyError::Forbidden("access denied".into())
}
