//! Error types shared across the bindery crates.
//!
//! This module provides the [`BinderyError`] enum covering request-fatal
//! failures (not found, persistence, configuration, rendering) together with
//! an HTTP status mapping. Per-field and per-form validation failures are
//! deliberately *not* represented here: they accumulate inside a form and are
//! inspected through its error accessors, never propagated as `Err`.

use thiserror::Error;

/// The primary error type for the bindery crates.
///
/// Each variant maps to an HTTP status code via [`BinderyError::status_code`],
/// which controllers use when turning a failed request into a response.
#[derive(Error, Debug)]
pub enum BinderyError {
    // ── Request errors ───────────────────────────────────────────────

    /// HTTP 400 Bad Request.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// HTTP 403 Forbidden; an access gate rejected the request.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// HTTP 404 Not Found; a record lookup came back empty.
    #[error("Not found: {0}")]
    NotFound(String),

    /// HTTP 405 Method Not Allowed.
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    // ── Programming-time errors ──────────────────────────────────────

    /// A controller or form was wired up incorrectly: an allow-list names an
    /// unknown entity field, or an entity kind has no form counterpart.
    /// Never reachable from user input.
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ── Infrastructure errors ────────────────────────────────────────

    /// The entity store failed while persisting an already-validated
    /// submission.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// The renderer failed to produce a response body.
    #[error("Render error: {0}")]
    Render(String),

    /// An I/O error occurred (settings files, template directories).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BinderyError {
    /// Returns the HTTP status code associated with this error.
    ///
    /// - `BadRequest` -> 400
    /// - `Forbidden` -> 403
    /// - `NotFound` -> 404
    /// - `MethodNotAllowed` -> 405
    /// - Everything else -> 500
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::MethodNotAllowed(_) => 405,
            Self::Configuration(_) | Self::Persistence(_) | Self::Render(_) | Self::Io(_) => 500,
        }
    }
}

/// A convenience type alias for `Result<T, BinderyError>`.
pub type BinderyResult<T> = Result<T, BinderyError>;
