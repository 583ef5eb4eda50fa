//! # bindery
//!
//! Declarative form validation and model-bound editing controllers.
//!
//! This is the meta-crate that re-exports the sub-crates for convenient
//! access. Depend on `bindery` for the whole stack, or on individual crates
//! for finer-grained control.

/// Error types, settings, and logging setup.
pub use bindery_core as core;

/// Entity schemas, values, records, and the store seam.
#[cfg(feature = "model")]
pub use bindery_model as model;

/// Request, response, and form-data types.
#[cfg(feature = "http")]
pub use bindery_http as http;

/// Field schemas, forms, widgets, and schema-derived field selection.
#[cfg(feature = "forms")]
pub use bindery_forms as forms;

/// Editing controllers, renderers, and access gates.
#[cfg(feature = "views")]
pub use bindery_views as views;

// Third-party re-exports, so downstream crates can stay on the versions
// this workspace pins.
pub use {async_trait, chrono, serde_json, tokio, tracing};
