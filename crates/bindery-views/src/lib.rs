//! Editing controllers for bindery.
//!
//! This crate turns an entity schema plus a store and a renderer into the
//! standard browser editing flow:
//!
//! - [`controller`] - the [`Controller`] seam a router mounts, with method
//!   routing and centralized error conversion
//! - [`editing`] - [`CreateController`], [`UpdateController`], and
//!   [`DeleteController`], configured through [`EditingConfig`]
//! - [`render`] - the [`Renderer`] seam with a debug and a tera
//!   implementation
//! - [`gate`] - [`AccessGate`] checks that run before a controller
//!
//! ```
//! use std::sync::{Arc, LazyLock};
//!
//! use bindery_forms::FieldSelection;
//! use bindery_http::Request;
//! use bindery_model::{EntityField, EntityKind, EntitySchema, MemoryStore};
//! use bindery_views::{Controller, CreateController, DebugRenderer, EditingConfig};
//!
//! static NOTE: LazyLock<EntitySchema> = LazyLock::new(|| {
//!     EntitySchema::new(
//!         "note",
//!         vec![
//!             EntityField::new("id", EntityKind::AutoId).read_only(),
//!             EntityField::new("body", EntityKind::Text).max_length(500),
//!         ],
//!     )
//! });
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let config = EditingConfig::new(&NOTE, FieldSelection::allow(&["body"]));
//! let controller = CreateController::new(
//!     config,
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(DebugRenderer),
//! )
//! .unwrap();
//!
//! let response = controller
//!     .dispatch(&Request::post("/note/add/", "body=pick+up+proofs"))
//!     .await;
//! assert!(response.is_redirect());
//! # }
//! ```

pub mod controller;
pub mod editing;
pub mod gate;
pub mod render;

pub use controller::{error_response, Controller};
pub use editing::{
    CreateController, DeleteController, EditingConfig, SuccessTarget, UpdateController,
};
pub use gate::{AccessGate, Gated};
pub use render::{DebugRenderer, Renderer, TeraRenderer};
