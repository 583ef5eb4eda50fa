//! # bindery-forms
//!
//! Declarative form schemas with a typed cleaning pipeline. A form is a
//! list of [`FieldSchema`]s; binding it to submitted data and validating
//! yields either a typed name-to-value map or per-field error messages,
//! never both for the same field. Schemas can be written by hand or derived
//! from an entity definition with [`derive_fields`].
//!
//! ## Modules
//!
//! - [`fields`] - Field kinds, schemas, and per-field cleaning
//! - [`form`] - The form state machine and render surfaces
//! - [`bound_field`] - Per-field render projection
//! - [`builder`] - Deriving field schemas from an entity schema
//! - [`validation`] - Checks, hooks, and the field-set cleaning pass
//! - [`widgets`] - Widget hints and HTML rendering
//!
//! ## A form in five lines
//!
//! ```
//! use bindery_forms::{FieldKind, FieldSchema, Form, FormState};
//! use bindery_http::FormData;
//!
//! let fields = vec![FieldSchema::new("name", FieldKind::text())];
//! let mut form = Form::bound(fields, FormData::from_pairs(&[("name", "Ada")]));
//! assert_eq!(form.validate(), FormState::Valid);
//! ```

pub mod bound_field;
pub mod builder;
pub mod fields;
pub mod form;
pub mod validation;
pub mod widgets;

// Re-export the most commonly used types at the crate root.
pub use bound_field::BoundField;
pub use builder::{derive_fields, FieldOverrides, FieldSelection};
pub use fields::{clean_field_value, FieldKind, FieldSchema};
pub use form::{Form, FormState, NON_FIELD_ERRORS};
pub use validation::{CheckHook, FieldCheck, FormHook, ValidationFailure};
pub use widgets::WidgetHint;
