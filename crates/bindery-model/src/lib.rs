//! # bindery-model
//!
//! Entity schemas, typed values, dynamic records, and the entity-store
//! interface. The form engine consumes these shapes; it never owns or
//! mutates them.
//!
//! ## Modules
//!
//! - [`value`] - The typed [`Value`](value::Value) representation
//! - [`schema`] - [`EntitySchema`](schema::EntitySchema) field descriptions
//! - [`record`] - Dynamic [`Record`](record::Record) instances
//! - [`store`] - The [`EntityStore`](store::EntityStore) seam and an
//!   in-memory implementation

pub mod record;
pub mod schema;
pub mod store;
pub mod value;

// Re-export the most commonly used types at the crate root.
pub use record::Record;
pub use schema::{EntityField, EntityKind, EntitySchema};
pub use store::{EntityStore, MemoryStore};
pub use value::Value;
