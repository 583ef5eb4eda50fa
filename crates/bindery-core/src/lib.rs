//! # bindery-core
//!
//! Error taxonomy, settings, and logging setup shared by the bindery crates.
//! This crate has no knowledge of forms or controllers; it provides the
//! foundation the other crates build on.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result alias
//! - [`settings`] - Application settings and global configuration
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;

// Re-export the most commonly used types at the crate root.
pub use error::{BinderyError, BinderyResult};
pub use settings::{Settings, SETTINGS};
