//! # bindery-http
//!
//! The HTTP-shaped types the editing controllers consume and produce:
//! parsed form data, a reduced request, and a plain response. Transport and
//! routing stay with the host application.
//!
//! ## Modules
//!
//! - [`formdata`] - Multi-valued form-urlencoded data
//! - [`request`] - The reduced inbound [`Request`](request::Request)
//! - [`response`] - The outbound [`Response`](response::Response)

pub mod formdata;
pub mod request;
pub mod response;

// Re-export the most commonly used types at the crate root.
pub use formdata::FormData;
pub use request::Request;
pub use response::Response;
