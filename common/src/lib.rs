//! Domain models for the social content client.
//!
//! This crate contains pure data structures representing the core
//! concepts in our application. Models have no business logic - they're
//! just data that can be passed between layers.
//!
//! ## Architecture
//!
//! - **common** (this crate): Pure data structures and value types
//! - **client-core**: Business logic operating on models
//! - **UI layer** (external): Renders lists/detail views from model data
//!
//! This layered architecture keeps concerns separated and makes testing easier.

pub mod error;
pub mod http_status;
pub mod post;
pub mod profile;
pub mod redacted_secret;

#[cfg(test)]
mod tests;

pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;
pub use http_status::HttpStatusCode;
pub use post::{Author, Post};
pub use profile::Profile;
pub use redacted_secret::RedactedSecret;
