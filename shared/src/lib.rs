//! Product API Shared Library
//!
//! This crate contains the identifier type, domain models, error taxonomy
//! and request/response types shared by the backend and its clients.

pub mod errors;
pub mod id;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use id::Identifier;
pub use models::{Product, User};
pub use types::*;
