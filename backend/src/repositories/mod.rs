//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod product;
pub mod user;

pub use product::ProductRepository;
pub use user::UserRepository;
