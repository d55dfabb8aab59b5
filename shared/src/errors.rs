//! Error types for the Product API

use thiserror::Error;

/// Identifier parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),
}

/// Password hashing errors
///
/// Verification never produces one of these: a failed check is `false`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Password must be between {min} and {max} characters")]
    WeakInput { min: usize, max: usize },

    #[error("Failed to hash password: {0}")]
    Hashing(String),

    #[error("Invalid hashing parameters: {0}")]
    InvalidParams(String),
}

/// Token issuance and verification errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token lifetime must be positive, got {0}s")]
    InvalidExpiry(i64),

    #[error("Malformed token")]
    MalformedToken,

    #[error("Token signature mismatch")]
    TamperedToken,

    #[error("Token expired")]
    ExpiredToken,

    #[error("Failed to sign token: {0}")]
    Signing(String),
}

/// Request authentication errors
///
/// This is what leaves the gate: the specific [`TokenError`] never does.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing token")]
    MissingToken,

    #[error("Unauthorized")]
    Unauthorized,
}

/// Product validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductError {
    #[error("id is required")]
    IdRequired,

    #[error("name is required")]
    NameRequired,

    #[error("price is required")]
    PriceRequired,

    #[error("invalid price")]
    InvalidPrice,
}
