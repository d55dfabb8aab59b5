//! Authentication module
//!
//! Provides HS256 access tokens, argon2 password hashing and the
//! request gate that guards protected routes.

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, Clock, FixedClock, JwtKeys, SystemClock, TokenService};
pub use middleware::{auth_middleware, AuthGate, AuthUser};
pub use password::{CredentialService, MAX_PASSWORD_BYTES};
