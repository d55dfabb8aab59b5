//! Password hashing using argon2
//!
//! New hashes are Argon2id in PHC string format, so every stored hash
//! carries its own algorithm, version, cost parameters and salt.
//! Verification also accepts bcrypt hashes carried over from the
//! previous deployment.
//!
//! # Performance Considerations
//!
//! Argon2 is intentionally CPU-intensive. For async contexts use the
//! `*_async` variants, which run on the blocking thread pool.

use crate::config::PasswordConfig;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use product_api_shared::CredentialError;
use std::sync::Arc;
use tracing::error;

/// Upper bound on password length, in bytes
pub const MAX_PASSWORD_BYTES: usize = 128;

const PLACEHOLDER_PASSWORD: &[u8] = b"no-account-placeholder";
const PLACEHOLDER_SALT: &[u8] = b"product-api-placeholder-salt";

/// Password hashing service
///
/// Owns the hashing parameters; holds no other state and is safe to
/// share across threads.
#[derive(Debug, Clone)]
pub struct CredentialService {
    params: Params,
    min_length: usize,
    /// Hash with the configured cost, verified against when no account exists
    placeholder_hash: Arc<str>,
}

impl CredentialService {
    /// Build the service from configuration
    pub fn new(config: &PasswordConfig) -> Result<Self, CredentialError> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| CredentialError::InvalidParams(e.to_string()))?;

        let salt = SaltString::encode_b64(PLACEHOLDER_SALT)
            .map_err(|e| CredentialError::Hashing(e.to_string()))?;
        let placeholder_hash = argon2id(params.clone())
            .hash_password(PLACEHOLDER_PASSWORD, &salt)
            .map_err(|e| CredentialError::Hashing(e.to_string()))?
            .to_string();

        Ok(Self {
            params,
            min_length: config.min_length,
            placeholder_hash: placeholder_hash.into(),
        })
    }

    fn hasher(&self) -> Argon2<'static> {
        argon2id(self.params.clone())
    }

    /// Hash a password using argon2 (blocking operation)
    ///
    /// Fails with `WeakInput` when the password is outside the length policy.
    pub fn hash(&self, password: &str) -> Result<String, CredentialError> {
        if password.chars().count() < self.min_length || password.len() > MAX_PASSWORD_BYTES {
            return Err(CredentialError::WeakInput {
                min: self.min_length,
                max: MAX_PASSWORD_BYTES,
            });
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .hasher()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| CredentialError::Hashing(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Hash a password asynchronously (non-blocking)
    pub async fn hash_async(&self, password: String) -> Result<String, CredentialError> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.hash(&password))
            .await
            .map_err(|e| CredentialError::Hashing(format!("Task join error: {}", e)))?
    }

    /// Verify a password against a stored hash (blocking operation)
    ///
    /// Returns `false` for a wrong password and for a stored hash that
    /// cannot be parsed; callers cannot tell the two apart.
    pub fn verify(&self, password: &str, stored_hash: &str) -> bool {
        if is_bcrypt(stored_hash) {
            return bcrypt::verify(password, stored_hash).unwrap_or(false);
        }

        match PasswordHash::new(stored_hash) {
            // Parameters come from the stored hash, not from self.params
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    /// Verify a password asynchronously (non-blocking)
    pub async fn verify_async(&self, password: String, stored_hash: String) -> bool {
        let service = self.clone();
        match tokio::task::spawn_blocking(move || service.verify(&password, &stored_hash)).await {
            Ok(valid) => valid,
            Err(e) => {
                error!("Password verification task failed: {}", e);
                false
            }
        }
    }

    /// Spend one full verification on a password that has no account
    ///
    /// Always `false`. Login calls this for unknown emails so both
    /// rejection paths cost the same.
    pub fn verify_absent(&self, password: &str) -> bool {
        let _ = self.verify(password, &self.placeholder_hash);
        false
    }

    /// Async variant of [`verify_absent`](Self::verify_absent)
    pub async fn verify_absent_async(&self, password: String) -> bool {
        let service = self.clone();
        if let Err(e) = tokio::task::spawn_blocking(move || service.verify_absent(&password)).await {
            error!("Password verification task failed: {}", e);
        }
        false
    }

    /// Minimum accepted password length, in characters
    #[inline]
    pub fn min_length(&self) -> usize {
        self.min_length
    }
}

fn argon2id(params: Params) -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
}

fn is_bcrypt(hash: &str) -> bool {
    ["$2a$", "$2b$", "$2x$", "$2y$"]
        .iter()
        .any(|prefix| hash.starts_with(prefix))
}
