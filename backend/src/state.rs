//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! # Design Principles
//!
//! 1. **Pre-compute expensive resources**: JWT keys, DB pools are created once
//! 2. **Cheap cloning**: All fields use Arc or are already Clone-cheap
//! 3. **Immutable after creation**: State is read-only during request handling

use crate::auth::{AuthGate, Clock, CredentialService, TokenService};
use crate::config::AppConfig;
use anyhow::Result;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Token service with cached keys
    pub tokens: TokenService,
    /// Password hashing with configured cost
    pub credentials: CredentialService,
    /// Gate for protected routes
    pub gate: AuthGate,
}

impl AppState {
    /// Create a new application state
    ///
    /// Derives the signing keys from the configured secret once; call this
    /// at application startup only.
    pub fn new(db: SqlitePool, config: AppConfig) -> Result<Self> {
        let tokens = TokenService::new(&config.jwt.secret, config.jwt.expires_in_secs);
        let credentials = CredentialService::new(&config.password)?;
        let gate = AuthGate::new(tokens.clone());

        Ok(Self {
            db,
            config: Arc::new(config),
            tokens,
            credentials,
            gate,
        })
    }

    /// Drive token issuance and verification from `clock`
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.tokens = self.tokens.with_clock(clock);
        self.gate = AuthGate::new(self.tokens.clone());
        self
    }

    /// Get a reference to the database pool
    #[inline]
    pub fn db(&self) -> &SqlitePool {
        &self.db
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the token service
    #[inline]
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Get a reference to the credential service
    #[inline]
    pub fn credentials(&self) -> &CredentialService {
        &self.credentials
    }

    /// Get a reference to the auth gate
    #[inline]
    pub fn gate(&self) -> &AuthGate {
        &self.gate
    }
}
