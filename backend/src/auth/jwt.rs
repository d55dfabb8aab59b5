//! Access token issuance and verification
//!
//! Tokens are compact HS256 JWTs carrying a fixed claim set (`sub`, `iat`,
//! `exp`). Keys are derived once from the configured secret and shared
//! through `Arc`, so the service is cheap to clone into every handler.
//!
//! Expiry is checked against an injected [`Clock`] rather than the
//! library's own wall-clock read: each call samples the clock once.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use product_api_shared::{Identifier, TokenError};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex};

/// Source of "now" for token checks
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for deterministic expiry checks
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Move the clock forward (or backward for negative durations)
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// JWT claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: Identifier,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Pre-computed JWT keys for efficient token operations
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    /// Create new JWT keys from secret
    /// This should be called once at startup
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: Arc::new(EncodingKey::from_secret(bytes)),
            decoding: Arc::new(DecodingKey::from_secret(bytes)),
        }
    }

    pub fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

/// Token service for issuing and verifying access tokens
///
/// Read-only after construction; clones share the same keys and clock.
#[derive(Clone)]
pub struct TokenService {
    keys: JwtKeys,
    validation: Validation,
    default_ttl_secs: i64,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("keys", &"[REDACTED]")
            .field("default_ttl_secs", &self.default_ttl_secs)
            .finish()
    }
}

impl TokenService {
    /// Create a new token service backed by the system clock
    ///
    /// Call this once at application startup and store in AppState.
    pub fn new(secret: &SecretString, default_ttl_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // exp is checked in verify_at against the injected clock
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            keys: JwtKeys::new(secret),
            validation,
            default_ttl_secs,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock used by `issue` and `verify`
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Issue an access token with the configured lifetime
    #[inline]
    pub fn issue_access_token(&self, subject: Identifier) -> Result<String, TokenError> {
        self.issue(subject, self.default_ttl_secs)
    }

    /// Issue a token for `subject` valid for `ttl_secs` seconds from now
    pub fn issue(&self, subject: Identifier, ttl_secs: i64) -> Result<String, TokenError> {
        self.issue_at(subject, ttl_secs, self.clock.now())
    }

    /// Issue a token as if the current time were `now`
    pub fn issue_at(
        &self,
        subject: Identifier,
        ttl_secs: i64,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        if ttl_secs <= 0 {
            return Err(TokenError::InvalidExpiry(ttl_secs));
        }
        let iat = now.timestamp();
        let exp = iat
            .checked_add(ttl_secs)
            .ok_or(TokenError::InvalidExpiry(ttl_secs))?;

        let claims = Claims {
            sub: subject,
            exp,
            iat,
        };

        encode(&Header::new(Algorithm::HS256), &claims, self.keys.encoding())
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify a token and return its subject
    #[inline]
    pub fn verify(&self, token: &str) -> Result<Identifier, TokenError> {
        self.verify_at(token, self.clock.now())
    }

    /// Verify a token against a fixed point in time
    ///
    /// A token is valid strictly before its `exp`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Identifier, TokenError> {
        let claims = self.decode_claims(token)?;
        if claims.exp <= now.timestamp() {
            return Err(TokenError::ExpiredToken);
        }
        Ok(claims.sub)
    }

    /// Check the signature and decode the claims without looking at expiry
    pub fn decode_claims(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, self.keys.decoding(), &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::TamperedToken,
                ErrorKind::ExpiredSignature => TokenError::ExpiredToken,
                _ => TokenError::MalformedToken,
            })
    }

    /// Lifetime of tokens issued by `issue_access_token`
    #[inline]
    pub fn default_ttl_secs(&self) -> i64 {
        self.default_ttl_secs
    }

    /// Get the pre-computed keys (for sharing)
    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }
}
