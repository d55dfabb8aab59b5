//! Authentication gate and middleware
//!
//! [`AuthGate`] turns a raw `Authorization` header into the acting
//! principal. Every token failure leaves the gate as the same
//! `Unauthorized`; the specific reason is only logged.

use super::TokenService;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{FromRef, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use product_api_shared::{AuthError, Identifier, TokenError};
use tracing::debug;

const BEARER_PREFIX: &str = "Bearer ";

/// Request-time checkpoint for protected resources
///
/// Stateless; holds only a clone of the token service.
#[derive(Debug, Clone)]
pub struct AuthGate {
    tokens: TokenService,
}

impl AuthGate {
    pub fn new(tokens: TokenService) -> Self {
        Self { tokens }
    }

    /// Resolve the principal from a raw `Authorization` header value
    pub fn authorize(&self, raw_header: Option<&str>) -> Result<Identifier, AuthError> {
        let token = raw_header
            .and_then(|value| value.strip_prefix(BEARER_PREFIX))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingToken)?;

        self.tokens.verify(token).map_err(|reason| {
            match reason {
                TokenError::ExpiredToken => debug!("Rejected expired token"),
                TokenError::TamperedToken => debug!("Rejected token with bad signature"),
                TokenError::MalformedToken => debug!("Rejected malformed token"),
                other => debug!(error = %other, "Rejected token"),
            }
            AuthError::Unauthorized
        })
    }

    /// Resolve the principal from request headers
    pub fn authorize_headers(&self, headers: &HeaderMap) -> Result<Identifier, AuthError> {
        let raw = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        self.authorize(raw)
    }
}

/// Authenticated principal attached to a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Identifier,
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Already resolved by auth_middleware
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(*user);
        }

        let app_state = AppState::from_ref(state);
        let user_id = app_state.gate().authorize_headers(&parts.headers)?;
        Ok(AuthUser { user_id })
    }
}

/// Middleware guarding a group of routes
///
/// On success the principal is inserted into request extensions; on
/// failure the request never reaches the handler.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user_id = state.gate().authorize_headers(request.headers())?;
    request.extensions_mut().insert(AuthUser { user_id });

    Ok(next.run(request).await)
}
