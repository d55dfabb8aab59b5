//! User routes
//!
//! Registration, lookup and token issuance. Password hashing runs on the
//! blocking thread pool so it never stalls the async runtime.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use product_api_shared::{
    AccessTokenResponse, CreateUserRequest, Identifier, TokenRequest, UserResponse,
};

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_user))
        .route("/token", post(issue_token))
        .route("/me", get(current_user))
        .route("/:id", get(get_user))
}

/// POST /api/v1/users
async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user = UserService::register(state.db(), state.credentials(), req).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /api/v1/users/token
async fn issue_token(
    State(state): State<AppState>,
    Json(req): Json<TokenRequest>,
) -> ApiResult<Json<AccessTokenResponse>> {
    let tokens = UserService::login(
        state.db(),
        state.credentials(),
        state.tokens(),
        &req.email,
        &req.password,
    )
    .await?;
    Ok(Json(tokens))
}

/// GET /api/v1/users/:id
async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    let id = Identifier::parse(&id)?;
    let user = UserService::get(state.db(), id).await?;
    Ok(Json(user.into()))
}

/// GET /api/v1/users/me
///
/// Requires a valid Bearer token; returns the principal's account.
async fn current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<UserResponse>> {
    let user = UserService::get(state.db(), auth.user_id).await?;
    Ok(Json(user.into()))
}
