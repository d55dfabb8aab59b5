//! Product routes
//!
//! Every route here sits behind `auth_middleware`; handlers receive the
//! acting principal as `AuthUser`.

use crate::auth::{auth_middleware, AuthUser};
use crate::error::ApiResult;
use crate::services::ProductService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::get,
    Json, Router,
};
use product_api_shared::{Identifier, ListQuery, ProductRequest, ProductResponse};

/// Create product routes guarded by the auth gate
pub fn product_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// GET /api/v1/products?page=&limit=&sort=
async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<ProductResponse>>> {
    let products = ProductService::list(state.db(), query).await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// GET /api/v1/products/:id
async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ProductResponse>> {
    let id = Identifier::parse(&id)?;
    let product = ProductService::get(state.db(), id).await?;
    Ok(Json(product.into()))
}

/// POST /api/v1/products
async fn create_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<ProductRequest>,
) -> ApiResult<(StatusCode, Json<ProductResponse>)> {
    let product = ProductService::create(state.db(), auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

/// PUT /api/v1/products/:id
async fn update_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<ProductRequest>,
) -> ApiResult<Json<ProductResponse>> {
    let id = Identifier::parse(&id)?;
    let product = ProductService::update(state.db(), auth.user_id, id, req).await?;
    Ok(Json(product.into()))
}

/// DELETE /api/v1/products/:id
async fn delete_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = Identifier::parse(&id)?;
    ProductService::delete(state.db(), auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
