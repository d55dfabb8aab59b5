//! Health check endpoints
//!
//! - /health - process is up
//! - /health/live - liveness probe, never touches dependencies
//! - /health/ready - readiness probe, 503 until the database answers

use crate::{db, state::AppState};
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::time::Instant;

/// Overall or per-dependency status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Healthy,
    Alive,
    Ready,
    NotReady,
    Unhealthy,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: Status,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<DependencyCheck>,
}

/// Result of probing one dependency
#[derive(Debug, Serialize)]
pub struct DependencyCheck {
    pub status: Status,
    pub latency_ms: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn respond(status: Status) -> Json<HealthResponse> {
    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        database: None,
    })
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    respond(Status::Healthy)
}

/// GET /health/live
pub async fn liveness_check() -> Json<HealthResponse> {
    respond(Status::Alive)
}

/// GET /health/ready
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let started = Instant::now();
    let result = db::health_check(state.db()).await;
    let latency_ms = started.elapsed().as_millis();

    let (code, status, database) = match result {
        Ok(()) => (
            StatusCode::OK,
            Status::Ready,
            DependencyCheck {
                status: Status::Healthy,
                latency_ms,
                message: None,
            },
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Status::NotReady,
            DependencyCheck {
                status: Status::Unhealthy,
                latency_ms,
                message: Some(e.to_string()),
            },
        ),
    };

    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            database: Some(database),
        }),
    )
}
