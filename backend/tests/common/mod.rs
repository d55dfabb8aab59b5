//! Common test utilities for integration tests
//!
//! Each `TestApp` owns a private in-memory SQLite database, so tests run
//! in parallel without cleanup.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use product_api_backend::{
    auth::Clock,
    config::{AppConfig, PasswordConfig},
    db, routes,
    state::AppState,
};
use secrecy::SecretString;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only-32chars";

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub pool: SqlitePool,
    pub state: AppState,
}

impl TestApp {
    /// Create a new test application backed by a fresh database
    pub async fn new() -> Self {
        Self::build(None).await
    }

    /// Create a test application whose tokens follow `clock`
    pub async fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::build(Some(clock)).await
    }

    async fn build(clock: Option<Arc<dyn Clock>>) -> Self {
        let pool = db::create_memory_pool()
            .await
            .expect("Failed to create test database pool");
        db::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let mut state = AppState::new(pool.clone(), test_config()).expect("Invalid test config");
        if let Some(clock) = clock {
            state = state.with_clock(clock);
        }
        let app = routes::create_router(state.clone());

        Self { app, pool, state }
    }

    async fn send(
        &self,
        method: &str,
        path: &str,
        body: Option<&str>,
        token: Option<&str>,
    ) -> (StatusCode, String) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let body = match body {
            Some(body) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(body.to_string())
            }
            None => Body::empty(),
        };

        let response = self.app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_str = String::from_utf8(body.to_vec()).unwrap();

        (status, body_str)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        self.send("GET", path, None, None).await
    }

    /// Make a GET request with a bearer token
    pub async fn get_auth(&self, path: &str, token: &str) -> (StatusCode, String) {
        self.send("GET", path, None, Some(token)).await
    }

    /// Make a POST request with JSON body
    pub async fn post(&self, path: &str, body: &str) -> (StatusCode, String) {
        self.send("POST", path, Some(body), None).await
    }

    /// Make a POST request with JSON body and a bearer token
    pub async fn post_auth(&self, path: &str, body: &str, token: &str) -> (StatusCode, String) {
        self.send("POST", path, Some(body), Some(token)).await
    }

    /// Make a PUT request with JSON body and a bearer token
    pub async fn put_auth(&self, path: &str, body: &str, token: &str) -> (StatusCode, String) {
        self.send("PUT", path, Some(body), Some(token)).await
    }

    /// Make a DELETE request with a bearer token
    pub async fn delete_auth(&self, path: &str, token: &str) -> (StatusCode, String) {
        self.send("DELETE", path, None, Some(token)).await
    }

    /// Register a user and return the created resource
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Value {
        let body = json!({ "name": name, "email": email, "password": password });
        let (status, response) = self.post("/api/v1/users", &body.to_string()).await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", response);
        serde_json::from_str(&response).unwrap()
    }

    /// Exchange credentials for an access token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let body = json!({ "email": email, "password": password });
        let (status, response) = self.post("/api/v1/users/token", &body.to_string()).await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", response);
        let response: Value = serde_json::from_str(&response).unwrap();
        response["access_token"].as_str().unwrap().to_string()
    }

    /// Register a throwaway user and return a token for it
    pub async fn authenticated(&self) -> String {
        self.register("Tester", "tester@example.com", "tester-password")
            .await;
        self.login("tester@example.com", "tester-password").await
    }
}

/// Configuration with cheap password hashing for fast tests
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.database.url = "sqlite::memory:".to_string();
    config.jwt.secret = SecretString::new(TEST_SECRET.to_string());
    config.password = PasswordConfig {
        memory_kib: 1024,
        iterations: 1,
        ..PasswordConfig::default()
    };
    config
}
