//! Configuration management for the Product API backend
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: API__)

use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::env;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// JWT configuration
///
/// The secret is redacted from `Debug` output.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: SecretString,
    pub expires_in_secs: i64,
}

/// Password hashing configuration (argon2id cost and length policy)
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordConfig {
    pub min_length: usize,
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            min_length: 6,
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

const DEFAULT_JWT_SECRET: &str = "development-secret-change-in-production";

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
            },
            database: DatabaseConfig {
                url: "sqlite://product_api.db?mode=rwc".to_string(),
                max_connections: 10,
            },
            jwt: JwtConfig {
                secret: SecretString::new(DEFAULT_JWT_SECRET.to_string()),
                expires_in_secs: 300, // 5 minutes
            },
            password: PasswordConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with API__ prefix
    pub fn load() -> Result<Self> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);
        let defaults = AppConfig::default();

        let config = config::Config::builder()
            // Start with defaults
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("database.url", defaults.database.url)?
            .set_default(
                "database.max_connections",
                i64::from(defaults.database.max_connections),
            )?
            .set_default("jwt.secret", defaults.jwt.secret.expose_secret().as_str())?
            .set_default("jwt.expires_in_secs", defaults.jwt.expires_in_secs)?
            .set_default("password.min_length", defaults.password.min_length as i64)?
            .set_default("password.memory_kib", i64::from(defaults.password.memory_kib))?
            .set_default("password.iterations", i64::from(defaults.password.iterations))?
            .set_default("password.parallelism", i64::from(defaults.password.parallelism))?
            // Load from environment-specific config file
            .add_source(config::File::with_name(&config_file).required(false))
            // Override with environment variables (API__ prefix)
            // e.g., API__SERVER__PORT=9000 sets server.port
            .add_source(config::Environment::with_prefix("API").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }

    /// Problems that make this configuration unfit for production
    pub fn production_issues(&self) -> Vec<&'static str> {
        let mut issues = Vec::new();
        let secret = self.jwt.secret.expose_secret();

        if secret.contains("development") || secret.len() < 32 {
            issues.push("JWT secret must be at least 32 characters and not contain 'development'");
        }
        if self.jwt.expires_in_secs <= 0 {
            issues.push("JWT expiry must be positive");
        }
        issues
    }
}
