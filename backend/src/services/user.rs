//! User service for registration and login
//!
//! Password hashing/verification runs on the blocking thread pool; the
//! auth core never touches the database itself, so this service fetches
//! the stored hash and hands it over.

use crate::auth::{CredentialService, TokenService};
use crate::error::ApiError;
use crate::repositories::{user::is_unique_violation, UserRepository};
use product_api_shared::validation::normalize_email;
use product_api_shared::{AccessTokenResponse, CreateUserRequest, Identifier, User};
use sqlx::SqlitePool;
use tracing::{debug, info};
use validator::Validate;

/// User service for account operations
pub struct UserService;

impl UserService {
    /// Register a new user
    pub async fn register(
        pool: &SqlitePool,
        credentials: &CredentialService,
        req: CreateUserRequest,
    ) -> Result<User, ApiError> {
        let req = CreateUserRequest {
            email: normalize_email(&req.email),
            ..req
        };
        req.validate()
            .map_err(|e| ApiError::Validation(e.to_string()))?;

        let email = req.email.clone();

        if UserRepository::email_exists(pool, &email)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }

        // Hash password on blocking thread pool (CPU-intensive)
        let password_hash = credentials.hash_async(req.password).await?;

        let user = User {
            id: Identifier::generate(),
            name: req.name.trim().to_string(),
            email,
            password_hash,
        };

        UserRepository::create(pool, &user).await.map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::Conflict("Email already registered".to_string())
            } else {
                ApiError::Internal(e)
            }
        })?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Exchange email and password for an access token
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn login(
        pool: &SqlitePool,
        credentials: &CredentialService,
        tokens: &TokenService,
        email: &str,
        password: &str,
    ) -> Result<AccessTokenResponse, ApiError> {
        let invalid = || ApiError::Unauthorized("Invalid credentials".to_string());

        let user = match UserRepository::find_by_email(pool, &normalize_email(email))
            .await
            .map_err(ApiError::Internal)?
        {
            Some(user) => user,
            None => {
                // Same hashing cost as a wrong password
                credentials.verify_absent_async(password.to_string()).await;
                debug!("Login rejected: unknown email");
                return Err(invalid());
            }
        };

        // Verify password on blocking thread pool (CPU-intensive)
        let valid = credentials
            .verify_async(password.to_string(), user.password_hash.clone())
            .await;

        if !valid {
            debug!(user_id = %user.id, "Login rejected: bad password");
            return Err(invalid());
        }

        let access_token = tokens.issue_access_token(user.id)?;
        info!(user_id = %user.id, "Access token issued");

        Ok(AccessTokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: tokens.default_ttl_secs(),
        })
    }

    /// Get a user by id
    pub async fn get(pool: &SqlitePool, id: Identifier) -> Result<User, ApiError> {
        UserRepository::find_by_id(pool, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PasswordConfig;
    use crate::db;
    use secrecy::SecretString;
    use std::time::{Duration, Instant};

    struct Fixture {
        pool: SqlitePool,
        credentials: CredentialService,
        tokens: TokenService,
    }

    async fn fixture() -> Fixture {
        let pool = db::create_memory_pool().await.unwrap();
        db::run_migrations(&pool).await.unwrap();
        Fixture {
            pool,
            credentials: CredentialService::new(&PasswordConfig {
                memory_kib: 1024,
                iterations: 1,
                ..PasswordConfig::default()
            })
            .unwrap(),
            tokens: TokenService::new(
                &SecretString::new("test-secret-key-for-testing-only-32chars".to_string()),
                300,
            ),
        }
    }

    fn alice() -> CreateUserRequest {
        CreateUserRequest {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "s3cret".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_password() {
        let f = fixture().await;
        let user = UserService::register(&f.pool, &f.credentials, alice()).await.unwrap();

        let stored = UserService::get(&f.pool, user.id).await.unwrap();
        assert_ne!(stored.password_hash, "s3cret");
        assert!(f.credentials.verify("s3cret", &stored.password_hash));
    }

    #[tokio::test]
    async fn test_register_normalizes_email() {
        let f = fixture().await;
        let req = CreateUserRequest {
            email: "Alice@Example.com".to_string(),
            ..alice()
        };
        let user = UserService::register(&f.pool, &f.credentials, req).await.unwrap();
        assert_eq!(user.email, "alice@example.com");
    }

    #[tokio::test]
    async fn test_register_trims_email_before_validation() {
        let f = fixture().await;
        let req = CreateUserRequest {
            email: "  Alice@Example.com ".to_string(),
            ..alice()
        };
        let user = UserService::register(&f.pool, &f.credentials, req).await.unwrap();
        assert_eq!(user.email, "alice@example.com");

        let response = UserService::login(
            &f.pool,
            &f.credentials,
            &f.tokens,
            " alice@example.com",
            "s3cret",
        )
        .await;
        assert!(response.is_ok());
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let f = fixture().await;
        UserService::register(&f.pool, &f.credentials, alice()).await.unwrap();

        let result = UserService::register(&f.pool, &f.credentials, alice()).await;
        assert!(matches!(result, Err(ApiError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_weak_password() {
        let f = fixture().await;
        let req = CreateUserRequest {
            password: "123".to_string(),
            ..alice()
        };
        let result = UserService::register(&f.pool, &f.credentials, req).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn test_login_issues_token_for_user() {
        let f = fixture().await;
        let user = UserService::register(&f.pool, &f.credentials, alice()).await.unwrap();

        let response = UserService::login(
            &f.pool,
            &f.credentials,
            &f.tokens,
            "alice@example.com",
            "s3cret",
        )
        .await
        .unwrap();

        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 300);
        assert_eq!(f.tokens.verify(&response.access_token), Ok(user.id));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let f = fixture().await;
        UserService::register(&f.pool, &f.credentials, alice()).await.unwrap();

        let wrong_password = UserService::login(
            &f.pool,
            &f.credentials,
            &f.tokens,
            "alice@example.com",
            "wrong-password",
        )
        .await
        .unwrap_err();
        let unknown_email = UserService::login(
            &f.pool,
            &f.credentials,
            &f.tokens,
            "nobody@example.com",
            "s3cret",
        )
        .await
        .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert!(matches!(wrong_password, ApiError::Unauthorized(_)));
    }

    async fn average_login_time(
        f: &Fixture,
        credentials: &CredentialService,
        email: &str,
        password: &str,
    ) -> Duration {
        const RUNS: u32 = 5;
        let started = Instant::now();
        for _ in 0..RUNS {
            let result = UserService::login(&f.pool, credentials, &f.tokens, email, password).await;
            assert!(matches!(result, Err(ApiError::Unauthorized(_))));
        }
        started.elapsed() / RUNS
    }

    #[tokio::test]
    async fn test_unknown_email_costs_a_hash_verification() {
        let f = fixture().await;
        // Production cost so hashing dominates the database round trip
        let credentials = CredentialService::new(&PasswordConfig::default()).unwrap();
        UserService::register(&f.pool, &credentials, alice()).await.unwrap();

        let wrong_password =
            average_login_time(&f, &credentials, "alice@example.com", "wrong-password").await;
        let unknown_email =
            average_login_time(&f, &credentials, "nobody@example.com", "wrong-password").await;

        assert!(
            wrong_password < unknown_email * 5 && unknown_email < wrong_password * 5,
            "wrong_password={:?} unknown_email={:?}",
            wrong_password,
            unknown_email
        );
    }

    #[tokio::test]
    async fn test_get_unknown_user() {
        let f = fixture().await;
        let result = UserService::get(&f.pool, Identifier::generate()).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
