//! Authentication service

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    config::Config,
    constants::{roles, security_events},
    db::repositories::UserRepository,
    error::{AppError, AppResult},
    models::{SecurityEvent, User},
    services::SecurityLogService,
    utils::{generate_secure_token, hash_string},
};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub username: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Issued token pair
#[derive(Debug)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// Authentication service
pub struct AuthService;

impl AuthService {
    /// Register a new user
    pub async fn register(
        pool: &PgPool,
        username: &str,
        email: &str,
        password: &str,
        display_name: Option<&str>,
        role: Option<&str>,
        ip: Option<String>,
    ) -> AppResult<User> {
        let role = role.unwrap_or(roles::STUDENT);
        if !roles::SELF_ASSIGNABLE.contains(&role) {
            return Err(AppError::Forbidden(format!(
                "Cannot self-register with role '{}'",
                role
            )));
        }

        // Check if username exists
        if UserRepository::find_by_username(pool, username).await?.is_some() {
            return Err(AppError::AlreadyExists("Username already taken".to_string()));
        }

        // Check if email exists
        if UserRepository::find_by_email(pool, email).await?.is_some() {
            return Err(AppError::AlreadyExists("Email already registered".to_string()));
        }

        let password_hash = Self::hash_password(password)?;

        let user =
            UserRepository::create(pool, username, email, &password_hash, display_name, role)
                .await?;

        info!(user_id = %user.id, username = %user.username, role = %user.role, "User registered");
        SecurityLogService::record(
            pool,
            SecurityEvent::new(security_events::REGISTER)
                .user(user.id)
                .ip(ip),
        )
        .await;

        Ok(user)
    }

    /// Login with username/email and password
    pub async fn login(
        pool: &PgPool,
        redis: ConnectionManager,
        config: &Config,
        identifier: &str,
        password: &str,
        ip: Option<String>,
    ) -> AppResult<(User, TokenPair)> {
        let Some(user) = UserRepository::find_by_identifier(pool, identifier).await? else {
            SecurityLogService::record(
                pool,
                SecurityEvent::new(security_events::LOGIN_FAILURE)
                    .ip(ip)
                    .detail(format!("Unknown identifier: {}", identifier)),
            )
            .await;
            return Err(AppError::InvalidCredentials);
        };

        if !Self::verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "Login failed: bad password");
            SecurityLogService::record(
                pool,
                SecurityEvent::new(security_events::LOGIN_FAILURE)
                    .user(user.id)
                    .ip(ip)
                    .detail("Invalid password"),
            )
            .await;
            return Err(AppError::InvalidCredentials);
        }

        // Only reveal suspension to someone who knows the password
        if user.is_currently_suspended() {
            SecurityLogService::record(
                pool,
                SecurityEvent::new(security_events::ACCESS_DENIED)
                    .user(user.id)
                    .ip(ip)
                    .detail("Login attempt while suspended"),
            )
            .await;
            return Err(AppError::Forbidden(format!(
                "Account suspended: {}",
                user.suspension_reason.as_deref().unwrap_or("No reason provided")
            )));
        }

        UserRepository::update_last_login(pool, &user.id).await?;

        let tokens = Self::issue_tokens(redis, config, &user).await?;

        info!(user_id = %user.id, "User logged in");
        SecurityLogService::record(
            pool,
            SecurityEvent::new(security_events::LOGIN_SUCCESS)
                .user(user.id)
                .ip(ip),
        )
        .await;

        Ok((user, tokens))
    }

    /// Exchange a refresh token for a new token pair. Refresh tokens are single use.
    pub async fn refresh_token(
        pool: &PgPool,
        mut redis: ConnectionManager,
        config: &Config,
        refresh_token: &str,
        ip: Option<String>,
    ) -> AppResult<TokenPair> {
        let token_hash = hash_string(refresh_token);
        let key = refresh_key(&token_hash);

        let (owner, _): (Option<String>, i64) = redis::pipe()
            .atomic()
            .get(&key)
            .del(&key)
            .query_async(&mut redis)
            .await?;

        let user_id = owner
            .and_then(|id| Uuid::parse_str(&id).ok())
            .ok_or(AppError::InvalidToken)?;

        let _: () = redis.srem(user_tokens_key(&user_id), &token_hash).await?;

        let user = UserRepository::find_by_id(pool, &user_id)
            .await?
            .ok_or(AppError::InvalidToken)?;

        if user.is_currently_suspended() {
            return Err(AppError::Forbidden("Account suspended".to_string()));
        }

        let tokens = Self::issue_tokens(redis, config, &user).await?;

        SecurityLogService::record(
            pool,
            SecurityEvent::new(security_events::TOKEN_REFRESH)
                .user(user.id)
                .ip(ip),
        )
        .await;

        Ok(tokens)
    }

    /// Revoke one refresh token, or every refresh token of the user
    pub async fn logout(
        pool: &PgPool,
        mut redis: ConnectionManager,
        user_id: &Uuid,
        refresh_token: Option<&str>,
        all_sessions: bool,
        ip: Option<String>,
    ) -> AppResult<()> {
        let set_key = user_tokens_key(user_id);

        if all_sessions {
            let hashes: Vec<String> = redis.smembers(&set_key).await?;
            let mut pipe = redis::pipe();
            for hash in &hashes {
                pipe.del(refresh_key(hash)).ignore();
            }
            pipe.del(&set_key).ignore();
            let _: () = pipe.query_async(&mut redis).await?;
        } else if let Some(token) = refresh_token {
            let hash = hash_string(token);
            // Only revoke tokens that belong to the caller
            let is_member: bool = redis.sismember(&set_key, &hash).await?;
            if is_member {
                let _: () = redis::pipe()
                    .del(refresh_key(&hash))
                    .ignore()
                    .srem(&set_key, &hash)
                    .ignore()
                    .query_async(&mut redis)
                    .await?;
            }
        }

        SecurityLogService::record(
            pool,
            SecurityEvent::new(security_events::LOGOUT)
                .user(*user_id)
                .ip(ip)
                .detail(if all_sessions { "all sessions" } else { "single session" }),
        )
        .await;

        Ok(())
    }

    /// Get user by ID
    pub async fn get_user_by_id(pool: &PgPool, user_id: &Uuid) -> AppResult<Option<User>> {
        UserRepository::find_by_id(pool, user_id).await
    }

    /// Verify JWT token and extract claims
    pub fn verify_token(token: &str, secret: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    /// Hash password using Argon2
    pub(crate) fn hash_password(password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?
            .to_string();

        Ok(hash)
    }

    /// Verify password against hash
    pub(crate) fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Generate access token
    pub fn generate_access_token(user: &User, config: &Config) -> AppResult<(String, i64)> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(config.jwt.expiry_hours);
        let expires_in = config.jwt.expiry_hours * 3600;

        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role: user.role.clone(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Token generation failed: {}", e)))?;

        Ok((token, expires_in))
    }

    /// Issue an access token and store a fresh refresh token
    async fn issue_tokens(
        mut redis: ConnectionManager,
        config: &Config,
        user: &User,
    ) -> AppResult<TokenPair> {
        let (access_token, expires_in) = Self::generate_access_token(user, config)?;
        let refresh_token = generate_secure_token(48);
        let token_hash = hash_string(&refresh_token);

        let ttl = (config.jwt.refresh_token_expiry_days * 24 * 60 * 60) as u64;
        let set_key = user_tokens_key(&user.id);

        let _: () = redis::pipe()
            .set_ex(refresh_key(&token_hash), user.id.to_string(), ttl)
            .ignore()
            .sadd(&set_key, &token_hash)
            .ignore()
            .expire(&set_key, ttl as i64)
            .ignore()
            .query_async(&mut redis)
            .await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in,
        })
    }
}

fn refresh_key(token_hash: &str) -> String {
    format!("refresh_token:{}", token_hash)
}

fn user_tokens_key(user_id: &Uuid) -> String {
    format!("user_refresh_tokens:{}", user_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DatabaseConfig, JwtConfig, LearningConfig, RedisConfig, ServerConfig};
    use crate::models::user::sample_user;

    fn test_config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                rust_log: "info".to_string(),
                json_logs: false,
                request_timeout_secs: 30,
            },
            database: DatabaseConfig {
                url: "postgres://localhost/test".to_string(),
                max_connections: 1,
            },
            redis: RedisConfig {
                url: "redis://localhost:6379".to_string(),
            },
            jwt: JwtConfig {
                secret: "unit-test-secret".to_string(),
                expiry_hours: 1,
                refresh_token_expiry_days: 1,
            },
            learning: LearningConfig::default(),
        }
    }

    #[test]
    fn test_password_hash_round_trip() {
        let hash = AuthService::hash_password("buenos-dias-42").unwrap();
        assert!(AuthService::verify_password("buenos-dias-42", &hash).unwrap());
        assert!(!AuthService::verify_password("buenas-noches", &hash).unwrap());
    }

    #[test]
    fn test_access_token_carries_role() {
        let config = test_config();
        let user = sample_user(roles::TEACHER);

        let (token, expires_in) = AuthService::generate_access_token(&user, &config).unwrap();
        assert_eq!(expires_in, 3600);

        let claims = AuthService::verify_token(&token, &config.jwt.secret).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.role, roles::TEACHER);
    }

    #[test]
    fn test_token_with_wrong_secret_is_rejected() {
        let config = test_config();
        let (token, _) =
            AuthService::generate_access_token(&sample_user(roles::STUDENT), &config).unwrap();

        let err = AuthService::verify_token(&token, "another-secret").unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }

    #[test]
    fn test_refresh_keys_never_embed_raw_token() {
        let hash = hash_string("raw-token");
        assert!(!refresh_key(&hash).contains("raw-token"));
    }
}
