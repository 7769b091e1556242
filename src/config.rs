//! Application configuration management
//!
//! This module handles loading and validating configuration from environment variables.
//! All configuration is loaded at startup and validated before the application runs.

use std::env;

use crate::constants::{
    DEFAULT_CERTIFICATE_CODE_PREFIX, DEFAULT_DATABASE_MAX_CONNECTIONS, DEFAULT_JWT_EXPIRY_HOURS,
    DEFAULT_PASSING_SCORE, DEFAULT_REDIS_URL, DEFAULT_REFRESH_TOKEN_EXPIRY_DAYS,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
};

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub learning: LearningConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
    /// Emit JSON log lines instead of the human-readable format
    pub json_logs: bool,
    pub request_timeout_secs: u64,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
}

/// JWT authentication configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiry_hours: i64,
    pub refresh_token_expiry_days: i64,
}

/// Course, quiz and certificate defaults
#[derive(Debug, Clone)]
pub struct LearningConfig {
    /// Passing score applied to new courses that don't set one
    pub default_passing_score: i32,
    /// Prefix of certificate verification codes
    pub certificate_code_prefix: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            redis: RedisConfig::from_env()?,
            jwt: JwtConfig::from_env()?,
            learning: LearningConfig::from_env()?,
        })
    }
}

/// Read an optional variable and parse it, falling back to `default`
fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        Err(_) => Ok(default),
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            port: parse_var("SERVER_PORT", DEFAULT_SERVER_PORT)?,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            json_logs: env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
            request_timeout_secs: parse_var("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
        })
    }
}

impl DatabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL".to_string()))?,
            max_connections: parse_var(
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_DATABASE_MAX_CONNECTIONS,
            )?,
        })
    }
}

impl RedisConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string()),
        })
    }
}

impl JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            secret: env::var("JWT_SECRET")
                .map_err(|_| ConfigError::Missing("JWT_SECRET".to_string()))?,
            expiry_hours: parse_var("JWT_EXPIRY_HOURS", DEFAULT_JWT_EXPIRY_HOURS)?,
            refresh_token_expiry_days: parse_var(
                "REFRESH_TOKEN_EXPIRY_DAYS",
                DEFAULT_REFRESH_TOKEN_EXPIRY_DAYS,
            )?,
        })
    }
}

impl LearningConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let default_passing_score = parse_var("DEFAULT_PASSING_SCORE", DEFAULT_PASSING_SCORE)?;
        if !(0..=100).contains(&default_passing_score) {
            return Err(ConfigError::InvalidValue("DEFAULT_PASSING_SCORE".to_string()));
        }

        let certificate_code_prefix = env::var("CERTIFICATE_CODE_PREFIX")
            .unwrap_or_else(|_| DEFAULT_CERTIFICATE_CODE_PREFIX.to_string());
        if certificate_code_prefix.is_empty()
            || !certificate_code_prefix
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        {
            return Err(ConfigError::InvalidValue("CERTIFICATE_CODE_PREFIX".to_string()));
        }

        Ok(Self {
            default_passing_score,
            certificate_code_prefix,
        })
    }
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            default_passing_score: DEFAULT_PASSING_SCORE,
            certificate_code_prefix: DEFAULT_CERTIFICATE_CODE_PREFIX.to_string(),
        }
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let learning = LearningConfig::default();
        assert_eq!(learning.default_passing_score, 70);
        assert_eq!(learning.certificate_code_prefix, "LL");
    }

    #[test]
    fn test_parse_var_falls_back_to_default() {
        let port: u16 = parse_var("LINGUALEARN_TEST_UNSET_PORT", 9090).unwrap();
        assert_eq!(port, 9090);
    }
}
