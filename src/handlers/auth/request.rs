//! Authentication request DTOs

use serde::Deserialize;
use validator::Validate;

use crate::constants::{MAX_PASSWORD_LENGTH, MAX_USERNAME_LENGTH, MIN_PASSWORD_LENGTH, MIN_USERNAME_LENGTH};

/// User registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = MIN_USERNAME_LENGTH, max = MAX_USERNAME_LENGTH))]
    pub username: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = MIN_PASSWORD_LENGTH, max = MAX_PASSWORD_LENGTH))]
    pub password: String,

    #[validate(length(max = 100))]
    pub display_name: Option<String>,

    /// `student` (default) or `teacher`
    pub role: Option<String>,
}

/// User login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Can be either username or email
    #[validate(length(min = 1))]
    pub identifier: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Token refresh request
#[derive(Debug, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

/// Logout request
#[derive(Debug, Default, Deserialize)]
pub struct LogoutRequest {
    /// Refresh token of the session being closed
    pub refresh_token: Option<String>,
    /// Revoke every session of the user
    pub all_sessions: Option<bool>,
}
