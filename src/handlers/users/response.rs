//! User response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::User;

/// User public profile response
#[derive(Debug, Serialize)]
pub struct UserProfileResponse {
    pub id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            display_name: user.display_name,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// User list response
#[derive(Debug, Serialize)]
pub struct UsersListResponse {
    pub users: Vec<UserProfileResponse>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}
