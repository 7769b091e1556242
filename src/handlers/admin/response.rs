//! Admin response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{SecurityLog, User};

/// User details visible to admins
#[derive(Debug, Serialize)]
pub struct AdminUserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub role: String,
    pub is_suspended: bool,
    pub suspension_reason: Option<String>,
    pub suspended_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<User> for AdminUserResponse {
    fn from(user: User) -> Self {
        // An expired suspension no longer counts
        let is_suspended = user.is_currently_suspended();
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            display_name: user.display_name,
            role: user.role,
            is_suspended,
            suspension_reason: user.suspension_reason,
            suspended_until: user.suspended_until,
            created_at: user.created_at,
            last_login_at: user.last_login_at,
        }
    }
}

/// Admin users list response
#[derive(Debug, Serialize)]
pub struct AdminUsersListResponse {
    pub users: Vec<AdminUserResponse>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

/// Security log entry
#[derive(Debug, Serialize)]
pub struct SecurityLogResponse {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub event_type: String,
    pub ip_address: Option<String>,
    pub detail: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<SecurityLog> for SecurityLogResponse {
    fn from(entry: SecurityLog) -> Self {
        Self {
            id: entry.id,
            user_id: entry.user_id,
            event_type: entry.event_type,
            ip_address: entry.ip_address,
            detail: entry.detail,
            created_at: entry.created_at,
        }
    }
}

/// Security log page
#[derive(Debug, Serialize)]
pub struct SecurityLogListResponse {
    pub entries: Vec<SecurityLogResponse>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

/// Generic message response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
