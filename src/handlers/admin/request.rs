//! Admin request DTOs

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Update user role request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRoleRequest {
    #[validate(length(min = 1))]
    pub role: String,
}

/// Suspend user request
#[derive(Debug, Default, Deserialize, Validate)]
pub struct SuspendUserRequest {
    #[validate(length(max = 500))]
    pub reason: Option<String>,
    /// Duration in hours (None = until reactivated)
    #[validate(range(min = 1, max = 87600))]
    pub duration_hours: Option<i64>,
}

/// Admin user listing query
#[derive(Debug, Deserialize)]
pub struct AdminListUsersQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
    pub role: Option<String>,
}

/// Security log query
#[derive(Debug, Deserialize)]
pub struct SecurityLogQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub user_id: Option<Uuid>,
    pub event_type: Option<String>,
}
