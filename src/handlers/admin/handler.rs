//! Admin handler implementations
//!
//! Every route here sits behind `auth_middleware` and `require_admin_middleware`.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    models::SystemStats,
    services::{AdminService, SecurityLogService},
    state::AppState,
    utils::{Pagination, client_ip},
};

use super::{
    request::{AdminListUsersQuery, SecurityLogQuery, SuspendUserRequest, UpdateUserRoleRequest},
    response::{
        AdminUserResponse, AdminUsersListResponse, MessageResponse, SecurityLogListResponse,
    },
};

/// List all users with admin details
pub async fn list_all_users(
    State(state): State<AppState>,
    Query(query): Query<AdminListUsersQuery>,
) -> AppResult<Json<AdminUsersListResponse>> {
    let pagination = Pagination::new(query.page, query.per_page);

    let (users, total) = AdminService::list_all_users(
        state.db(),
        pagination,
        query.search.as_deref(),
        query.role.as_deref(),
    )
    .await?;

    Ok(Json(AdminUsersListResponse {
        users: users.into_iter().map(Into::into).collect(),
        total,
        page: pagination.page,
        per_page: pagination.per_page,
    }))
}

/// Update a user's role
pub async fn update_user_role(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRoleRequest>,
) -> AppResult<Json<AdminUserResponse>> {
    payload.validate()?;

    let user = AdminService::update_user_role(
        state.db(),
        &auth_user.id,
        &id,
        &payload.role,
        client_ip(&headers),
    )
    .await?;

    Ok(Json(user.into()))
}

/// Suspend a user
pub async fn suspend_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    payload: Option<Json<SuspendUserRequest>>,
) -> AppResult<Json<MessageResponse>> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    payload.validate()?;

    AdminService::suspend_user(
        state.db(),
        &auth_user.id,
        &id,
        payload.reason.as_deref(),
        payload.duration_hours,
        client_ip(&headers),
    )
    .await?;

    Ok(Json(MessageResponse {
        message: "User suspended".to_string(),
    }))
}

/// Lift a user's suspension
pub async fn reactivate_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    AdminService::reactivate_user(state.db(), &auth_user.id, &id, client_ip(&headers)).await?;

    Ok(Json(MessageResponse {
        message: "User reactivated".to_string(),
    }))
}

/// Delete a user
pub async fn delete_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    AdminService::delete_user(state.db(), &auth_user.id, &id, client_ip(&headers)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get system statistics
pub async fn get_system_stats(
    State(state): State<AppState>,
) -> AppResult<Json<SystemStats>> {
    let stats =
        AdminService::get_system_stats(state.db(), state.realtime().connection_count()).await?;
    Ok(Json(stats))
}

/// List security log entries
pub async fn list_security_logs(
    State(state): State<AppState>,
    Query(query): Query<SecurityLogQuery>,
) -> AppResult<Json<SecurityLogListResponse>> {
    let pagination = Pagination::new(query.page, query.per_page);

    let (entries, total) = SecurityLogService::list(
        state.db(),
        pagination,
        query.user_id,
        query.event_type.as_deref(),
    )
    .await?;

    Ok(Json(SecurityLogListResponse {
        entries: entries.into_iter().map(Into::into).collect(),
        total,
        page: pagination.page,
        per_page: pagination.per_page,
    }))
}
