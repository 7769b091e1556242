//! User handler implementations

use axum::{
    Json,
    extract::{Path, Query, State},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    services::UserService,
    state::AppState,
    utils::Pagination,
};

use super::{
    request::{ListUsersQuery, UpdateUserRequest},
    response::{UserProfileResponse, UsersListResponse},
};

/// List users (paginated)
pub async fn list_users(
    State(state): State<AppState>,
    _auth_user: AuthenticatedUser,
    Query(query): Query<ListUsersQuery>,
) -> AppResult<Json<UsersListResponse>> {
    let pagination = Pagination::new(query.page, query.per_page);

    let (users, total) = UserService::list_users(
        state.db(),
        pagination,
        query.search.as_deref(),
        query.role.as_deref(),
    )
    .await?;

    Ok(Json(UsersListResponse {
        users: users.into_iter().map(Into::into).collect(),
        total,
        page: pagination.page,
        per_page: pagination.per_page,
    }))
}

/// Get a specific user by ID
pub async fn get_user(
    State(state): State<AppState>,
    _auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserProfileResponse>> {
    let user = UserService::get_user_by_id(state.db(), &id).await?;
    Ok(Json(user.into()))
}

/// Update user profile
pub async fn update_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> AppResult<Json<UserProfileResponse>> {
    // Validate request
    payload.validate()?;

    // Users can only update their own profile (unless admin)
    let user = UserService::update_user(
        state.db(),
        &auth_user.id,
        &id,
        &auth_user.role,
        payload.display_name.as_deref(),
        payload.email.as_deref(),
        payload.current_password.as_deref(),
        payload.new_password.as_deref(),
    )
    .await?;

    Ok(Json(user.into()))
}
