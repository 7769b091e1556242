//! Authentication handler implementations

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    middleware::auth::AuthenticatedUser,
    services::AuthService,
    state::AppState,
    utils::{
        client_ip,
        validation::{validate_password, validate_username},
    },
};

use super::{
    request::{LoginRequest, LogoutRequest, RefreshTokenRequest, RegisterRequest},
    response::{
        AuthResponse, CurrentUserResponse, LogoutResponse, RefreshResponse, RegisterResponse,
    },
};

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    // Validate request
    payload.validate()?;
    validate_username(&payload.username).map_err(|e| AppError::Validation(e.to_string()))?;
    validate_password(&payload.password).map_err(|e| AppError::Validation(e.to_string()))?;

    let user = AuthService::register(
        state.db(),
        &payload.username,
        &payload.email,
        &payload.password,
        payload.display_name.as_deref(),
        payload.role.as_deref(),
        client_ip(&headers),
    )
    .await?;

    let response = RegisterResponse {
        message: "User registered successfully".to_string(),
        user: user.into(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Login with username/email and password
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    // Validate request
    payload.validate()?;

    let (user, tokens) = AuthService::login(
        state.db(),
        state.redis().await?,
        state.config(),
        &payload.identifier,
        &payload.password,
        client_ip(&headers),
    )
    .await?;

    let response = AuthResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: tokens.expires_in,
        user: user.into(),
    };

    Ok(Json(response))
}

/// Exchange a refresh token for a new token pair
pub async fn refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<RefreshTokenRequest>,
) -> AppResult<Json<RefreshResponse>> {
    payload.validate()?;

    let tokens = AuthService::refresh_token(
        state.db(),
        state.redis().await?,
        state.config(),
        &payload.refresh_token,
        client_ip(&headers),
    )
    .await?;

    Ok(Json(tokens.into()))
}

/// Logout (invalidate refresh tokens)
pub async fn logout(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    headers: HeaderMap,
    payload: Option<Json<LogoutRequest>>,
) -> AppResult<Json<LogoutResponse>> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();

    AuthService::logout(
        state.db(),
        state.redis().await?,
        &auth_user.id,
        payload.refresh_token.as_deref(),
        payload.all_sessions.unwrap_or(false),
        client_ip(&headers),
    )
    .await?;

    Ok(Json(LogoutResponse {
        message: "Logged out successfully".to_string(),
    }))
}

/// Get current authenticated user
pub async fn get_current_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<CurrentUserResponse>> {
    let user = AuthService::get_user_by_id(state.db(), &auth_user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(CurrentUserResponse { user: user.into() }))
}
