//! Authentication middleware

use axum::{
    body::Body,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::{
    constants::{roles, security_events},
    error::AppError,
    models::SecurityEvent,
    services::{AuthService, SecurityLogService},
    state::AppState,
    utils::client_ip,
};

/// Authenticated user extracted from JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub username: String,
    pub role: String,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == roles::ADMIN
    }

    /// Teachers and admins may author courses
    pub fn can_author(&self) -> bool {
        roles::AUTHORS.contains(&self.role.as_str())
    }

    /// Fail with Forbidden unless the user holds one of `allowed`
    pub fn require_any_role(&self, allowed: &[&str]) -> Result<(), AppError> {
        if allowed.contains(&self.role.as_str()) {
            Ok(())
        } else {
            Err(AppError::Forbidden("Insufficient permissions".to_string()))
        }
    }

    /// `(id, role)` pair used for visibility checks
    pub fn viewer(&self) -> (&Uuid, &str) {
        (&self.id, self.role.as_str())
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// Optional authenticated user wrapper (never fails)
pub struct OptionalAuth(pub Option<AuthenticatedUser>);

impl OptionalAuth {
    pub fn viewer(&self) -> Option<(&Uuid, &str)> {
        self.0.as_ref().map(AuthenticatedUser::viewer)
    }
}

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuth(parts.extensions.get::<AuthenticatedUser>().cloned()))
    }
}

/// Verify a bearer token and build the user it names
pub fn authenticate_token(token: &str, secret: &str) -> Result<AuthenticatedUser, AppError> {
    let claims = AuthService::verify_token(token, secret)?;
    let id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)?;

    Ok(AuthenticatedUser {
        id,
        username: claims.username,
        role: claims.role,
    })
}

fn bearer_token(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    let Some(token) = bearer_token(&request) else {
        debug!(path = %path, "Auth failed: missing or malformed Authorization header");
        return Err(AppError::Unauthorized);
    };

    let user = authenticate_token(token, &state.config().jwt.secret).map_err(|e| {
        debug!(path = %path, error = ?e, "Auth failed: token verification failed");
        e
    })?;

    debug!(path = %path, user_id = %user.id, role = %user.role, "User authenticated");

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Optional authentication middleware (doesn't fail if no token)
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let user = bearer_token(&request)
        .and_then(|token| authenticate_token(token, &state.config().jwt.secret).ok());

    if let Some(user) = user {
        request.extensions_mut().insert(user);
    }

    next.run(request).await
}

/// Admin gate; must run after [`auth_middleware`]. Denials are audited.
pub async fn require_admin_middleware(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    if !user.is_admin() {
        SecurityLogService::record(
            state.db(),
            SecurityEvent::new(security_events::ACCESS_DENIED)
                .user(user.id)
                .ip(client_ip(request.headers()))
                .detail(format!("{} {}", request.method(), request.uri().path())),
        )
        .await;
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: &str) -> AuthenticatedUser {
        AuthenticatedUser {
            id: Uuid::new_v4(),
            username: "tester".to_string(),
            role: role.to_string(),
        }
    }

    #[test]
    fn test_role_predicates() {
        assert!(user(roles::ADMIN).is_admin());
        assert!(user(roles::ADMIN).can_author());
        assert!(user(roles::TEACHER).can_author());
        assert!(!user(roles::TEACHER).is_admin());
        assert!(!user(roles::STUDENT).can_author());
    }

    #[test]
    fn test_require_any_role() {
        assert!(user(roles::TEACHER).require_any_role(roles::AUTHORS).is_ok());
        assert!(matches!(
            user(roles::STUDENT).require_any_role(roles::AUTHORS),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(authenticate_token("not-a-jwt", "secret").is_err());
    }
}
