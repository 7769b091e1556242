//! HTTP Request Handlers
//!
//! This module contains all HTTP request handlers organized by domain.

pub mod admin;
pub mod auth;
pub mod certificates;
pub mod courses;
pub mod enrollments;
pub mod health;
pub mod lessons;
pub mod realtime;
pub mod users;

use axum::{Router, middleware, routing::get};

use crate::{
    middleware::{auth_middleware, optional_auth_middleware, require_admin_middleware},
    state::AppState,
};

/// Create all API routes
///
/// A valid bearer token, when present, is attached to every request. Handlers
/// that need a user reject anonymous callers through the extractor.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .nest("/auth", auth::routes())
        .nest("/users", users::routes())
        .nest("/courses", courses::routes())
        .nest("/lessons", lessons::routes())
        .nest("/enrollments", enrollments::routes())
        .nest("/certificates", certificates::routes())
        .route("/ws", get(realtime::ws_handler))
        .nest(
            "/admin",
            admin::routes()
                // Layers run bottom-up: authenticate, then check the role
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    require_admin_middleware,
                ))
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth_middleware,
                )),
        )
        .layer(middleware::from_fn_with_state(
            state,
            optional_auth_middleware,
        ))
}
