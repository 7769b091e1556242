//! Admin management handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Admin routes
pub fn routes() -> Router<AppState> {
    Router::new()
        // User management
        .route("/users", get(handler::list_all_users))
        .route("/users/{id}", delete(handler::delete_user))
        .route("/users/{id}/role", put(handler::update_user_role))
        .route("/users/{id}/suspend", post(handler::suspend_user))
        .route("/users/{id}/reactivate", post(handler::reactivate_user))
        // System
        .route("/stats", get(handler::get_system_stats))
        .route("/security-logs", get(handler::list_security_logs))
}
