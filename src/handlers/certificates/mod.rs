//! Certificate handlers

mod handler;
pub mod response;

pub use handler::*;
pub use response::*;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Certificate routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(handler::my_certificates))
        .route("/verify/{code}", get(handler::verify_certificate))
        .route("/{id}", get(handler::get_certificate))
}
