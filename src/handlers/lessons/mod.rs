//! Lesson and quiz handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Lesson routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(handler::get_lesson)
                .put(handler::update_lesson)
                .delete(handler::delete_lesson),
        )
        .route("/{id}/complete", post(handler::complete_lesson))
        .route("/{id}/quiz", get(handler::get_quiz))
        .route("/{id}/quiz/submit", post(handler::submit_quiz))
}
