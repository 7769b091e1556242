//! Course handlers
//!
//! Course-scoped lesson, enrollment, progress and certificate routes are
//! mounted here and served by their own handler modules.

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::{
    handlers::{certificates, enrollments, lessons},
    state::AppState,
};

/// Course routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_courses).post(handler::create_course))
        .route(
            "/{id}",
            get(handler::get_course)
                .put(handler::update_course)
                .delete(handler::delete_course),
        )
        .route("/{id}/stats", get(handler::get_course_stats))
        .route("/{id}/enrollments", get(handler::list_course_enrollments))
        // Lessons
        .route(
            "/{id}/lessons",
            get(lessons::list_course_lessons).post(lessons::create_lesson),
        )
        .route("/{id}/lessons/reorder", put(lessons::reorder_lessons))
        // Enrollment and progress
        .route("/{id}/enroll", post(enrollments::enroll))
        .route("/{id}/drop", post(enrollments::drop_course))
        .route("/{id}/progress", get(enrollments::get_progress))
        // Certificates
        .route("/{id}/certificate", post(certificates::issue_certificate))
}
