//! LinguaLearn - Language Learning Platform
//!
//! This library provides the core functionality for the LinguaLearn API:
//! courses made of lessons and quizzes, enrollments, progress tracking and
//! verifiable completion certificates.
//!
//! # Features
//!
//! - JWT authentication with student, teacher and admin roles
//! - Course authoring with ordered lessons and graded quizzes
//! - Automatic course completion and certificate issuance
//! - Live progress events over WebSocket
//! - Security audit log
//!
//! # Architecture
//!
//! The application follows a layered architecture:
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Services**: Business logic
//! - **Repositories**: Database access
//! - **Models**: Domain models

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod realtime;
pub mod services;
pub mod state;
pub mod utils;

use std::time::Duration;

use axum::{
    Router,
    http::{Method, StatusCode, header},
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;

use constants::{API_BASE_PATH, MAX_REQUEST_BODY_BYTES};

/// Build the application router
///
/// Rate limiting needs the peer address and is layered on by the binary.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    let timeout = Duration::from_secs(state.config().server.request_timeout_secs);

    // Layers are applied bottom-up, so CORS and tracing wrap everything
    Router::new()
        .nest(API_BASE_PATH, handlers::routes(state.clone()))
        .layer(axum::middleware::from_fn(middleware::logging_middleware))
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_BYTES))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
