//! Enrollment handler implementations

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    services::{EnrollmentService, ProgressService},
    state::AppState,
};

use super::{
    request::MyEnrollmentsQuery,
    response::{EnrollmentResponse, MyEnrollmentsResponse, ProgressResponse},
};

/// Enroll in a course
pub async fn enroll(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(course_id): Path<Uuid>,
) -> AppResult<(StatusCode, Json<EnrollmentResponse>)> {
    let enrollment = EnrollmentService::enroll(state.db(), &auth_user.id, &course_id).await?;
    Ok((StatusCode::CREATED, Json(enrollment.into())))
}

/// Drop a course
pub async fn drop_course(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(course_id): Path<Uuid>,
) -> AppResult<Json<EnrollmentResponse>> {
    let enrollment = EnrollmentService::drop_course(state.db(), &auth_user.id, &course_id).await?;
    Ok(Json(enrollment.into()))
}

/// The caller's progress in a course
pub async fn get_progress(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(course_id): Path<Uuid>,
) -> AppResult<Json<ProgressResponse>> {
    let completion = ProgressService::get_progress(
        state.db(),
        &state.config().learning,
        state.realtime(),
        &auth_user.id,
        &course_id,
    )
    .await?;

    Ok(Json(completion.into()))
}

/// The caller's enrollments
pub async fn my_enrollments(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Query(query): Query<MyEnrollmentsQuery>,
) -> AppResult<Json<MyEnrollmentsResponse>> {
    let enrollments =
        EnrollmentService::my_enrollments(state.db(), &auth_user.id, query.status.as_deref())
            .await?;

    Ok(Json(MyEnrollmentsResponse { enrollments }))
}
