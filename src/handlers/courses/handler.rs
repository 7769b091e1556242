//! Course handler implementations

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    middleware::auth::{AuthenticatedUser, OptionalAuth},
    models::CourseStats,
    services::{CourseService, course_service::CourseQuery},
    state::AppState,
    utils::Pagination,
};

use super::{
    request::{CreateCourseRequest, ListCoursesQuery, PageQuery, UpdateCourseRequest},
    response::{CourseEnrollmentsResponse, CourseResponse, CoursesListResponse},
};

/// List courses visible to the caller
pub async fn list_courses(
    State(state): State<AppState>,
    auth: OptionalAuth,
    Query(query): Query<ListCoursesQuery>,
) -> AppResult<Json<CoursesListResponse>> {
    let pagination = Pagination::new(query.page, query.per_page);

    let (courses, total) = CourseService::list_courses(
        state.db(),
        pagination,
        CourseQuery {
            language: query.language.as_deref(),
            level: query.level.as_deref(),
            teacher_id: query.teacher_id,
            search: query.search.as_deref(),
            mine: query.mine.unwrap_or(false),
        },
        auth.viewer(),
    )
    .await?;

    Ok(Json(CoursesListResponse {
        courses: courses.into_iter().map(Into::into).collect(),
        total,
        page: pagination.page,
        per_page: pagination.per_page,
    }))
}

/// Create a new course
pub async fn create_course(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<CreateCourseRequest>,
) -> AppResult<(StatusCode, Json<CourseResponse>)> {
    payload.validate()?;

    let course = CourseService::create_course(
        state.db(),
        &state.config().learning,
        &auth_user.id,
        &auth_user.role,
        &payload.title,
        payload.description.as_deref(),
        &payload.language,
        &payload.level,
        payload.passing_score,
        payload.is_published,
    )
    .await?;

    let mut response = CourseResponse::from(course);
    response.teacher_name = Some(auth_user.username);

    Ok((StatusCode::CREATED, Json(response)))
}

/// Get a course
pub async fn get_course(
    State(state): State<AppState>,
    auth: OptionalAuth,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CourseResponse>> {
    let course = CourseService::get_course(state.db(), &id, auth.viewer()).await?;
    let teacher_name = CourseService::get_teacher_name(state.db(), &course).await?;

    let mut response = CourseResponse::from(course);
    response.teacher_name = Some(teacher_name);

    Ok(Json(response))
}

/// Update a course
pub async fn update_course(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCourseRequest>,
) -> AppResult<Json<CourseResponse>> {
    payload.validate()?;

    let course = CourseService::update_course(
        state.db(),
        &id,
        &auth_user.id,
        &auth_user.role,
        payload.title.as_deref(),
        payload.description.as_deref(),
        payload.language.as_deref(),
        payload.level.as_deref(),
        payload.passing_score,
        payload.is_published,
    )
    .await?;

    Ok(Json(course.into()))
}

/// Delete a course
pub async fn delete_course(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    CourseService::delete_course(state.db(), &id, &auth_user.id, &auth_user.role).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Enrollment and progress statistics
pub async fn get_course_stats(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CourseStats>> {
    let stats =
        CourseService::get_course_stats(state.db(), &id, &auth_user.id, &auth_user.role).await?;
    Ok(Json(stats))
}

/// Students enrolled in a course
pub async fn list_course_enrollments(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<CourseEnrollmentsResponse>> {
    let pagination = Pagination::new(query.page, query.per_page);

    let (students, total) = CourseService::list_enrollments(
        state.db(),
        &id,
        &auth_user.id,
        &auth_user.role,
        pagination,
    )
    .await?;

    Ok(Json(CourseEnrollmentsResponse {
        students,
        total,
        page: pagination.page,
        per_page: pagination.per_page,
    }))
}
