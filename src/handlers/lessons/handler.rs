//! Lesson handler implementations

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    handlers::enrollments::response::ProgressResponse,
    middleware::auth::{AuthenticatedUser, OptionalAuth},
    models::{Course, QuizView},
    services::{LessonService, ProgressService},
    state::AppState,
};

use super::{
    request::{CreateLessonRequest, ReorderLessonsRequest, SubmitQuizRequest, UpdateLessonRequest},
    response::{LessonResponse, LessonsListResponse, QuizResultResponse},
};

fn can_see_answers(course: &Course, auth: &OptionalAuth) -> bool {
    auth.0
        .as_ref()
        .is_some_and(|user| course.can_manage(&user.id, &user.role))
}

/// Lessons of a course in order
pub async fn list_course_lessons(
    State(state): State<AppState>,
    auth: OptionalAuth,
    Path(course_id): Path<Uuid>,
) -> AppResult<Json<LessonsListResponse>> {
    let (course, lessons) =
        LessonService::list_lessons(state.db(), &course_id, auth.viewer()).await?;
    let with_answers = can_see_answers(&course, &auth);

    Ok(Json(LessonsListResponse {
        course_id: course.id,
        lessons: lessons
            .into_iter()
            .map(|lesson| LessonResponse::new(lesson, with_answers))
            .collect(),
    }))
}

/// Add a lesson to a course
pub async fn create_lesson(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(course_id): Path<Uuid>,
    Json(payload): Json<CreateLessonRequest>,
) -> AppResult<(StatusCode, Json<LessonResponse>)> {
    payload.validate()?;

    let lesson = LessonService::create_lesson(
        state.db(),
        &course_id,
        &auth_user.id,
        &auth_user.role,
        &payload.title,
        &payload.content,
        payload.position,
        payload.quiz.as_ref(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(LessonResponse::new(lesson, true))))
}

/// Reorder the lessons of a course
pub async fn reorder_lessons(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(course_id): Path<Uuid>,
    Json(payload): Json<ReorderLessonsRequest>,
) -> AppResult<Json<LessonsListResponse>> {
    let lessons = LessonService::reorder_lessons(
        state.db(),
        &course_id,
        &auth_user.id,
        &auth_user.role,
        &payload.lesson_ids,
    )
    .await?;

    Ok(Json(LessonsListResponse {
        course_id,
        lessons: lessons
            .into_iter()
            .map(|lesson| LessonResponse::new(lesson, true))
            .collect(),
    }))
}

/// Get a lesson
pub async fn get_lesson(
    State(state): State<AppState>,
    auth: OptionalAuth,
    Path(id): Path<Uuid>,
) -> AppResult<Json<LessonResponse>> {
    let (course, lesson) = LessonService::get_lesson(state.db(), &id, auth.viewer()).await?;
    let with_answers = can_see_answers(&course, &auth);

    Ok(Json(LessonResponse::new(lesson, with_answers)))
}

/// Update a lesson
pub async fn update_lesson(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLessonRequest>,
) -> AppResult<Json<LessonResponse>> {
    payload.validate()?;

    let quiz = match (&payload.quiz, payload.remove_quiz) {
        (Some(quiz), _) => Some(Some(quiz)),
        (None, true) => Some(None),
        (None, false) => None,
    };

    let lesson = LessonService::update_lesson(
        state.db(),
        &id,
        &auth_user.id,
        &auth_user.role,
        payload.title.as_deref(),
        payload.content.as_deref(),
        quiz,
    )
    .await?;

    Ok(Json(LessonResponse::new(lesson, true)))
}

/// Delete a lesson
pub async fn delete_lesson(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    LessonService::delete_lesson(state.db(), &id, &auth_user.id, &auth_user.role).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Mark a lesson without a quiz as completed
pub async fn complete_lesson(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ProgressResponse>> {
    let completion = ProgressService::complete_lesson(
        state.db(),
        &state.config().learning,
        state.realtime(),
        &auth_user.id,
        &id,
    )
    .await?;

    Ok(Json(completion.into()))
}

/// Get a lesson's quiz without the answer key
pub async fn get_quiz(
    State(state): State<AppState>,
    auth: OptionalAuth,
    Path(id): Path<Uuid>,
) -> AppResult<Json<QuizView>> {
    let quiz = LessonService::get_quiz(state.db(), &id, auth.viewer()).await?;
    Ok(Json(quiz))
}

/// Submit answers to a lesson's quiz
pub async fn submit_quiz(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubmitQuizRequest>,
) -> AppResult<Json<QuizResultResponse>> {
    let attempt = ProgressService::submit_quiz(
        state.db(),
        &state.config().learning,
        state.realtime(),
        &auth_user.id,
        &id,
        &payload.answers,
    )
    .await?;

    Ok(Json(QuizResultResponse {
        lesson_id: id,
        earned_points: attempt.grade.earned_points,
        total_points: attempt.grade.total_points,
        percentage: attempt.grade.percentage,
        passed: attempt.grade.passed,
        best_percentage: attempt.best_percentage,
        results: attempt.grade.results,
        progress: attempt.completion.progress,
        course_completed: attempt.completion.is_completed,
    }))
}
