//! Lesson service

use std::collections::HashSet;

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::{
    db::repositories::LessonRepository,
    error::{AppError, AppResult},
    models::{Course, Lesson, Quiz, QuizView},
    services::{CourseService, course_service::Viewer},
    utils::validation::sanitize_string,
};

/// Lesson service for business logic
pub struct LessonService;

impl LessonService {
    /// Add a lesson to a course
    #[allow(clippy::too_many_arguments)]
    pub async fn create_lesson(
        pool: &PgPool,
        course_id: &Uuid,
        user_id: &Uuid,
        role: &str,
        title: &str,
        content: &str,
        position: Option<i32>,
        quiz: Option<&Quiz>,
    ) -> AppResult<Lesson> {
        CourseService::get_managed_course(pool, course_id, user_id, role).await?;

        let title = sanitize_string(title);
        if title.is_empty() {
            return Err(AppError::Validation("Title cannot be empty".to_string()));
        }
        if let Some(quiz) = quiz {
            quiz.validate().map_err(AppError::Validation)?;
        }

        let lesson =
            LessonRepository::create(pool, course_id, &title, content, position, quiz).await?;

        info!(
            lesson_id = %lesson.id,
            course_id = %course_id,
            position = lesson.position,
            has_quiz = lesson.has_quiz(),
            "Lesson created"
        );
        Ok(lesson)
    }

    /// Lessons of a course in position order
    pub async fn list_lessons(
        pool: &PgPool,
        course_id: &Uuid,
        viewer: Viewer<'_>,
    ) -> AppResult<(Course, Vec<Lesson>)> {
        let course = CourseService::get_course(pool, course_id, viewer).await?;
        let lessons = LessonRepository::list_by_course(pool, course_id).await?;
        Ok((course, lessons))
    }

    /// Get a lesson together with its course
    pub async fn get_lesson(
        pool: &PgPool,
        id: &Uuid,
        viewer: Viewer<'_>,
    ) -> AppResult<(Course, Lesson)> {
        let lesson = Self::find_lesson(pool, id).await?;
        let course = CourseService::get_course(pool, &lesson.course_id, viewer).await?;

        Ok((course, lesson))
    }

    /// The quiz of a lesson without its answer key
    pub async fn get_quiz(pool: &PgPool, id: &Uuid, viewer: Viewer<'_>) -> AppResult<QuizView> {
        let (_, lesson) = Self::get_lesson(pool, id, viewer).await?;

        lesson
            .quiz
            .map(|quiz| quiz.0.view())
            .ok_or_else(|| AppError::NotFound("Lesson has no quiz".to_string()))
    }

    /// Update lesson content. `quiz` of `Some(None)` removes the quiz.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_lesson(
        pool: &PgPool,
        id: &Uuid,
        user_id: &Uuid,
        role: &str,
        title: Option<&str>,
        content: Option<&str>,
        quiz: Option<Option<&Quiz>>,
    ) -> AppResult<Lesson> {
        let lesson = Self::find_managed_lesson(pool, id, user_id, role).await?;

        let title = title.map(sanitize_string);
        if title.as_deref() == Some("") {
            return Err(AppError::Validation("Title cannot be empty".to_string()));
        }
        if let Some(Some(quiz)) = quiz {
            quiz.validate().map_err(AppError::Validation)?;
        }

        let updated =
            LessonRepository::update(pool, &lesson.id, title.as_deref(), content, quiz).await?;

        info!(lesson_id = %id, user_id = %user_id, "Lesson updated");
        Ok(updated)
    }

    /// Delete a lesson; later lessons move up
    pub async fn delete_lesson(pool: &PgPool, id: &Uuid, user_id: &Uuid, role: &str) -> AppResult<()> {
        let lesson = Self::find_managed_lesson(pool, id, user_id, role).await?;
        LessonRepository::delete(pool, &lesson).await?;

        info!(lesson_id = %id, course_id = %lesson.course_id, "Lesson deleted");
        Ok(())
    }

    /// Reorder every lesson of a course
    pub async fn reorder_lessons(
        pool: &PgPool,
        course_id: &Uuid,
        user_id: &Uuid,
        role: &str,
        ordered_ids: &[Uuid],
    ) -> AppResult<Vec<Lesson>> {
        CourseService::get_managed_course(pool, course_id, user_id, role).await?;

        LessonRepository::reorder(pool, course_id, ordered_ids, |current| {
            if is_permutation(current, ordered_ids) {
                Ok(())
            } else {
                Err(AppError::Validation(
                    "Lesson order must list every lesson of the course exactly once".to_string(),
                ))
            }
        })
        .await?;

        info!(course_id = %course_id, lessons = ordered_ids.len(), "Lessons reordered");
        LessonRepository::list_by_course(pool, course_id).await
    }

    pub(crate) async fn find_lesson(pool: &PgPool, id: &Uuid) -> AppResult<Lesson> {
        LessonRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Lesson not found".to_string()))
    }

    async fn find_managed_lesson(
        pool: &PgPool,
        id: &Uuid,
        user_id: &Uuid,
        role: &str,
    ) -> AppResult<Lesson> {
        let lesson = Self::find_lesson(pool, id).await?;
        CourseService::get_managed_course(pool, &lesson.course_id, user_id, role).await?;
        Ok(lesson)
    }
}

/// Whether `requested` names every id of `current` exactly once
fn is_permutation(current: &[Uuid], requested: &[Uuid]) -> bool {
    if current.len() != requested.len() {
        return false;
    }

    let current: HashSet<&Uuid> = current.iter().collect();
    let mut seen = HashSet::with_capacity(requested.len());
    requested
        .iter()
        .all(|id| current.contains(id) && seen.insert(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permutation_accepts_reordering() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();

        assert!(is_permutation(&[a, b, c], &[c, a, b]));
        assert!(is_permutation(&[], &[]));
    }

    #[test]
    fn test_permutation_rejects_missing_foreign_and_duplicate_ids() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        assert!(!is_permutation(&[a, b], &[a]));
        assert!(!is_permutation(&[a, b], &[a, Uuid::new_v4()]));
        assert!(!is_permutation(&[a, b], &[a, a]));
        assert!(!is_permutation(&[a], &[a, b]));
    }
}
