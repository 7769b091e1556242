//! Progress service
//!
//! Every change to a learner's completion goes through [`ProgressService::record`],
//! which recomputes progress against the course's current lessons inside one
//! transaction. Reaching 100% completes the enrollment and issues the
//! certificate in that same transaction; events are published after commit.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::{
    config::LearningConfig,
    db::repositories::{CompletionRepository, CourseRepository, EnrollmentRepository, LessonRepository},
    error::{AppError, AppResult},
    models::{Certificate, Completion, QuizGrade},
    realtime::{RealtimeHub, ServerMessage},
    services::{CertificateService, EnrollmentService, LessonService},
};

/// Outcome of a progress update
#[derive(Debug)]
pub struct ProgressChange {
    pub completion: Completion,
    /// This update finished the course
    pub course_completed: bool,
    /// Certificate created by this update
    pub certificate: Option<Certificate>,
}

/// Outcome of a graded quiz attempt
#[derive(Debug)]
pub struct QuizAttempt {
    pub grade: QuizGrade,
    /// Best percentage on this quiz so far, this attempt included
    pub best_percentage: i32,
    pub completion: Completion,
}

/// Progress service for business logic
pub struct ProgressService;

impl ProgressService {
    /// Mark a lesson without a quiz as completed
    pub async fn complete_lesson(
        pool: &PgPool,
        learning: &LearningConfig,
        realtime: &RealtimeHub,
        user_id: &Uuid,
        lesson_id: &Uuid,
    ) -> AppResult<Completion> {
        let lesson = LessonService::find_lesson(pool, lesson_id).await?;
        EnrollmentService::require_active(pool, user_id, &lesson.course_id).await?;

        if lesson.has_quiz() {
            return Err(AppError::Validation(
                "This lesson is completed by passing its quiz".to_string(),
            ));
        }

        let mut newly_marked = false;
        let change = Self::record(pool, learning, user_id, &lesson.course_id, |completion| {
            newly_marked = completion.mark_lesson(lesson.id);
        })
        .await?;

        if newly_marked {
            info!(user_id = %user_id, lesson_id = %lesson.id, progress = change.completion.progress, "Lesson completed");
            realtime.publish(
                lesson.course_id,
                ServerMessage::LessonCompleted {
                    course_id: lesson.course_id,
                    user_id: *user_id,
                    lesson_id: lesson.id,
                    progress: change.completion.progress,
                },
            );
        }
        Self::announce(realtime, &change);

        Ok(change.completion)
    }

    /// Grade a quiz attempt; a passing attempt completes the lesson
    pub async fn submit_quiz(
        pool: &PgPool,
        learning: &LearningConfig,
        realtime: &RealtimeHub,
        user_id: &Uuid,
        lesson_id: &Uuid,
        answers: &HashMap<String, usize>,
    ) -> AppResult<QuizAttempt> {
        let lesson = LessonService::find_lesson(pool, lesson_id).await?;
        let quiz = lesson
            .quiz
            .as_ref()
            .ok_or_else(|| AppError::NotFound("Lesson has no quiz".to_string()))?;

        EnrollmentService::require_active(pool, user_id, &lesson.course_id).await?;

        let course = CourseRepository::find_by_id(pool, &lesson.course_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

        let grade = quiz.0.grade(answers, course.passing_score);

        let mut best_percentage = grade.percentage;
        let mut newly_marked = false;
        let change = Self::record(pool, learning, user_id, &course.id, |completion| {
            best_percentage = completion.record_quiz_score(lesson.id, grade.percentage);
            if grade.passed {
                newly_marked = completion.mark_lesson(lesson.id);
            }
        })
        .await?;

        info!(
            user_id = %user_id,
            lesson_id = %lesson.id,
            percentage = grade.percentage,
            passed = grade.passed,
            best = best_percentage,
            "Quiz submitted"
        );
        realtime.publish(
            course.id,
            ServerMessage::QuizSubmitted {
                course_id: course.id,
                user_id: *user_id,
                lesson_id: lesson.id,
                percentage: grade.percentage,
                passed: grade.passed,
            },
        );
        if newly_marked {
            realtime.publish(
                course.id,
                ServerMessage::LessonCompleted {
                    course_id: course.id,
                    user_id: *user_id,
                    lesson_id: lesson.id,
                    progress: change.completion.progress,
                },
            );
        }
        Self::announce(realtime, &change);

        Ok(QuizAttempt {
            grade,
            best_percentage,
            completion: change.completion,
        })
    }

    /// The caller's progress in a course, recomputed against its current lessons
    pub async fn get_progress(
        pool: &PgPool,
        learning: &LearningConfig,
        realtime: &RealtimeHub,
        user_id: &Uuid,
        course_id: &Uuid,
    ) -> AppResult<Completion> {
        EnrollmentRepository::find(pool, user_id, course_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Not enrolled in this course".to_string()))?;

        let change = Self::record(pool, learning, user_id, course_id, |_| {}).await?;
        Self::announce(realtime, &change);

        Ok(change.completion)
    }

    /// Apply `update` to the learner's completion and recompute progress
    async fn record<F>(
        pool: &PgPool,
        learning: &LearningConfig,
        user_id: &Uuid,
        course_id: &Uuid,
        update: F,
    ) -> AppResult<ProgressChange>
    where
        F: FnOnce(&mut Completion),
    {
        let mut tx = pool.begin().await?;

        let mut completion = CompletionRepository::find_or_create(&mut *tx, user_id, course_id).await?;
        let lesson_ids = LessonRepository::ordered_ids(&mut *tx, course_id).await?;

        update(&mut completion);
        let course_completed = completion.apply_progress(&lesson_ids, Utc::now());
        let completion = CompletionRepository::save(&mut *tx, &completion).await?;

        let mut certificate = None;
        if course_completed {
            EnrollmentRepository::mark_completed(&mut *tx, user_id, course_id).await?;

            let (issued, created) =
                CertificateService::issue_for_completion(&mut *tx, learning, &completion).await?;
            if created {
                certificate = Some(issued);
            }

            info!(user_id = %user_id, course_id = %course_id, score = ?completion.score, "Course completed");
        }

        tx.commit().await?;

        Ok(ProgressChange {
            completion,
            course_completed,
            certificate,
        })
    }

    /// Publish course-level events after commit
    fn announce(realtime: &RealtimeHub, change: &ProgressChange) {
        let course_id = change.completion.course_id;
        let user_id = change.completion.user_id;

        if change.course_completed {
            realtime.publish(course_id, ServerMessage::CourseCompleted { course_id, user_id });
        }
        if let Some(certificate) = &change.certificate {
            realtime.publish(
                course_id,
                ServerMessage::CertificateIssued {
                    course_id,
                    user_id,
                    certificate_id: certificate.id,
                },
            );
        }
    }
}
