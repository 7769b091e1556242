//! Enrollment service

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::{
    constants::enrollment_status,
    db::repositories::{CompletionRepository, CourseRepository, EnrollmentRepository},
    error::{AppError, AppResult},
    models::{Enrollment, EnrollmentStatus, MyEnrollment},
};

/// Enrollment service for business logic
pub struct EnrollmentService;

impl EnrollmentService {
    /// Enroll the caller in a published course. A dropped enrollment is
    /// reactivated, or restored to completed when the course was finished.
    pub async fn enroll(pool: &PgPool, user_id: &Uuid, course_id: &Uuid) -> AppResult<Enrollment> {
        let course = CourseRepository::find_by_id(pool, course_id)
            .await?
            .filter(|c| c.is_published)
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

        let enrollment = match EnrollmentRepository::find(pool, user_id, &course.id).await? {
            Some(existing) if existing.status() == Some(EnrollmentStatus::Dropped) => {
                let finished = CompletionRepository::find(pool, user_id, &course.id)
                    .await?
                    .is_some_and(|c| c.is_completed);
                let status = EnrollmentStatus::on_reenroll(finished);
                EnrollmentRepository::set_status(pool, user_id, &course.id, status.as_str()).await?
            }
            Some(_) => {
                return Err(AppError::Conflict(
                    "Already enrolled in this course".to_string(),
                ));
            }
            None => EnrollmentRepository::create(pool, user_id, &course.id).await?,
        };

        info!(user_id = %user_id, course_id = %course_id, "Enrolled in course");
        Ok(enrollment)
    }

    /// Leave a course
    pub async fn drop_course(pool: &PgPool, user_id: &Uuid, course_id: &Uuid) -> AppResult<Enrollment> {
        let enrollment = EnrollmentRepository::find(pool, user_id, course_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Not enrolled in this course".to_string()))?;

        match enrollment.status() {
            Some(status) if status.can_drop() => {}
            Some(status) => {
                return Err(AppError::Conflict(format!(
                    "Cannot drop a {} enrollment",
                    status
                )));
            }
            None => {
                return Err(AppError::Internal(anyhow::anyhow!(
                    "Unknown enrollment status: {}",
                    enrollment.status
                )));
            }
        }

        let enrollment =
            EnrollmentRepository::set_status(pool, user_id, course_id, enrollment_status::DROPPED)
                .await?;

        info!(user_id = %user_id, course_id = %course_id, "Dropped course");
        Ok(enrollment)
    }

    /// The caller's enrollments, newest first
    pub async fn my_enrollments(
        pool: &PgPool,
        user_id: &Uuid,
        status: Option<&str>,
    ) -> AppResult<Vec<MyEnrollment>> {
        if let Some(status) = status {
            if EnrollmentStatus::from_str(status).is_none() {
                return Err(AppError::Validation(format!("Unknown status: {}", status)));
            }
        }

        EnrollmentRepository::list_for_user(pool, user_id, status).await
    }

    /// Whether a user may follow a course's live events: enrolled learners
    /// plus the people who manage the course
    pub async fn can_follow(
        pool: &PgPool,
        user_id: &Uuid,
        role: &str,
        course_id: &Uuid,
    ) -> AppResult<bool> {
        let Some(course) = CourseRepository::find_by_id(pool, course_id).await? else {
            return Ok(false);
        };
        if course.can_manage(user_id, role) {
            return Ok(true);
        }

        Ok(EnrollmentRepository::find(pool, user_id, course_id)
            .await?
            .is_some())
    }

    /// Require an active enrollment before learning activity
    pub async fn require_active(
        pool: &PgPool,
        user_id: &Uuid,
        course_id: &Uuid,
    ) -> AppResult<Enrollment> {
        EnrollmentRepository::find(pool, user_id, course_id)
            .await?
            .filter(Enrollment::is_active)
            .ok_or_else(|| {
                AppError::Forbidden("An active enrollment in this course is required".to_string())
            })
    }
}
