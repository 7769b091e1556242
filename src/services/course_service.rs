//! Course service

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::{
    config::LearningConfig,
    constants::{enrollment_status, roles},
    db::repositories::{
        CompletionRepository, CourseFilter, CourseRepository, EnrollmentRepository,
        LessonRepository,
    },
    error::{AppError, AppResult},
    models::{Course, CourseStats, EnrolledStudent},
    utils::{
        Pagination,
        validation::{normalize_language, sanitize_string, validate_level, validate_passing_score},
    },
};

/// Who is looking at a course: `(user_id, role)`
pub type Viewer<'a> = Option<(&'a Uuid, &'a str)>;

/// Listing parameters accepted from the query string
#[derive(Debug, Default)]
pub struct CourseQuery<'a> {
    pub language: Option<&'a str>,
    pub level: Option<&'a str>,
    pub teacher_id: Option<Uuid>,
    pub search: Option<&'a str>,
    pub mine: bool,
}

/// Course service for business logic
pub struct CourseService;

impl CourseService {
    /// Create a new course owned by the caller
    #[allow(clippy::too_many_arguments)]
    pub async fn create_course(
        pool: &PgPool,
        learning: &LearningConfig,
        teacher_id: &Uuid,
        role: &str,
        title: &str,
        description: Option<&str>,
        language: &str,
        level: &str,
        passing_score: Option<i32>,
        is_published: Option<bool>,
    ) -> AppResult<Course> {
        if !roles::AUTHORS.contains(&role) {
            return Err(AppError::Forbidden(
                "Only teachers can create courses".to_string(),
            ));
        }

        let title = sanitize_string(title);
        if title.is_empty() {
            return Err(AppError::Validation("Title cannot be empty".to_string()));
        }
        let language = normalize_language(language).map_err(|e| AppError::Validation(e.to_string()))?;
        validate_level(level).map_err(|e| AppError::Validation(e.to_string()))?;

        let passing_score = passing_score.unwrap_or(learning.default_passing_score);
        validate_passing_score(passing_score).map_err(|e| AppError::Validation(e.to_string()))?;

        let course = CourseRepository::create(
            pool,
            &title,
            description,
            &language,
            level,
            teacher_id,
            passing_score,
            is_published.unwrap_or(false),
        )
        .await?;

        info!(course_id = %course.id, teacher_id = %teacher_id, "Course created");
        Ok(course)
    }

    /// Get a course the viewer is allowed to see. Drafts are hidden as 404.
    pub async fn get_course(pool: &PgPool, id: &Uuid, viewer: Viewer<'_>) -> AppResult<Course> {
        let course = CourseRepository::find_by_id(pool, id)
            .await?
            .filter(|c| c.is_visible_to(viewer))
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

        Ok(course)
    }

    /// Get a course the caller may modify
    pub async fn get_managed_course(
        pool: &PgPool,
        id: &Uuid,
        user_id: &Uuid,
        role: &str,
    ) -> AppResult<Course> {
        let course = Self::get_course(pool, id, Some((user_id, role))).await?;

        if !course.can_manage(user_id, role) {
            return Err(AppError::Forbidden(
                "Only the course owner can modify this course".to_string(),
            ));
        }

        Ok(course)
    }

    /// Get the display name of the course's teacher
    pub async fn get_teacher_name(pool: &PgPool, course: &Course) -> AppResult<String> {
        CourseRepository::get_teacher_name(pool, &course.teacher_id).await
    }

    /// List courses visible to the viewer
    pub async fn list_courses(
        pool: &PgPool,
        pagination: Pagination,
        query: CourseQuery<'_>,
        viewer: Viewer<'_>,
    ) -> AppResult<(Vec<Course>, i64)> {
        let level = match query.level {
            Some(level) => {
                validate_level(level).map_err(|e| AppError::Validation(e.to_string()))?;
                Some(level)
            }
            None => None,
        };
        let language = query
            .language
            .map(normalize_language)
            .transpose()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let mut filter = CourseFilter {
            language: language.as_deref(),
            level,
            teacher_id: query.teacher_id,
            search: query.search,
            ..Default::default()
        };

        if query.mine {
            let (user_id, _) = viewer.ok_or(AppError::Unauthorized)?;
            filter.teacher_id = Some(*user_id);
            filter.drafts_of = Some(*user_id);
        } else if let Some((_, role)) = viewer {
            filter.all_drafts = role == roles::ADMIN;
        }

        CourseRepository::list(pool, pagination.offset(), pagination.limit(), &filter).await
    }

    /// Update course
    #[allow(clippy::too_many_arguments)]
    pub async fn update_course(
        pool: &PgPool,
        id: &Uuid,
        user_id: &Uuid,
        role: &str,
        title: Option<&str>,
        description: Option<&str>,
        language: Option<&str>,
        level: Option<&str>,
        passing_score: Option<i32>,
        is_published: Option<bool>,
    ) -> AppResult<Course> {
        Self::get_managed_course(pool, id, user_id, role).await?;

        let title = title.map(sanitize_string);
        if title.as_deref() == Some("") {
            return Err(AppError::Validation("Title cannot be empty".to_string()));
        }
        let language = language
            .map(normalize_language)
            .transpose()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        if let Some(level) = level {
            validate_level(level).map_err(|e| AppError::Validation(e.to_string()))?;
        }
        if let Some(score) = passing_score {
            validate_passing_score(score).map_err(|e| AppError::Validation(e.to_string()))?;
        }

        let course = CourseRepository::update(
            pool,
            id,
            title.as_deref(),
            description,
            language.as_deref(),
            level,
            passing_score,
            is_published,
        )
        .await?;

        info!(course_id = %id, user_id = %user_id, is_published = course.is_published, "Course updated");
        Ok(course)
    }

    /// Delete course
    pub async fn delete_course(pool: &PgPool, id: &Uuid, user_id: &Uuid, role: &str) -> AppResult<()> {
        Self::get_managed_course(pool, id, user_id, role).await?;
        CourseRepository::delete(pool, id).await?;

        info!(course_id = %id, user_id = %user_id, "Course deleted");
        Ok(())
    }

    /// Enrollment and progress figures for a course
    pub async fn get_course_stats(
        pool: &PgPool,
        id: &Uuid,
        user_id: &Uuid,
        role: &str,
    ) -> AppResult<CourseStats> {
        let course = Self::get_managed_course(pool, id, user_id, role).await?;

        let mut stats = CourseStats {
            course_id: course.id,
            lesson_count: LessonRepository::count_by_course(pool, id).await?,
            ..Default::default()
        };

        for (status, count) in EnrollmentRepository::count_by_status(pool, id).await? {
            match status.as_str() {
                enrollment_status::ACTIVE => stats.active_enrollments = count,
                enrollment_status::COMPLETED => stats.completed_enrollments = count,
                enrollment_status::DROPPED => stats.dropped_enrollments = count,
                _ => {}
            }
            stats.total_enrollments += count;
        }

        let progress = CompletionRepository::course_stats(pool, id).await?;
        stats.completed_count = progress.completed;
        stats.average_progress = progress.average_progress;
        stats.average_score = progress.average_score;

        Ok(stats)
    }

    /// Students enrolled in a course
    pub async fn list_enrollments(
        pool: &PgPool,
        id: &Uuid,
        user_id: &Uuid,
        role: &str,
        pagination: Pagination,
    ) -> AppResult<(Vec<EnrolledStudent>, i64)> {
        Self::get_managed_course(pool, id, user_id, role).await?;
        EnrollmentRepository::list_for_course(pool, id, pagination.offset(), pagination.limit())
            .await
    }
}
