//! Course repository

use sqlx::PgPool;
use uuid::Uuid;

use crate::{error::AppResult, models::Course};

/// Filters for course listings
#[derive(Debug, Default, Clone)]
pub struct CourseFilter<'a> {
    pub language: Option<&'a str>,
    pub level: Option<&'a str>,
    pub teacher_id: Option<Uuid>,
    pub search: Option<&'a str>,
    /// Include drafts owned by this teacher alongside published courses
    pub drafts_of: Option<Uuid>,
    /// Include every draft (admins)
    pub all_drafts: bool,
}

/// Repository for course database operations
pub struct CourseRepository;

impl CourseRepository {
    /// Create a new course
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        pool: &PgPool,
        title: &str,
        description: Option<&str>,
        language: &str,
        level: &str,
        teacher_id: &Uuid,
        passing_score: i32,
        is_published: bool,
    ) -> AppResult<Course> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO courses (title, description, language, level, teacher_id, passing_score, is_published)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(language)
        .bind(level)
        .bind(teacher_id)
        .bind(passing_score)
        .bind(is_published)
        .fetch_one(pool)
        .await?;

        Ok(course)
    }

    /// Find course by ID
    pub async fn find_by_id(pool: &PgPool, id: &Uuid) -> AppResult<Option<Course>> {
        let course = sqlx::query_as::<_, Course>(r#"SELECT * FROM courses WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(course)
    }

    /// Update course; `None` leaves a field untouched
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        pool: &PgPool,
        id: &Uuid,
        title: Option<&str>,
        description: Option<&str>,
        language: Option<&str>,
        level: Option<&str>,
        passing_score: Option<i32>,
        is_published: Option<bool>,
    ) -> AppResult<Course> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            UPDATE courses
            SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                language = COALESCE($4, language),
                level = COALESCE($5, level),
                passing_score = COALESCE($6, passing_score),
                is_published = COALESCE($7, is_published),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(description)
        .bind(language)
        .bind(level)
        .bind(passing_score)
        .bind(is_published)
        .fetch_one(pool)
        .await?;

        Ok(course)
    }

    /// Delete course (lessons, enrollments, completions and certificates cascade)
    pub async fn delete(pool: &PgPool, id: &Uuid) -> AppResult<()> {
        sqlx::query(r#"DELETE FROM courses WHERE id = $1"#)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// List courses with pagination
    pub async fn list(
        pool: &PgPool,
        offset: i64,
        limit: i64,
        filter: &CourseFilter<'_>,
    ) -> AppResult<(Vec<Course>, i64)> {
        let search_pattern = filter.search.map(|s| format!("%{}%", s));

        let courses = sqlx::query_as::<_, Course>(
            r#"
            SELECT * FROM courses
            WHERE
                (is_published OR $6 OR ($5::uuid IS NOT NULL AND teacher_id = $5))
                AND ($1::text IS NULL OR language = $1)
                AND ($2::text IS NULL OR level = $2)
                AND ($3::uuid IS NULL OR teacher_id = $3)
                AND ($4::text IS NULL OR title ILIKE $4 OR description ILIKE $4)
            ORDER BY created_at DESC
            OFFSET $7 LIMIT $8
            "#,
        )
        .bind(filter.language)
        .bind(filter.level)
        .bind(filter.teacher_id)
        .bind(&search_pattern)
        .bind(filter.drafts_of)
        .bind(filter.all_drafts)
        .bind(offset)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM courses
            WHERE
                (is_published OR $6 OR ($5::uuid IS NOT NULL AND teacher_id = $5))
                AND ($1::text IS NULL OR language = $1)
                AND ($2::text IS NULL OR level = $2)
                AND ($3::uuid IS NULL OR teacher_id = $3)
                AND ($4::text IS NULL OR title ILIKE $4 OR description ILIKE $4)
            "#,
        )
        .bind(filter.language)
        .bind(filter.level)
        .bind(filter.teacher_id)
        .bind(&search_pattern)
        .bind(filter.drafts_of)
        .bind(filter.all_drafts)
        .fetch_one(pool)
        .await?;

        Ok((courses, total))
    }

    /// Name of the course's teacher
    pub async fn get_teacher_name(pool: &PgPool, teacher_id: &Uuid) -> AppResult<String> {
        let name: Option<String> = sqlx::query_scalar(
            r#"SELECT COALESCE(NULLIF(TRIM(display_name), ''), username) FROM users WHERE id = $1"#,
        )
        .bind(teacher_id)
        .fetch_optional(pool)
        .await?;

        Ok(name.unwrap_or_else(|| "Unknown".to_string()))
    }

    /// Count courses, optionally only published ones
    pub async fn count(pool: &PgPool, published_only: bool) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM courses WHERE (NOT $1 OR is_published)"#)
                .bind(published_only)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }
}
