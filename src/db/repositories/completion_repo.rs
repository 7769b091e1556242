//! Completion repository

use sqlx::PgPool;
use uuid::Uuid;

use crate::{error::AppResult, models::Completion};

/// Aggregate progress figures for one course
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CourseProgressStats {
    pub completed: i64,
    pub average_progress: Option<f64>,
    pub average_score: Option<f64>,
}

/// Repository for completion database operations
pub struct CompletionRepository;

impl CompletionRepository {
    /// Find the completion of a user in a course
    pub async fn find(
        pool: &PgPool,
        user_id: &Uuid,
        course_id: &Uuid,
    ) -> AppResult<Option<Completion>> {
        let completion = sqlx::query_as::<_, Completion>(
            r#"SELECT * FROM completions WHERE user_id = $1 AND course_id = $2"#,
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_optional(pool)
        .await?;

        Ok(completion)
    }

    /// Find with a row lock, for read-modify-write inside a transaction
    pub async fn find_for_update(
        conn: &mut sqlx::PgConnection,
        user_id: &Uuid,
        course_id: &Uuid,
    ) -> AppResult<Option<Completion>> {
        let completion = sqlx::query_as::<_, Completion>(
            r#"SELECT * FROM completions WHERE user_id = $1 AND course_id = $2 FOR UPDATE"#,
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_optional(conn)
        .await?;

        Ok(completion)
    }

    /// Get or create an empty completion
    pub async fn find_or_create(
        conn: &mut sqlx::PgConnection,
        user_id: &Uuid,
        course_id: &Uuid,
    ) -> AppResult<Completion> {
        sqlx::query(
            r#"
            INSERT INTO completions (user_id, course_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, course_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(course_id)
        .execute(&mut *conn)
        .await?;

        Self::find_for_update(conn, user_id, course_id)
            .await?
            .ok_or_else(|| crate::error::AppError::NotFound("Completion not found".to_string()))
    }

    /// Persist recomputed progress
    pub async fn save(conn: &mut sqlx::PgConnection, completion: &Completion) -> AppResult<Completion> {
        let saved = sqlx::query_as::<_, Completion>(
            r#"
            UPDATE completions
            SET
                completed_lesson_ids = $2,
                quiz_scores = $3,
                progress = $4,
                score = $5,
                is_completed = $6,
                completed_at = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(completion.id)
        .bind(&completion.completed_lesson_ids)
        .bind(&completion.quiz_scores)
        .bind(completion.progress)
        .bind(completion.score)
        .bind(completion.is_completed)
        .bind(completion.completed_at)
        .fetch_one(conn)
        .await?;

        Ok(saved)
    }

    /// Aggregate progress for a course
    pub async fn course_stats(pool: &PgPool, course_id: &Uuid) -> AppResult<CourseProgressStats> {
        let stats = sqlx::query_as::<_, CourseProgressStats>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE is_completed) AS completed,
                AVG(progress)::float8 AS average_progress,
                AVG(score)::float8 AS average_score
            FROM completions
            WHERE course_id = $1
            "#,
        )
        .bind(course_id)
        .fetch_one(pool)
        .await?;

        Ok(stats)
    }

    /// Count completed courses across all learners
    pub async fn count_completed(pool: &PgPool) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM completions WHERE is_completed"#)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
