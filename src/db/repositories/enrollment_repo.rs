//! Enrollment repository

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{EnrolledStudent, Enrollment, MyEnrollment},
};

/// Repository for enrollment database operations
pub struct EnrollmentRepository;

impl EnrollmentRepository {
    /// Create an active enrollment together with an empty completion record
    pub async fn create(pool: &PgPool, user_id: &Uuid, course_id: &Uuid) -> AppResult<Enrollment> {
        let mut tx = pool.begin().await?;

        let enrollment = sqlx::query_as::<_, Enrollment>(
            r#"
            INSERT INTO enrollments (user_id, course_id, status)
            VALUES ($1, $2, 'active')
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO completions (user_id, course_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, course_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(course_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(enrollment)
    }

    /// Find the enrollment of a user in a course
    pub async fn find(
        pool: &PgPool,
        user_id: &Uuid,
        course_id: &Uuid,
    ) -> AppResult<Option<Enrollment>> {
        let enrollment = sqlx::query_as::<_, Enrollment>(
            r#"SELECT * FROM enrollments WHERE user_id = $1 AND course_id = $2"#,
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_optional(pool)
        .await?;

        Ok(enrollment)
    }

    /// Set enrollment status
    pub async fn set_status(
        pool: &PgPool,
        user_id: &Uuid,
        course_id: &Uuid,
        status: &str,
    ) -> AppResult<Enrollment> {
        let enrollment = sqlx::query_as::<_, Enrollment>(
            r#"
            UPDATE enrollments
            SET status = $3, updated_at = NOW()
            WHERE user_id = $1 AND course_id = $2
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(course_id)
        .bind(status)
        .fetch_one(pool)
        .await?;

        Ok(enrollment)
    }

    /// Enrollments of a user with course title and progress
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: &Uuid,
        status: Option<&str>,
    ) -> AppResult<Vec<MyEnrollment>> {
        let rows = sqlx::query_as::<_, MyEnrollment>(
            r#"
            SELECT
                e.course_id,
                c.title AS course_title,
                c.language,
                c.level,
                e.status,
                COALESCE(cp.progress, 0) AS progress,
                cp.score,
                e.enrolled_at
            FROM enrollments e
            JOIN courses c ON c.id = e.course_id
            LEFT JOIN completions cp ON cp.user_id = e.user_id AND cp.course_id = e.course_id
            WHERE e.user_id = $1 AND ($2::text IS NULL OR e.status = $2)
            ORDER BY e.enrolled_at DESC
            "#,
        )
        .bind(user_id)
        .bind(status)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Students enrolled in a course, with progress
    pub async fn list_for_course(
        pool: &PgPool,
        course_id: &Uuid,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<EnrolledStudent>, i64)> {
        let rows = sqlx::query_as::<_, EnrolledStudent>(
            r#"
            SELECT
                u.id AS user_id,
                u.username,
                u.display_name,
                e.status,
                COALESCE(cp.progress, 0) AS progress,
                cp.score,
                e.enrolled_at
            FROM enrollments e
            JOIN users u ON u.id = e.user_id
            LEFT JOIN completions cp ON cp.user_id = e.user_id AND cp.course_id = e.course_id
            WHERE e.course_id = $1
            ORDER BY e.enrolled_at
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(course_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        let total: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM enrollments WHERE course_id = $1"#)
                .bind(course_id)
                .fetch_one(pool)
                .await?;

        Ok((rows, total))
    }

    /// Move an active or dropped enrollment to completed, inside the caller's transaction
    pub async fn mark_completed(
        conn: &mut sqlx::PgConnection,
        user_id: &Uuid,
        course_id: &Uuid,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE enrollments
            SET status = 'completed', updated_at = NOW()
            WHERE user_id = $1 AND course_id = $2 AND status <> 'completed'
            "#,
        )
        .bind(user_id)
        .bind(course_id)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Enrollment counts of a course, grouped by status
    pub async fn count_by_status(pool: &PgPool, course_id: &Uuid) -> AppResult<Vec<(String, i64)>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"SELECT status, COUNT(*) FROM enrollments WHERE course_id = $1 GROUP BY status"#,
        )
        .bind(course_id)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Count enrollments, optionally by status
    pub async fn count(pool: &PgPool, status: Option<&str>) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM enrollments WHERE ($1::text IS NULL OR status = $1)"#,
        )
        .bind(status)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }
}
