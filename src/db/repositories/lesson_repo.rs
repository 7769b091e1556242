//! Lesson repository
//!
//! Positions are kept dense (0..n) per course; inserts and deletes shift the
//! neighbours inside a transaction.

use sqlx::{PgConnection, PgPool, types::Json};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Lesson, Quiz},
};

/// Repository for lesson database operations
pub struct LessonRepository;

impl LessonRepository {
    /// Insert a lesson at `position`, or at the end when `None`
    pub async fn create(
        pool: &PgPool,
        course_id: &Uuid,
        title: &str,
        content: &str,
        position: Option<i32>,
        quiz: Option<&Quiz>,
    ) -> AppResult<Lesson> {
        let mut tx = pool.begin().await?;

        // Serialize concurrent edits to the same course's ordering
        sqlx::query(r#"SELECT id FROM courses WHERE id = $1 FOR UPDATE"#)
            .bind(course_id)
            .execute(&mut *tx)
            .await?;

        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM lessons WHERE course_id = $1"#)
            .bind(course_id)
            .fetch_one(&mut *tx)
            .await?;

        let position = position
            .map(|p| p.clamp(0, count as i32))
            .unwrap_or(count as i32);

        sqlx::query(
            r#"UPDATE lessons SET position = position + 1 WHERE course_id = $1 AND position >= $2"#,
        )
        .bind(course_id)
        .bind(position)
        .execute(&mut *tx)
        .await?;

        let lesson = sqlx::query_as::<_, Lesson>(
            r#"
            INSERT INTO lessons (course_id, title, content, position, quiz)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(course_id)
        .bind(title)
        .bind(content)
        .bind(position)
        .bind(quiz.map(Json))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(lesson)
    }

    /// Find lesson by ID
    pub async fn find_by_id(pool: &PgPool, id: &Uuid) -> AppResult<Option<Lesson>> {
        let lesson = sqlx::query_as::<_, Lesson>(r#"SELECT * FROM lessons WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(lesson)
    }

    /// All lessons of a course in position order
    pub async fn list_by_course(pool: &PgPool, course_id: &Uuid) -> AppResult<Vec<Lesson>> {
        let lessons = sqlx::query_as::<_, Lesson>(
            r#"SELECT * FROM lessons WHERE course_id = $1 ORDER BY position, created_at"#,
        )
        .bind(course_id)
        .fetch_all(pool)
        .await?;

        Ok(lessons)
    }

    /// Lesson IDs of a course in position order
    pub async fn ordered_ids(conn: &mut PgConnection, course_id: &Uuid) -> AppResult<Vec<Uuid>> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            r#"SELECT id FROM lessons WHERE course_id = $1 ORDER BY position, created_at"#,
        )
        .bind(course_id)
        .fetch_all(conn)
        .await?;

        Ok(ids)
    }

    /// Number of lessons in a course
    pub async fn count_by_course(pool: &PgPool, course_id: &Uuid) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM lessons WHERE course_id = $1"#)
            .bind(course_id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Update lesson content. `quiz` of `Some(None)` removes the quiz.
    pub async fn update(
        pool: &PgPool,
        id: &Uuid,
        title: Option<&str>,
        content: Option<&str>,
        quiz: Option<Option<&Quiz>>,
    ) -> AppResult<Lesson> {
        let lesson = sqlx::query_as::<_, Lesson>(
            r#"
            UPDATE lessons
            SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                quiz = CASE WHEN $4 THEN $5 ELSE quiz END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(content)
        .bind(quiz.is_some())
        .bind(quiz.flatten().map(Json))
        .fetch_one(pool)
        .await?;

        Ok(lesson)
    }

    /// Delete a lesson and close the gap in positions
    pub async fn delete(pool: &PgPool, lesson: &Lesson) -> AppResult<()> {
        let mut tx = pool.begin().await?;

        sqlx::query(r#"SELECT id FROM courses WHERE id = $1 FOR UPDATE"#)
            .bind(lesson.course_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(r#"DELETE FROM lessons WHERE id = $1"#)
            .bind(lesson.id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"UPDATE lessons SET position = position - 1 WHERE course_id = $1 AND position > $2"#,
        )
        .bind(lesson.course_id)
        .bind(lesson.position)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Assign positions from the given ordering.
    ///
    /// `check` sees the course's current lesson IDs under the course lock and
    /// can reject the ordering before anything is written.
    pub async fn reorder<F>(
        pool: &PgPool,
        course_id: &Uuid,
        ordered_ids: &[Uuid],
        check: F,
    ) -> AppResult<()>
    where
        F: FnOnce(&[Uuid]) -> AppResult<()>,
    {
        let mut tx = pool.begin().await?;

        sqlx::query(r#"SELECT id FROM courses WHERE id = $1 FOR UPDATE"#)
            .bind(course_id)
            .execute(&mut *tx)
            .await?;

        let current = Self::ordered_ids(&mut *tx, course_id).await?;
        check(&current)?;

        for (position, id) in ordered_ids.iter().enumerate() {
            sqlx::query(
                r#"UPDATE lessons SET position = $3, updated_at = NOW() WHERE id = $1 AND course_id = $2"#,
            )
            .bind(id)
            .bind(course_id)
            .bind(position as i32)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Count lessons across all courses
    pub async fn count(pool: &PgPool) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM lessons"#)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
