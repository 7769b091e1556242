//! Certificate repository

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Certificate, CertificateDetails},
};

const DETAILS_SELECT: &str = r#"
    SELECT
        cert.id,
        cert.user_id,
        cert.course_id,
        cert.verification_code,
        cert.final_score,
        cert.issued_at,
        u.username AS holder_username,
        u.display_name AS holder_display_name,
        c.title AS course_title,
        c.language AS course_language,
        c.teacher_id AS course_teacher_id
    FROM certificates cert
    JOIN users u ON u.id = cert.user_id
    JOIN courses c ON c.id = cert.course_id
"#;

/// Repository for certificate database operations
pub struct CertificateRepository;

impl CertificateRepository {
    /// Insert a certificate. Returns `None` when one already exists for the
    /// user and course, or when the code collided.
    pub async fn try_create(
        conn: &mut sqlx::PgConnection,
        user_id: &Uuid,
        course_id: &Uuid,
        verification_code: &str,
        final_score: Option<i32>,
    ) -> AppResult<Option<Certificate>> {
        let certificate = sqlx::query_as::<_, Certificate>(
            r#"
            INSERT INTO certificates (user_id, course_id, verification_code, final_score)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT DO NOTHING
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(course_id)
        .bind(verification_code)
        .bind(final_score)
        .fetch_optional(conn)
        .await?;

        Ok(certificate)
    }

    /// Find the certificate of a user for a course
    pub async fn find_for_user_course(
        conn: &mut sqlx::PgConnection,
        user_id: &Uuid,
        course_id: &Uuid,
    ) -> AppResult<Option<Certificate>> {
        let certificate = sqlx::query_as::<_, Certificate>(
            r#"SELECT * FROM certificates WHERE user_id = $1 AND course_id = $2"#,
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_optional(conn)
        .await?;

        Ok(certificate)
    }

    /// Find by ID with holder and course details
    pub async fn find_details_by_id(
        pool: &PgPool,
        id: &Uuid,
    ) -> AppResult<Option<CertificateDetails>> {
        let query = format!("{} WHERE cert.id = $1", DETAILS_SELECT);
        let details = sqlx::query_as::<_, CertificateDetails>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(details)
    }

    /// Find by verification code with holder and course details
    pub async fn find_details_by_code(
        pool: &PgPool,
        code: &str,
    ) -> AppResult<Option<CertificateDetails>> {
        let query = format!("{} WHERE cert.verification_code = $1", DETAILS_SELECT);
        let details = sqlx::query_as::<_, CertificateDetails>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await?;

        Ok(details)
    }

    /// All certificates of a user, newest first
    pub async fn list_for_user(pool: &PgPool, user_id: &Uuid) -> AppResult<Vec<CertificateDetails>> {
        let query = format!("{} WHERE cert.user_id = $1 ORDER BY cert.issued_at DESC", DETAILS_SELECT);
        let certificates = sqlx::query_as::<_, CertificateDetails>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await?;

        Ok(certificates)
    }

    /// Count issued certificates
    pub async fn count(pool: &PgPool) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM certificates"#)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
