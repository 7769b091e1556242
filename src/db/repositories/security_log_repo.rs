//! Security log repository

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{SecurityEvent, SecurityLog},
};

/// Repository for security audit entries
pub struct SecurityLogRepository;

impl SecurityLogRepository {
    /// Append an entry
    pub async fn insert(pool: &PgPool, event: &SecurityEvent) -> AppResult<SecurityLog> {
        let entry = sqlx::query_as::<_, SecurityLog>(
            r#"
            INSERT INTO security_logs (user_id, event_type, ip_address, detail)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(event.user_id)
        .bind(event.event_type)
        .bind(&event.ip_address)
        .bind(&event.detail)
        .fetch_one(pool)
        .await?;

        Ok(entry)
    }

    /// List entries, newest first
    pub async fn list(
        pool: &PgPool,
        offset: i64,
        limit: i64,
        user_id: Option<Uuid>,
        event_type: Option<&str>,
    ) -> AppResult<(Vec<SecurityLog>, i64)> {
        let entries = sqlx::query_as::<_, SecurityLog>(
            r#"
            SELECT * FROM security_logs
            WHERE ($1::uuid IS NULL OR user_id = $1)
              AND ($2::text IS NULL OR event_type = $2)
            ORDER BY created_at DESC
            OFFSET $3 LIMIT $4
            "#,
        )
        .bind(user_id)
        .bind(event_type)
        .bind(offset)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM security_logs
            WHERE ($1::uuid IS NULL OR user_id = $1)
              AND ($2::text IS NULL OR event_type = $2)
            "#,
        )
        .bind(user_id)
        .bind(event_type)
        .fetch_one(pool)
        .await?;

        Ok((entries, total))
    }
}
