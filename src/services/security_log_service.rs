//! Security audit trail

use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::{
    db::repositories::SecurityLogRepository,
    error::AppResult,
    models::{SecurityEvent, SecurityLog},
    utils::Pagination,
};

/// Service for recording and reading security events
pub struct SecurityLogService;

impl SecurityLogService {
    /// Record an event. Failures are logged and swallowed.
    pub async fn record(pool: &PgPool, event: SecurityEvent) {
        if let Err(e) = SecurityLogRepository::insert(pool, &event).await {
            warn!(
                event_type = event.event_type,
                user_id = ?event.user_id,
                error = %e,
                "Failed to write security log entry"
            );
        }
    }

    /// List entries, newest first
    pub async fn list(
        pool: &PgPool,
        pagination: Pagination,
        user_id: Option<Uuid>,
        event_type: Option<&str>,
    ) -> AppResult<(Vec<SecurityLog>, i64)> {
        SecurityLogRepository::list(
            pool,
            pagination.offset(),
            pagination.limit(),
            user_id,
            event_type,
        )
        .await
    }
}
