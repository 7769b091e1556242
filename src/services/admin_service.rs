//! Admin service

use std::collections::BTreeMap;

use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::{
    constants::{enrollment_status, roles, security_events},
    db::repositories::{
        CertificateRepository, CompletionRepository, CourseRepository, EnrollmentRepository,
        LessonRepository, UserRepository,
    },
    error::{AppError, AppResult},
    models::{SecurityEvent, SystemStats, User},
    services::SecurityLogService,
    utils::{Pagination, validation::validate_role},
};

/// Admin service for user and system management
pub struct AdminService;

impl AdminService {
    /// List all users with admin details
    pub async fn list_all_users(
        pool: &PgPool,
        pagination: Pagination,
        search: Option<&str>,
        role: Option<&str>,
    ) -> AppResult<(Vec<User>, i64)> {
        UserRepository::list(pool, pagination.offset(), pagination.limit(), search, role).await
    }

    /// Update user role
    pub async fn update_user_role(
        pool: &PgPool,
        admin_id: &Uuid,
        user_id: &Uuid,
        role: &str,
        ip: Option<String>,
    ) -> AppResult<User> {
        validate_role(role).map_err(|e| AppError::Validation(e.to_string()))?;

        if admin_id == user_id && role != roles::ADMIN {
            return Err(AppError::Forbidden("Cannot demote yourself".to_string()));
        }

        let previous = Self::find_user(pool, user_id).await?;
        let user = UserRepository::update_role(pool, user_id, role).await?;

        info!(admin_id = %admin_id, user_id = %user_id, from = %previous.role, to = %role, "User role changed");
        SecurityLogService::record(
            pool,
            SecurityEvent::new(security_events::ROLE_CHANGED)
                .user(*user_id)
                .ip(ip)
                .detail(format!("{} -> {} by {}", previous.role, role, admin_id)),
        )
        .await;

        Ok(user)
    }

    /// Suspend a user, optionally for a limited number of hours
    pub async fn suspend_user(
        pool: &PgPool,
        admin_id: &Uuid,
        user_id: &Uuid,
        reason: Option<&str>,
        duration_hours: Option<i64>,
        ip: Option<String>,
    ) -> AppResult<()> {
        if admin_id == user_id {
            return Err(AppError::Forbidden("Cannot suspend yourself".to_string()));
        }

        Self::find_user(pool, user_id).await?;

        let until = duration_hours.map(|h| Utc::now() + Duration::hours(h));
        UserRepository::suspend(pool, user_id, reason, until).await?;

        info!(admin_id = %admin_id, user_id = %user_id, until = ?until, "User suspended");
        SecurityLogService::record(
            pool,
            SecurityEvent::new(security_events::USER_SUSPENDED)
                .user(*user_id)
                .ip(ip)
                .detail(format!(
                    "by {}: {}",
                    admin_id,
                    reason.unwrap_or("No reason provided")
                )),
        )
        .await;

        Ok(())
    }

    /// Lift a suspension
    pub async fn reactivate_user(
        pool: &PgPool,
        admin_id: &Uuid,
        user_id: &Uuid,
        ip: Option<String>,
    ) -> AppResult<()> {
        Self::find_user(pool, user_id).await?;
        UserRepository::reactivate(pool, user_id).await?;

        info!(admin_id = %admin_id, user_id = %user_id, "User reactivated");
        SecurityLogService::record(
            pool,
            SecurityEvent::new(security_events::USER_REACTIVATED)
                .user(*user_id)
                .ip(ip)
                .detail(format!("by {}", admin_id)),
        )
        .await;

        Ok(())
    }

    /// Delete a user and everything they own
    pub async fn delete_user(
        pool: &PgPool,
        admin_id: &Uuid,
        user_id: &Uuid,
        ip: Option<String>,
    ) -> AppResult<()> {
        if admin_id == user_id {
            return Err(AppError::Forbidden("Cannot delete yourself".to_string()));
        }

        let user = Self::find_user(pool, user_id).await?;
        if !UserRepository::delete(pool, user_id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        info!(admin_id = %admin_id, user_id = %user_id, "User deleted");
        // The entry outlives the user, so the id goes in the detail
        SecurityLogService::record(
            pool,
            SecurityEvent::new(security_events::USER_DELETED)
                .user(*admin_id)
                .ip(ip)
                .detail(format!("deleted {} ({})", user.username, user.id)),
        )
        .await;

        Ok(())
    }

    /// Get system statistics
    pub async fn get_system_stats(
        pool: &PgPool,
        realtime_connections: usize,
    ) -> AppResult<SystemStats> {
        let users_by_role: BTreeMap<String, i64> =
            UserRepository::count_by_role(pool).await?.into_iter().collect();
        let total_users = users_by_role.values().sum();

        Ok(SystemStats {
            total_users,
            users_by_role,
            total_courses: CourseRepository::count(pool, false).await?,
            published_courses: CourseRepository::count(pool, true).await?,
            total_lessons: LessonRepository::count(pool).await?,
            total_enrollments: EnrollmentRepository::count(pool, None).await?,
            active_enrollments: EnrollmentRepository::count(pool, Some(enrollment_status::ACTIVE))
                .await?,
            completed_courses: CompletionRepository::count_completed(pool).await?,
            certificates_issued: CertificateRepository::count(pool).await?,
            realtime_connections,
        })
    }

    async fn find_user(pool: &PgPool, user_id: &Uuid) -> AppResult<User> {
        UserRepository::find_by_id(pool, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}
