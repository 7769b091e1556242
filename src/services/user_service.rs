//! User service

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    constants::roles,
    db::repositories::UserRepository,
    error::{AppError, AppResult},
    models::User,
    services::AuthService,
    utils::Pagination,
};

/// User service for business logic
pub struct UserService;

impl UserService {
    /// Get user by ID
    pub async fn get_user_by_id(pool: &PgPool, id: &Uuid) -> AppResult<User> {
        UserRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// List users with pagination
    pub async fn list_users(
        pool: &PgPool,
        pagination: Pagination,
        search: Option<&str>,
        role: Option<&str>,
    ) -> AppResult<(Vec<User>, i64)> {
        UserRepository::list(pool, pagination.offset(), pagination.limit(), search, role).await
    }

    /// Update user profile
    #[allow(clippy::too_many_arguments)]
    pub async fn update_user(
        pool: &PgPool,
        requester_id: &Uuid,
        target_id: &Uuid,
        requester_role: &str,
        display_name: Option<&str>,
        email: Option<&str>,
        current_password: Option<&str>,
        new_password: Option<&str>,
    ) -> AppResult<User> {
        // Check permissions
        if requester_id != target_id && requester_role != roles::ADMIN {
            return Err(AppError::Forbidden(
                "Cannot update other users' profiles".to_string(),
            ));
        }

        let user = Self::get_user_by_id(pool, target_id).await?;

        if let Some(email) = email {
            if let Some(existing) = UserRepository::find_by_email(pool, email).await? {
                if existing.id != user.id {
                    return Err(AppError::AlreadyExists("Email already registered".to_string()));
                }
            }
        }

        // If changing password, verify current password
        let password_hash = match new_password {
            Some(new_pwd) => {
                crate::utils::validation::validate_password(new_pwd)
                    .map_err(|e| AppError::Validation(e.to_string()))?;

                // Admins resetting someone else's password skip the check
                if requester_id == target_id {
                    let current_pwd = current_password.ok_or_else(|| {
                        AppError::Validation("Current password required".to_string())
                    })?;

                    if !AuthService::verify_password(current_pwd, &user.password_hash)? {
                        return Err(AppError::InvalidCredentials);
                    }
                }

                Some(AuthService::hash_password(new_pwd)?)
            }
            None => None,
        };

        UserRepository::update(
            pool,
            target_id,
            email,
            display_name,
            password_hash.as_deref(),
        )
        .await
    }
}
