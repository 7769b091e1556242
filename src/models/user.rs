//! User model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::constants::roles;

/// User database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: Option<String>,
    pub role: String,
    pub is_suspended: bool,
    pub suspension_reason: Option<String>,
    pub suspended_until: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if the user is currently suspended
    pub fn is_currently_suspended(&self) -> bool {
        self.is_suspended_at(Utc::now())
    }

    /// Suspension check against an explicit clock
    pub fn is_suspended_at(&self, now: DateTime<Utc>) -> bool {
        if !self.is_suspended {
            return false;
        }

        // Timed suspensions lapse on their own
        match self.suspended_until {
            Some(until) => until > now,
            None => true,
        }
    }

    /// Check if user has admin privileges
    pub fn is_admin(&self) -> bool {
        self.role == roles::ADMIN
    }

    /// Check if user can author courses
    pub fn can_author(&self) -> bool {
        roles::AUTHORS.contains(&self.role.as_str())
    }

    /// Name shown on certificates and rosters
    pub fn public_name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

#[cfg(test)]
pub(crate) fn sample_user(role: &str) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        username: "maria".to_string(),
        email: "maria@example.com".to_string(),
        password_hash: String::new(),
        display_name: None,
        role: role.to_string(),
        is_suspended: false,
        suspension_reason: None,
        suspended_until: None,
        last_login_at: None,
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_suspension_expires() {
        let now = Utc::now();
        let mut user = sample_user(roles::STUDENT);
        assert!(!user.is_suspended_at(now));

        user.is_suspended = true;
        assert!(user.is_suspended_at(now));

        user.suspended_until = Some(now + Duration::hours(1));
        assert!(user.is_suspended_at(now));

        user.suspended_until = Some(now - Duration::hours(1));
        assert!(!user.is_suspended_at(now));
    }

    #[test]
    fn test_role_predicates() {
        assert!(sample_user(roles::ADMIN).is_admin());
        assert!(sample_user(roles::ADMIN).can_author());
        assert!(sample_user(roles::TEACHER).can_author());
        assert!(!sample_user(roles::TEACHER).is_admin());
        assert!(!sample_user(roles::STUDENT).can_author());
    }

    #[test]
    fn test_public_name_prefers_display_name() {
        let mut user = sample_user(roles::STUDENT);
        assert_eq!(user.public_name(), "maria");

        user.display_name = Some("  ".to_string());
        assert_eq!(user.public_name(), "maria");

        user.display_name = Some("María López".to_string());
        assert_eq!(user.public_name(), "María López");
    }
}
