//! Enrollment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::constants::enrollment_status;

/// Enrollment database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub status: String,
    pub enrolled_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Enrollment {
    pub fn status(&self) -> Option<EnrollmentStatus> {
        EnrollmentStatus::from_str(&self.status)
    }

    pub fn is_active(&self) -> bool {
        self.status() == Some(EnrollmentStatus::Active)
    }
}

/// One of a learner's enrollments, with course summary and progress
#[derive(Debug, Serialize, FromRow)]
pub struct MyEnrollment {
    pub course_id: Uuid,
    pub course_title: String,
    pub language: String,
    pub level: String,
    pub status: String,
    pub progress: i32,
    pub score: Option<i32>,
    pub enrolled_at: DateTime<Utc>,
}

/// A student enrolled in a course, as seen by its teacher
#[derive(Debug, Serialize, FromRow)]
pub struct EnrolledStudent {
    pub user_id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    pub status: String,
    pub progress: i32,
    pub score: Option<i32>,
    pub enrolled_at: DateTime<Utc>,
}

/// Enrollment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    Active,
    Completed,
    Dropped,
}

impl EnrollmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => enrollment_status::ACTIVE,
            Self::Completed => enrollment_status::COMPLETED,
            Self::Dropped => enrollment_status::DROPPED,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            enrollment_status::ACTIVE => Some(Self::Active),
            enrollment_status::COMPLETED => Some(Self::Completed),
            enrollment_status::DROPPED => Some(Self::Dropped),
            _ => None,
        }
    }

    /// Whether a learner may leave the course from this state
    pub fn can_drop(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Status a dropped enrollment returns to. Completion is sticky, so a
    /// learner who already finished the course comes back as completed.
    pub fn on_reenroll(course_completed: bool) -> Self {
        if course_completed {
            Self::Completed
        } else {
            Self::Active
        }
    }
}

impl std::fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip_names() {
        for status in [
            EnrollmentStatus::Active,
            EnrollmentStatus::Completed,
            EnrollmentStatus::Dropped,
        ] {
            assert_eq!(EnrollmentStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(EnrollmentStatus::from_str("paused"), None);
    }

    #[test]
    fn test_only_active_can_drop() {
        assert!(EnrollmentStatus::Active.can_drop());
        assert!(!EnrollmentStatus::Completed.can_drop());
        assert!(!EnrollmentStatus::Dropped.can_drop());
    }

    #[test]
    fn test_reenroll_keeps_completion() {
        assert_eq!(EnrollmentStatus::on_reenroll(false), EnrollmentStatus::Active);
        assert_eq!(EnrollmentStatus::on_reenroll(true), EnrollmentStatus::Completed);
        assert!(!EnrollmentStatus::on_reenroll(true).can_drop());
    }
}
