//! Course model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::constants::roles;

/// Course database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Language being taught, e.g. "spanish"
    pub language: String,
    pub level: String,
    pub teacher_id: Uuid,
    /// Quiz percentage needed to pass a lesson quiz
    pub passing_score: i32,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    /// Owner or admin
    pub fn can_manage(&self, user_id: &Uuid, role: &str) -> bool {
        self.teacher_id == *user_id || role == roles::ADMIN
    }

    /// Drafts are only visible to the people who can manage them
    pub fn is_visible_to(&self, viewer: Option<(&Uuid, &str)>) -> bool {
        if self.is_published {
            return true;
        }

        match viewer {
            Some((id, role)) => self.can_manage(id, role),
            None => false,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_course(teacher_id: Uuid) -> Course {
    let now = Utc::now();
    Course {
        id: Uuid::new_v4(),
        title: "Spanish for Travelers".to_string(),
        description: None,
        language: "spanish".to_string(),
        level: "beginner".to_string(),
        teacher_id,
        passing_score: 70,
        is_published: false,
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_visibility() {
        let teacher = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let course = sample_course(teacher);

        assert!(!course.is_visible_to(None));
        assert!(!course.is_visible_to(Some((&stranger, roles::STUDENT))));
        assert!(!course.is_visible_to(Some((&stranger, roles::TEACHER))));
        assert!(course.is_visible_to(Some((&teacher, roles::TEACHER))));
        assert!(course.is_visible_to(Some((&stranger, roles::ADMIN))));
    }

    #[test]
    fn test_published_is_public() {
        let mut course = sample_course(Uuid::new_v4());
        course.is_published = true;
        assert!(course.is_visible_to(None));
    }

    #[test]
    fn test_can_manage() {
        let teacher = Uuid::new_v4();
        let other = Uuid::new_v4();
        let course = sample_course(teacher);

        assert!(course.can_manage(&teacher, roles::TEACHER));
        assert!(course.can_manage(&other, roles::ADMIN));
        assert!(!course.can_manage(&other, roles::TEACHER));
    }
}
