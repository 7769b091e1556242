//! Enrollment and progress response DTOs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Completion, Enrollment, MyEnrollment};

/// Enrollment response
#[derive(Debug, Serialize)]
pub struct EnrollmentResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub status: String,
    pub enrolled_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Enrollment> for EnrollmentResponse {
    fn from(enrollment: Enrollment) -> Self {
        Self {
            id: enrollment.id,
            user_id: enrollment.user_id,
            course_id: enrollment.course_id,
            status: enrollment.status,
            enrolled_at: enrollment.enrolled_at,
            updated_at: enrollment.updated_at,
        }
    }
}

/// The caller's enrollments
#[derive(Debug, Serialize)]
pub struct MyEnrollmentsResponse {
    pub enrollments: Vec<MyEnrollment>,
}

/// Progress of the caller in one course
#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub course_id: Uuid,
    pub completed_lesson_ids: Vec<Uuid>,
    /// Best quiz percentage per lesson
    pub quiz_scores: BTreeMap<Uuid, i32>,
    pub progress: i32,
    pub score: Option<i32>,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<Completion> for ProgressResponse {
    fn from(completion: Completion) -> Self {
        Self {
            course_id: completion.course_id,
            completed_lesson_ids: completion.completed_lesson_ids,
            quiz_scores: completion.quiz_scores.0,
            progress: completion.progress,
            score: completion.score,
            is_completed: completion.is_completed,
            completed_at: completion.completed_at,
        }
    }
}
