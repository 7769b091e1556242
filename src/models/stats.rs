//! Aggregate figures for dashboards

use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;

/// Enrollment and progress figures for one course
#[derive(Debug, Default, Serialize)]
pub struct CourseStats {
    pub course_id: Uuid,
    pub lesson_count: i64,
    pub total_enrollments: i64,
    pub active_enrollments: i64,
    pub completed_enrollments: i64,
    pub dropped_enrollments: i64,
    /// Learners whose completion reached 100%
    pub completed_count: i64,
    pub average_progress: Option<f64>,
    pub average_score: Option<f64>,
}

/// Platform-wide counts
#[derive(Debug, Serialize)]
pub struct SystemStats {
    pub total_users: i64,
    pub users_by_role: BTreeMap<String, i64>,
    pub total_courses: i64,
    pub published_courses: i64,
    pub total_lessons: i64,
    pub total_enrollments: i64,
    pub active_enrollments: i64,
    pub completed_courses: i64,
    pub certificates_issued: i64,
    pub realtime_connections: usize,
}
