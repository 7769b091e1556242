//! Course response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Course, EnrolledStudent};

/// Course response
#[derive(Debug, Serialize)]
pub struct CourseResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub language: String,
    pub level: String,
    pub teacher_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_name: Option<String>,
    pub passing_score: i32,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        Self {
            id: course.id,
            title: course.title,
            description: course.description,
            language: course.language,
            level: course.level,
            teacher_id: course.teacher_id,
            teacher_name: None,
            passing_score: course.passing_score,
            is_published: course.is_published,
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }
}

/// Course list response
#[derive(Debug, Serialize)]
pub struct CoursesListResponse {
    pub courses: Vec<CourseResponse>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

/// Students enrolled in a course
#[derive(Debug, Serialize)]
pub struct CourseEnrollmentsResponse {
    pub students: Vec<EnrolledStudent>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}
