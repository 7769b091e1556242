//! Course request DTOs

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::constants::{MAX_COURSE_DESCRIPTION_LENGTH, MAX_COURSE_TITLE_LENGTH};

/// Create course request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCourseRequest {
    #[validate(length(min = 1, max = MAX_COURSE_TITLE_LENGTH))]
    pub title: String,

    #[validate(length(max = MAX_COURSE_DESCRIPTION_LENGTH))]
    pub description: Option<String>,

    /// Language being taught
    #[validate(length(min = 1, max = 64))]
    pub language: String,

    /// beginner, intermediate or advanced
    pub level: String,

    #[validate(range(min = 0, max = 100))]
    pub passing_score: Option<i32>,

    pub is_published: Option<bool>,
}

/// Update course request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCourseRequest {
    #[validate(length(min = 1, max = MAX_COURSE_TITLE_LENGTH))]
    pub title: Option<String>,

    #[validate(length(max = MAX_COURSE_DESCRIPTION_LENGTH))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 64))]
    pub language: Option<String>,

    pub level: Option<String>,

    #[validate(range(min = 0, max = 100))]
    pub passing_score: Option<i32>,

    pub is_published: Option<bool>,
}

/// List courses query parameters
#[derive(Debug, Deserialize)]
pub struct ListCoursesQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub language: Option<String>,
    pub level: Option<String>,
    pub teacher_id: Option<Uuid>,
    pub search: Option<String>,
    /// Only the caller's own courses, drafts included
    pub mine: Option<bool>,
}

/// Pagination for per-course listings
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}
