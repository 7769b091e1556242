//! Lesson request DTOs

use std::collections::HashMap;

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    constants::{MAX_LESSON_CONTENT_LENGTH, MAX_LESSON_TITLE_LENGTH},
    models::Quiz,
};

/// Create lesson request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLessonRequest {
    #[validate(length(min = 1, max = MAX_LESSON_TITLE_LENGTH))]
    pub title: String,

    #[validate(length(max = MAX_LESSON_CONTENT_LENGTH))]
    #[serde(default)]
    pub content: String,

    /// Zero-based slot; appended when omitted
    #[validate(range(min = 0))]
    pub position: Option<i32>,

    pub quiz: Option<Quiz>,
}

/// Update lesson request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLessonRequest {
    #[validate(length(min = 1, max = MAX_LESSON_TITLE_LENGTH))]
    pub title: Option<String>,

    #[validate(length(max = MAX_LESSON_CONTENT_LENGTH))]
    pub content: Option<String>,

    /// Replaces the quiz
    pub quiz: Option<Quiz>,

    /// Removes the quiz; ignored when `quiz` is given
    #[serde(default)]
    pub remove_quiz: bool,
}

/// Reorder lessons request
#[derive(Debug, Deserialize)]
pub struct ReorderLessonsRequest {
    /// Every lesson of the course, in the new order
    pub lesson_ids: Vec<Uuid>,
}

/// Quiz submission: question id -> chosen option index
#[derive(Debug, Deserialize)]
pub struct SubmitQuizRequest {
    pub answers: HashMap<String, usize>,
}
