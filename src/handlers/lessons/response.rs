//! Lesson response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Lesson, QuestionOutcome, Quiz, QuizView};

/// Quiz as embedded in a lesson response
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum LessonQuiz {
    /// With the answer key, for the course's managers
    Full(Quiz),
    /// Without the answer key, for learners
    View(QuizView),
}

/// Lesson response
#[derive(Debug, Serialize)]
pub struct LessonResponse {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub content: String,
    pub position: i32,
    pub has_quiz: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz: Option<LessonQuiz>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LessonResponse {
    /// Build the response, hiding correct answers unless `with_answers`
    pub fn new(lesson: Lesson, with_answers: bool) -> Self {
        let has_quiz = lesson.has_quiz();
        let quiz = lesson.quiz.map(|quiz| {
            if with_answers {
                LessonQuiz::Full(quiz.0)
            } else {
                LessonQuiz::View(quiz.0.view())
            }
        });

        Self {
            id: lesson.id,
            course_id: lesson.course_id,
            title: lesson.title,
            content: lesson.content,
            position: lesson.position,
            has_quiz,
            quiz,
            created_at: lesson.created_at,
            updated_at: lesson.updated_at,
        }
    }
}

/// Lessons of a course
#[derive(Debug, Serialize)]
pub struct LessonsListResponse {
    pub course_id: Uuid,
    pub lessons: Vec<LessonResponse>,
}

/// Graded quiz attempt
#[derive(Debug, Serialize)]
pub struct QuizResultResponse {
    pub lesson_id: Uuid,
    pub earned_points: i32,
    pub total_points: i32,
    pub percentage: i32,
    pub passed: bool,
    pub best_percentage: i32,
    pub results: Vec<QuestionOutcome>,
    /// Course progress after this attempt
    pub progress: i32,
    pub course_completed: bool,
}
