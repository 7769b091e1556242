//! Lesson and quiz models
//!
//! A lesson optionally embeds a quiz, stored as JSONB next to the lesson row.
//! Grading is pure so it can be exercised without a database.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use uuid::Uuid;

use crate::constants::{MAX_QUIZ_OPTIONS, MAX_QUIZ_QUESTIONS};

/// Lesson database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Lesson {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub content: String,
    /// Zero-based order within the course
    pub position: i32,
    pub quiz: Option<Json<Quiz>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lesson {
    pub fn has_quiz(&self) -> bool {
        self.quiz.is_some()
    }
}

/// A multiple-choice quiz
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub questions: Vec<QuizQuestion>,
}

/// A single quiz question, including its answer key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_option: usize,
    #[serde(default = "default_points")]
    pub points: i32,
}

fn default_points() -> i32 {
    1
}

/// Quiz as shown to learners: no answer key
#[derive(Debug, Clone, Serialize)]
pub struct QuizView {
    pub questions: Vec<QuestionView>,
    pub total_points: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub id: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub points: i32,
}

/// Outcome of grading one submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizGrade {
    pub earned_points: i32,
    pub total_points: i32,
    pub percentage: i32,
    pub passed: bool,
    pub results: Vec<QuestionOutcome>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionOutcome {
    pub question_id: String,
    pub selected_option: Option<usize>,
    pub correct: bool,
}

impl Quiz {
    /// Structural checks applied when a teacher saves a quiz
    pub fn validate(&self) -> Result<(), String> {
        if self.questions.is_empty() {
            return Err("Quiz must contain at least one question".to_string());
        }
        if self.questions.len() > MAX_QUIZ_QUESTIONS {
            return Err(format!(
                "Quiz cannot contain more than {} questions",
                MAX_QUIZ_QUESTIONS
            ));
        }

        let mut seen = HashSet::new();
        for question in &self.questions {
            if question.id.trim().is_empty() {
                return Err("Question id cannot be empty".to_string());
            }
            if !seen.insert(question.id.as_str()) {
                return Err(format!("Duplicate question id: {}", question.id));
            }
            if question.prompt.trim().is_empty() {
                return Err(format!("Question {} has an empty prompt", question.id));
            }
            if question.options.len() < 2 || question.options.len() > MAX_QUIZ_OPTIONS {
                return Err(format!(
                    "Question {} must have between 2 and {} options",
                    question.id, MAX_QUIZ_OPTIONS
                ));
            }
            if question.correct_option >= question.options.len() {
                return Err(format!(
                    "Question {} has an out-of-range correct option",
                    question.id
                ));
            }
            if question.points < 1 {
                return Err(format!("Question {} must be worth at least 1 point", question.id));
            }
        }

        Ok(())
    }

    pub fn total_points(&self) -> i32 {
        self.questions.iter().map(|q| q.points).sum()
    }

    /// Strip the answer key
    pub fn view(&self) -> QuizView {
        QuizView {
            questions: self
                .questions
                .iter()
                .map(|q| QuestionView {
                    id: q.id.clone(),
                    prompt: q.prompt.clone(),
                    options: q.options.clone(),
                    points: q.points,
                })
                .collect(),
            total_points: self.total_points(),
        }
    }

    /// Grade a submission keyed by question id.
    ///
    /// Answers for unknown questions are ignored and unanswered questions earn
    /// nothing. The percentage is rounded half-up.
    pub fn grade(&self, answers: &HashMap<String, usize>, passing_score: i32) -> QuizGrade {
        let mut earned_points = 0;
        let results = self
            .questions
            .iter()
            .map(|question| {
                let selected_option = answers.get(&question.id).copied();
                let correct = selected_option == Some(question.correct_option);
                if correct {
                    earned_points += question.points;
                }
                QuestionOutcome {
                    question_id: question.id.clone(),
                    selected_option,
                    correct,
                }
            })
            .collect();

        let total_points = self.total_points();
        let percentage = percentage(earned_points, total_points);

        QuizGrade {
            earned_points,
            total_points,
            percentage,
            passed: percentage >= passing_score,
            results,
        }
    }
}

/// `round(earned * 100 / total)`, with an empty quiz counting as full marks
fn percentage(earned: i32, total: i32) -> i32 {
    if total <= 0 {
        return 100;
    }
    let (earned, total) = (earned as i64, total as i64);
    ((earned * 200 + total) / (total * 2)) as i32
}

#[cfg(test)]
pub(crate) fn sample_quiz() -> Quiz {
    Quiz {
        questions: vec![
            QuizQuestion {
                id: "q1".to_string(),
                prompt: "¿Cómo estás? means...".to_string(),
                options: vec!["How are you?".to_string(), "Where are you?".to_string()],
                correct_option: 0,
                points: 2,
            },
            QuizQuestion {
                id: "q2".to_string(),
                prompt: "Translate 'cat'".to_string(),
                options: vec!["perro".to_string(), "gato".to_string(), "pájaro".to_string()],
                correct_option: 1,
                points: 1,
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(pairs: &[(&str, usize)]) -> HashMap<String, usize> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_grade_all_correct() {
        let grade = sample_quiz().grade(&answers(&[("q1", 0), ("q2", 1)]), 70);
        assert_eq!(grade.earned_points, 3);
        assert_eq!(grade.total_points, 3);
        assert_eq!(grade.percentage, 100);
        assert!(grade.passed);
        assert!(grade.results.iter().all(|r| r.correct));
    }

    #[test]
    fn test_grade_weights_points() {
        // Only the 2-point question right: 2/3 = 66.67 -> 67
        let grade = sample_quiz().grade(&answers(&[("q1", 0), ("q2", 2)]), 70);
        assert_eq!(grade.earned_points, 2);
        assert_eq!(grade.percentage, 67);
        assert!(!grade.passed);

        let lenient = sample_quiz().grade(&answers(&[("q1", 0), ("q2", 2)]), 67);
        assert!(lenient.passed);
    }

    #[test]
    fn test_grade_ignores_unknown_and_missing_answers() {
        let grade = sample_quiz().grade(&answers(&[("q2", 1), ("bogus", 0)]), 30);
        assert_eq!(grade.earned_points, 1);
        assert_eq!(grade.percentage, 33);
        assert!(grade.passed);
        assert_eq!(grade.results.len(), 2);
        assert_eq!(grade.results[0].selected_option, None);
        assert!(!grade.results[0].correct);
    }

    #[test]
    fn test_percentage_rounds_half_up() {
        assert_eq!(percentage(1, 8), 13); // 12.5
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(0, 5), 0);
        assert_eq!(percentage(0, 0), 100);
    }

    #[test]
    fn test_validate_rejects_bad_quizzes() {
        assert!(sample_quiz().validate().is_ok());
        assert!(Quiz { questions: vec![] }.validate().is_err());

        let mut dup = sample_quiz();
        dup.questions[1].id = "q1".to_string();
        assert!(dup.validate().is_err());

        let mut out_of_range = sample_quiz();
        out_of_range.questions[0].correct_option = 2;
        assert!(out_of_range.validate().is_err());

        let mut one_option = sample_quiz();
        one_option.questions[0].options.truncate(1);
        one_option.questions[0].correct_option = 0;
        assert!(one_option.validate().is_err());

        let mut zero_points = sample_quiz();
        zero_points.questions[1].points = 0;
        assert!(zero_points.validate().is_err());
    }

    #[test]
    fn test_view_hides_answer_key() {
        let view = serde_json::to_value(sample_quiz().view()).unwrap();
        assert_eq!(view["total_points"], 3);
        assert!(view["questions"][0].get("correct_option").is_none());
    }

    #[test]
    fn test_points_default_to_one() {
        let quiz: Quiz = serde_json::from_str(
            r#"{"questions":[{"id":"a","prompt":"p","options":["x","y"],"correct_option":1}]}"#,
        )
        .unwrap();
        assert_eq!(quiz.questions[0].points, 1);
    }
}
