//! Completion model and progress bookkeeping
//!
//! A completion tracks one learner's progress through one course. Progress is
//! always recomputed from the course's current lesson list, so lessons that
//! were deleted or reordered since the learner finished them are accounted for.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use uuid::Uuid;

/// Completion database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Completion {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub completed_lesson_ids: Vec<Uuid>,
    /// Best quiz percentage per lesson
    pub quiz_scores: Json<BTreeMap<Uuid, i32>>,
    pub progress: i32,
    /// Mean of the best quiz percentages
    pub score: Option<i32>,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl Completion {
    /// Mark a lesson done. Returns false if it already was.
    pub fn mark_lesson(&mut self, lesson_id: Uuid) -> bool {
        if self.completed_lesson_ids.contains(&lesson_id) {
            return false;
        }
        self.completed_lesson_ids.push(lesson_id);
        true
    }

    /// Keep the best percentage seen for a lesson and return it
    pub fn record_quiz_score(&mut self, lesson_id: Uuid, percentage: i32) -> i32 {
        let best = self.quiz_scores.0.entry(lesson_id).or_insert(percentage);
        if percentage > *best {
            *best = percentage;
        }
        *best
    }

    /// Recompute progress and score against the course's lessons, ordered by
    /// position. Returns true when this call completes the course.
    ///
    /// Completion is sticky: lessons added after a learner finished lower the
    /// displayed progress but never revoke the completion.
    pub fn apply_progress(&mut self, ordered_lesson_ids: &[Uuid], now: DateTime<Utc>) -> bool {
        self.completed_lesson_ids =
            normalize_lesson_ids(&self.completed_lesson_ids, ordered_lesson_ids);
        self.quiz_scores
            .0
            .retain(|lesson_id, _| ordered_lesson_ids.contains(lesson_id));

        self.progress = progress_percent(self.completed_lesson_ids.len(), ordered_lesson_ids.len());
        self.score = average_score(&self.quiz_scores.0);

        if !self.is_completed && self.progress == 100 {
            self.is_completed = true;
            self.completed_at = Some(now);
            return true;
        }

        false
    }
}

/// De-duplicate completed lesson IDs, drop ones no longer in the course and
/// order the rest by lesson position.
pub fn normalize_lesson_ids(completed: &[Uuid], ordered_lesson_ids: &[Uuid]) -> Vec<Uuid> {
    ordered_lesson_ids
        .iter()
        .filter(|id| completed.contains(id))
        .copied()
        .collect()
}

/// `floor(completed * 100 / total)`; a course without lessons is at 0
pub fn progress_percent(completed: usize, total: usize) -> i32 {
    if total == 0 {
        return 0;
    }
    ((completed.min(total) * 100) / total) as i32
}

/// Rounded mean of quiz percentages, `None` when nothing was graded
pub fn average_score(scores: &BTreeMap<Uuid, i32>) -> Option<i32> {
    if scores.is_empty() {
        return None;
    }
    let sum: i64 = scores.values().map(|&s| s as i64).sum();
    let count = scores.len() as i64;
    Some(((sum * 2 + count) / (count * 2)) as i32)
}

#[cfg(test)]
pub(crate) fn empty_completion(user_id: Uuid, course_id: Uuid) -> Completion {
    Completion {
        id: Uuid::new_v4(),
        user_id,
        course_id,
        completed_lesson_ids: Vec::new(),
        quiz_scores: Json(BTreeMap::new()),
        progress: 0,
        score: None,
        is_completed: false,
        completed_at: None,
        updated_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn test_normalize_dedupes_filters_and_orders() {
        let lessons = ids(4);
        let stale = Uuid::new_v4();
        let completed = vec![lessons[2], stale, lessons[0], lessons[2]];

        let normalized = normalize_lesson_ids(&completed, &lessons);
        assert_eq!(normalized, vec![lessons[0], lessons[2]]);
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(progress_percent(0, 0), 0);
        assert_eq!(progress_percent(0, 3), 0);
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 66);
        assert_eq!(progress_percent(3, 3), 100);
        assert_eq!(progress_percent(5, 3), 100);
    }

    #[test]
    fn test_average_score() {
        let mut scores = BTreeMap::new();
        assert_eq!(average_score(&scores), None);

        scores.insert(Uuid::new_v4(), 80);
        scores.insert(Uuid::new_v4(), 85);
        assert_eq!(average_score(&scores), Some(83)); // 82.5 rounds up
    }

    #[test]
    fn test_record_quiz_score_keeps_best() {
        let mut completion = empty_completion(Uuid::new_v4(), Uuid::new_v4());
        let lesson = Uuid::new_v4();

        assert_eq!(completion.record_quiz_score(lesson, 60), 60);
        assert_eq!(completion.record_quiz_score(lesson, 90), 90);
        assert_eq!(completion.record_quiz_score(lesson, 40), 90);
    }

    #[test]
    fn test_apply_progress_completes_once() {
        let lessons = ids(2);
        let mut completion = empty_completion(Uuid::new_v4(), Uuid::new_v4());
        let now = Utc::now();

        assert!(completion.mark_lesson(lessons[0]));
        assert!(!completion.mark_lesson(lessons[0]));
        assert!(!completion.apply_progress(&lessons, now));
        assert_eq!(completion.progress, 50);

        completion.mark_lesson(lessons[1]);
        completion.record_quiz_score(lessons[1], 90);
        assert!(completion.apply_progress(&lessons, now));
        assert_eq!(completion.progress, 100);
        assert_eq!(completion.score, Some(90));
        assert_eq!(completion.completed_at, Some(now));

        // Already complete: no second transition
        assert!(!completion.apply_progress(&lessons, Utc::now()));
        assert_eq!(completion.completed_at, Some(now));
    }

    #[test]
    fn test_apply_progress_drops_deleted_lessons() {
        let lessons = ids(3);
        let mut completion = empty_completion(Uuid::new_v4(), Uuid::new_v4());
        completion.mark_lesson(lessons[0]);
        completion.mark_lesson(lessons[1]);
        completion.record_quiz_score(lessons[1], 50);

        // Lesson 1 is deleted from the course
        let remaining = vec![lessons[0], lessons[2]];
        completion.apply_progress(&remaining, Utc::now());

        assert_eq!(completion.completed_lesson_ids, vec![lessons[0]]);
        assert!(completion.quiz_scores.0.is_empty());
        assert_eq!(completion.progress, 50);
        assert_eq!(completion.score, None);
    }

    #[test]
    fn test_empty_course_never_completes() {
        let mut completion = empty_completion(Uuid::new_v4(), Uuid::new_v4());
        assert!(!completion.apply_progress(&[], Utc::now()));
        assert_eq!(completion.progress, 0);
        assert!(!completion.is_completed);
    }
}
