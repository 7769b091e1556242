//! Database-backed tests for enrollment, progress and lesson ordering
//!
//! These call the services directly against a real PostgreSQL database; see
//! `common` for how the database is provisioned.

mod common;

use std::collections::HashMap;

use lingualearn::{
    constants::roles,
    db::repositories::{CertificateRepository, EnrollmentRepository, LessonRepository},
    error::AppError,
    models::EnrollmentStatus,
    realtime::ServerMessage,
    services::{
        AdminService, CertificateService, EnrollmentService, LessonService, ProgressService,
    },
};
use uuid::Uuid;

use common::{
    add_lesson, create_user, fresh_database, hub, learning, pool_with_size, published_course,
    test_pool, two_question_quiz,
};

fn answers(pairs: &[(&str, usize)]) -> HashMap<String, usize> {
    pairs.iter().map(|(id, option)| (id.to_string(), *option)).collect()
}

async fn status_of(pool: &sqlx::PgPool, user_id: &Uuid, course_id: &Uuid) -> Option<EnrollmentStatus> {
    EnrollmentRepository::find(pool, user_id, course_id)
        .await
        .expect("enrollment lookup")
        .and_then(|e| e.status())
}

#[tokio::test]
async fn test_enroll_reactivates_dropped_enrollment() {
    let pool = test_pool().await;
    let teacher = create_user(&pool, "teacher", roles::TEACHER).await;
    let student = create_user(&pool, "student", roles::STUDENT).await;
    let course = published_course(&pool, &teacher, 70).await;
    add_lesson(&pool, &course, &teacher, "Greetings", None, None).await;

    let first = EnrollmentService::enroll(&pool, &student.id, &course.id)
        .await
        .expect("enroll");
    EnrollmentService::drop_course(&pool, &student.id, &course.id)
        .await
        .expect("drop");
    let again = EnrollmentService::enroll(&pool, &student.id, &course.id)
        .await
        .expect("re-enroll");

    assert_eq!(again.id, first.id);
    assert_eq!(again.status(), Some(EnrollmentStatus::Active));
}

#[tokio::test]
async fn test_duplicate_enroll_conflicts() {
    let pool = test_pool().await;
    let teacher = create_user(&pool, "teacher", roles::TEACHER).await;
    let student = create_user(&pool, "student", roles::STUDENT).await;
    let course = published_course(&pool, &teacher, 70).await;

    EnrollmentService::enroll(&pool, &student.id, &course.id)
        .await
        .expect("enroll");
    let result = EnrollmentService::enroll(&pool, &student.id, &course.id).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_quiz_submission_requires_active_enrollment() {
    let pool = test_pool().await;
    let (learning, hub) = (learning(), hub());
    let teacher = create_user(&pool, "teacher", roles::TEACHER).await;
    let student = create_user(&pool, "student", roles::STUDENT).await;
    let course = published_course(&pool, &teacher, 70).await;
    let quiz = two_question_quiz();
    let lesson = add_lesson(&pool, &course, &teacher, "Greetings", None, Some(&quiz)).await;
    let correct = answers(&[("q1", 0), ("q2", 0)]);

    let result =
        ProgressService::submit_quiz(&pool, &learning, &hub, &student.id, &lesson.id, &correct).await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));

    EnrollmentService::enroll(&pool, &student.id, &course.id)
        .await
        .expect("enroll");
    EnrollmentService::drop_course(&pool, &student.id, &course.id)
        .await
        .expect("drop");

    let result =
        ProgressService::submit_quiz(&pool, &learning, &hub, &student.id, &lesson.id, &correct).await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn test_quiz_lesson_cannot_be_completed_manually() {
    let pool = test_pool().await;
    let (learning, hub) = (learning(), hub());
    let teacher = create_user(&pool, "teacher", roles::TEACHER).await;
    let student = create_user(&pool, "student", roles::STUDENT).await;
    let course = published_course(&pool, &teacher, 70).await;
    let quiz = two_question_quiz();
    let lesson = add_lesson(&pool, &course, &teacher, "Greetings", None, Some(&quiz)).await;
    EnrollmentService::enroll(&pool, &student.id, &course.id)
        .await
        .expect("enroll");

    let result =
        ProgressService::complete_lesson(&pool, &learning, &hub, &student.id, &lesson.id).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_best_quiz_score_is_kept() {
    let pool = test_pool().await;
    let (learning, hub) = (learning(), hub());
    let teacher = create_user(&pool, "teacher", roles::TEACHER).await;
    let student = create_user(&pool, "student", roles::STUDENT).await;
    let course = published_course(&pool, &teacher, 50).await;
    let quiz = two_question_quiz();
    let lesson = add_lesson(&pool, &course, &teacher, "Greetings", None, Some(&quiz)).await;
    add_lesson(&pool, &course, &teacher, "Numbers", None, None).await;
    EnrollmentService::enroll(&pool, &student.id, &course.id)
        .await
        .expect("enroll");

    let perfect = ProgressService::submit_quiz(
        &pool,
        &learning,
        &hub,
        &student.id,
        &lesson.id,
        &answers(&[("q1", 0), ("q2", 0)]),
    )
    .await
    .expect("first attempt");
    assert!(perfect.grade.passed);
    assert_eq!(perfect.best_percentage, 100);

    let worse = ProgressService::submit_quiz(
        &pool,
        &learning,
        &hub,
        &student.id,
        &lesson.id,
        &answers(&[("q1", 1), ("q2", 1)]),
    )
    .await
    .expect("second attempt");

    assert!(!worse.grade.passed);
    assert_eq!(worse.grade.percentage, 0);
    assert_eq!(worse.best_percentage, 100);
    assert_eq!(worse.completion.quiz_scores.0.get(&lesson.id), Some(&100));
    assert!(worse.completion.completed_lesson_ids.contains(&lesson.id));
    assert_eq!(worse.completion.progress, 50);
}

#[tokio::test]
async fn test_course_completion_issues_a_single_certificate() {
    let pool = test_pool().await;
    let (learning, hub) = (learning(), hub());
    let mut events = hub.subscribe();
    let teacher = create_user(&pool, "teacher", roles::TEACHER).await;
    let student = create_user(&pool, "student", roles::STUDENT).await;
    let course = published_course(&pool, &teacher, 70).await;
    let lesson = add_lesson(&pool, &course, &teacher, "Greetings", None, None).await;
    EnrollmentService::enroll(&pool, &student.id, &course.id)
        .await
        .expect("enroll");

    let completion =
        ProgressService::complete_lesson(&pool, &learning, &hub, &student.id, &lesson.id)
            .await
            .expect("complete lesson");
    assert!(completion.is_completed);
    assert_eq!(completion.progress, 100);
    assert_eq!(
        status_of(&pool, &student.id, &course.id).await,
        Some(EnrollmentStatus::Completed)
    );

    let first = CertificateService::issue_certificate(&pool, &learning, &hub, &student.id, &course.id)
        .await
        .expect("issue");
    let second = CertificateService::issue_certificate(&pool, &learning, &hub, &student.id, &course.id)
        .await
        .expect("issue again");

    assert_eq!(first.id, second.id);
    assert_eq!(first.verification_code, second.verification_code);
    assert_eq!(CertificateRepository::count(&pool).await.expect("count"), 1);

    let mut issued = 0;
    while let Ok(envelope) = events.try_recv() {
        if matches!(envelope.message, ServerMessage::CertificateIssued { .. }) {
            issued += 1;
        }
    }
    assert_eq!(issued, 1);
}

#[tokio::test]
async fn test_insert_shifts_and_delete_compacts_positions() {
    let pool = test_pool().await;
    let teacher = create_user(&pool, "teacher", roles::TEACHER).await;
    let course = published_course(&pool, &teacher, 70).await;
    let a = add_lesson(&pool, &course, &teacher, "A", None, None).await;
    let b = add_lesson(&pool, &course, &teacher, "B", None, None).await;
    let c = add_lesson(&pool, &course, &teacher, "C", None, None).await;

    let inserted = add_lesson(&pool, &course, &teacher, "Inserted", Some(1), None).await;
    assert_eq!(inserted.position, 1);

    let order = |lessons: Vec<lingualearn::models::Lesson>| {
        lessons
            .into_iter()
            .map(|l| (l.id, l.position))
            .collect::<Vec<_>>()
    };

    let lessons = LessonRepository::list_by_course(&pool, &course.id)
        .await
        .expect("list");
    assert_eq!(
        order(lessons),
        vec![(a.id, 0), (inserted.id, 1), (b.id, 2), (c.id, 3)]
    );

    LessonService::delete_lesson(&pool, &a.id, &teacher.id, roles::TEACHER)
        .await
        .expect("delete");

    let lessons = LessonRepository::list_by_course(&pool, &course.id)
        .await
        .expect("list");
    assert_eq!(order(lessons), vec![(inserted.id, 0), (b.id, 1), (c.id, 2)]);
}

#[tokio::test]
async fn test_reorder_checks_ordering_against_current_lessons() {
    let pool = test_pool().await;
    let teacher = create_user(&pool, "teacher", roles::TEACHER).await;
    let course = published_course(&pool, &teacher, 70).await;
    let a = add_lesson(&pool, &course, &teacher, "A", None, None).await;
    let b = add_lesson(&pool, &course, &teacher, "B", None, None).await;
    let c = add_lesson(&pool, &course, &teacher, "C", None, None).await;

    // A lesson removed after the client loaded the list
    LessonService::delete_lesson(&pool, &c.id, &teacher.id, roles::TEACHER)
        .await
        .expect("delete");
    let stale = LessonService::reorder_lessons(
        &pool,
        &course.id,
        &teacher.id,
        roles::TEACHER,
        &[c.id, b.id, a.id],
    )
    .await;
    assert!(matches!(stale, Err(AppError::Validation(_))));

    let unchanged = LessonRepository::list_by_course(&pool, &course.id)
        .await
        .expect("list");
    assert_eq!(
        unchanged.iter().map(|l| l.id).collect::<Vec<_>>(),
        vec![a.id, b.id]
    );

    let reordered =
        LessonService::reorder_lessons(&pool, &course.id, &teacher.id, roles::TEACHER, &[b.id, a.id])
            .await
            .expect("reorder");
    assert_eq!(
        reordered.iter().map(|l| (l.id, l.position)).collect::<Vec<_>>(),
        vec![(b.id, 0), (a.id, 1)]
    );
}

#[tokio::test]
async fn test_admin_cannot_act_against_own_account() {
    let pool = test_pool().await;
    let admin = create_user(&pool, "admin", roles::ADMIN).await;

    let demote = AdminService::update_user_role(&pool, &admin.id, &admin.id, roles::STUDENT, None).await;
    assert!(matches!(demote, Err(AppError::Forbidden(_))));

    let suspend = AdminService::suspend_user(&pool, &admin.id, &admin.id, Some("test"), None, None).await;
    assert!(matches!(suspend, Err(AppError::Forbidden(_))));

    let delete = AdminService::delete_user(&pool, &admin.id, &admin.id, None).await;
    assert!(matches!(delete, Err(AppError::Forbidden(_))));

    let still_admin = AdminService::update_user_role(&pool, &admin.id, &admin.id, roles::ADMIN, None)
        .await
        .expect("keep own admin role");
    assert_eq!(still_admin.role, roles::ADMIN);
    assert!(!still_admin.is_suspended);
}

#[tokio::test]
async fn test_progress_updates_run_on_a_single_connection_pool() {
    let pool = pool_with_size(&fresh_database().await, 1).await;
    let (learning, hub) = (learning(), hub());
    let teacher = create_user(&pool, "teacher", roles::TEACHER).await;
    let student = create_user(&pool, "student", roles::STUDENT).await;
    let course = published_course(&pool, &teacher, 50).await;
    let quiz = two_question_quiz();
    let reading = add_lesson(&pool, &course, &teacher, "Reading", None, None).await;
    let graded = add_lesson(&pool, &course, &teacher, "Graded", None, Some(&quiz)).await;
    EnrollmentService::enroll(&pool, &student.id, &course.id)
        .await
        .expect("enroll");

    let completion =
        ProgressService::complete_lesson(&pool, &learning, &hub, &student.id, &reading.id)
            .await
            .expect("complete lesson on a one-connection pool");
    assert_eq!(completion.progress, 50);

    let attempt = ProgressService::submit_quiz(
        &pool,
        &learning,
        &hub,
        &student.id,
        &graded.id,
        &answers(&[("q1", 0), ("q2", 0)]),
    )
    .await
    .expect("submit quiz on a one-connection pool");
    assert!(attempt.completion.is_completed);

    let progress = ProgressService::get_progress(&pool, &learning, &hub, &student.id, &course.id)
        .await
        .expect("progress on a one-connection pool");
    assert_eq!(progress.progress, 100);
}

#[tokio::test]
async fn test_dropped_learner_who_finishes_stays_completed() {
    let pool = test_pool().await;
    let (learning, hub) = (learning(), hub());
    let teacher = create_user(&pool, "teacher", roles::TEACHER).await;
    let student = create_user(&pool, "student", roles::STUDENT).await;
    let course = published_course(&pool, &teacher, 70).await;
    let first = add_lesson(&pool, &course, &teacher, "Greetings", None, None).await;
    let second = add_lesson(&pool, &course, &teacher, "Numbers", None, None).await;
    EnrollmentService::enroll(&pool, &student.id, &course.id)
        .await
        .expect("enroll");

    ProgressService::complete_lesson(&pool, &learning, &hub, &student.id, &first.id)
        .await
        .expect("complete first lesson");
    EnrollmentService::drop_course(&pool, &student.id, &course.id)
        .await
        .expect("drop");

    // Removing the only unfinished lesson completes the course for the dropped learner
    LessonService::delete_lesson(&pool, &second.id, &teacher.id, roles::TEACHER)
        .await
        .expect("delete");
    let progress = ProgressService::get_progress(&pool, &learning, &hub, &student.id, &course.id)
        .await
        .expect("progress");

    assert!(progress.is_completed);
    assert_eq!(
        status_of(&pool, &student.id, &course.id).await,
        Some(EnrollmentStatus::Completed)
    );

    let drop_again = EnrollmentService::drop_course(&pool, &student.id, &course.id).await;
    assert!(matches!(drop_again, Err(AppError::Conflict(_))));

    let reenroll = EnrollmentService::enroll(&pool, &student.id, &course.id).await;
    assert!(matches!(reenroll, Err(AppError::Conflict(_))));
    assert_eq!(
        status_of(&pool, &student.id, &course.id).await,
        Some(EnrollmentStatus::Completed)
    );
}

#[tokio::test]
async fn test_reenrolling_after_finishing_restores_completed_status() {
    let pool = test_pool().await;
    let (learning, hub) = (learning(), hub());
    let teacher = create_user(&pool, "teacher", roles::TEACHER).await;
    let student = create_user(&pool, "student", roles::STUDENT).await;
    let course = published_course(&pool, &teacher, 70).await;
    let lesson = add_lesson(&pool, &course, &teacher, "Greetings", None, None).await;
    EnrollmentService::enroll(&pool, &student.id, &course.id)
        .await
        .expect("enroll");
    ProgressService::complete_lesson(&pool, &learning, &hub, &student.id, &lesson.id)
        .await
        .expect("complete");

    // A dropped row next to a finished completion, as left behind by older releases
    EnrollmentRepository::set_status(&pool, &student.id, &course.id, EnrollmentStatus::Dropped.as_str())
        .await
        .expect("force dropped");

    let enrollment = EnrollmentService::enroll(&pool, &student.id, &course.id)
        .await
        .expect("re-enroll");

    assert_eq!(enrollment.status(), Some(EnrollmentStatus::Completed));
    let drop_again = EnrollmentService::drop_course(&pool, &student.id, &course.id).await;
    assert!(matches!(drop_again, Err(AppError::Conflict(_))));
}
