//! Shared database fixtures for the integration tests
//!
//! `TEST_DATABASE_URL` points the tests at an existing server. Without it a
//! PostgreSQL container is started on first use and shared by every test in
//! the binary. Each test gets its own freshly migrated database.

#![allow(dead_code)]

use std::time::Duration;

use sqlx::{PgPool, postgres::PgPoolOptions};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use uuid::Uuid;

use lingualearn::{
    config::LearningConfig,
    constants::roles,
    db::{self, repositories::UserRepository},
    models::{Course, Lesson, Quiz, QuizQuestion, User},
    realtime::RealtimeHub,
    services::{CourseService, LessonService},
};

/// Server URL without a database name, plus the container backing it
static SERVER: OnceCell<(Option<ContainerAsync<Postgres>>, String)> = OnceCell::const_new();

async fn server_url() -> &'static str {
    let (_, url) = SERVER
        .get_or_init(|| async {
            if let Ok(url) = std::env::var("TEST_DATABASE_URL") {
                let base = url.rsplit_once('/').map(|(base, _)| base.to_string()).unwrap_or(url);
                return (None, base);
            }

            let container = Postgres::default()
                .with_user("lingualearn")
                .with_password("lingualearn_test")
                .with_db_name("lingualearn")
                .start()
                .await
                .expect("Failed to start PostgreSQL container");
            let host = container.get_host().await.expect("container host");
            let port = container
                .get_host_port_ipv4(5432)
                .await
                .expect("container port");

            let url = format!("postgres://lingualearn:lingualearn_test@{}:{}", host, port);
            (Some(container), url)
        })
        .await;

    url
}

/// Create an empty database with migrations applied and return its URL
pub async fn fresh_database() -> String {
    let server = server_url().await;
    let name = format!("test_{}", Uuid::new_v4().simple());

    let admin = PgPoolOptions::new()
        .max_connections(1)
        .connect(&format!("{}/postgres", server))
        .await
        .expect("Failed to connect to test server");
    sqlx::query(&format!(r#"CREATE DATABASE "{}""#, name))
        .execute(&admin)
        .await
        .expect("Failed to create test database");
    admin.close().await;

    let url = format!("{}/{}", server, name);
    let pool = PgPool::connect(&url).await.expect("Failed to connect to test database");
    db::run_migrations(&pool).await.expect("Failed to run migrations");
    pool.close().await;

    url
}

/// A pool over a fresh database
pub async fn test_pool() -> PgPool {
    pool_with_size(&fresh_database().await, 5).await
}

/// A pool capped at `size` connections. Acquiring gives up quickly so a
/// request that needs a second connection fails instead of hanging.
pub async fn pool_with_size(url: &str, size: u32) -> PgPool {
    PgPoolOptions::new()
        .max_connections(size)
        .acquire_timeout(Duration::from_secs(3))
        .connect(url)
        .await
        .expect("Failed to connect to test database")
}

pub fn learning() -> LearningConfig {
    LearningConfig::default()
}

pub fn hub() -> RealtimeHub {
    RealtimeHub::new(64)
}

pub async fn create_user(pool: &PgPool, username: &str, role: &str) -> User {
    UserRepository::create(
        pool,
        username,
        &format!("{}@example.com", username),
        "not-a-real-hash",
        None,
        role,
    )
    .await
    .expect("Failed to create user")
}

/// A published course with the given passing score
pub async fn published_course(pool: &PgPool, teacher: &User, passing_score: i32) -> Course {
    CourseService::create_course(
        pool,
        &learning(),
        &teacher.id,
        roles::TEACHER,
        "Spanish for Travellers",
        Some("Everyday phrases"),
        "es",
        "beginner",
        Some(passing_score),
        Some(true),
    )
    .await
    .expect("Failed to create course")
}

/// Append a lesson, optionally with a quiz
pub async fn add_lesson(
    pool: &PgPool,
    course: &Course,
    teacher: &User,
    title: &str,
    position: Option<i32>,
    quiz: Option<&Quiz>,
) -> Lesson {
    LessonService::create_lesson(
        pool,
        &course.id,
        &teacher.id,
        roles::TEACHER,
        title,
        "Lesson content",
        position,
        quiz,
    )
    .await
    .expect("Failed to create lesson")
}

/// Two one-point questions; option 0 is correct for both
pub fn two_question_quiz() -> Quiz {
    let question = |id: &str, prompt: &str| QuizQuestion {
        id: id.to_string(),
        prompt: prompt.to_string(),
        options: vec!["right".to_string(), "wrong".to_string()],
        correct_option: 0,
        points: 1,
    };

    Quiz {
        questions: vec![question("q1", "Hola means?"), question("q2", "Adiós means?")],
    }
}
