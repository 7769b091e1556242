//! Database repositories
//!
//! Repositories handle all direct database interactions.

pub mod certificate_repo;
pub mod completion_repo;
pub mod course_repo;
pub mod enrollment_repo;
pub mod lesson_repo;
pub mod security_log_repo;
pub mod user_repo;

pub use certificate_repo::CertificateRepository;
pub use completion_repo::{CompletionRepository, CourseProgressStats};
pub use course_repo::{CourseFilter, CourseRepository};
pub use enrollment_repo::EnrollmentRepository;
pub use lesson_repo::LessonRepository;
pub use security_log_repo::SecurityLogRepository;
pub use user_repo::UserRepository;
