//! Business logic services

pub mod admin_service;
pub mod auth_service;
pub mod certificate_service;
pub mod course_service;
pub mod enrollment_service;
pub mod lesson_service;
pub mod progress_service;
pub mod security_log_service;
pub mod user_service;

pub use admin_service::AdminService;
pub use auth_service::AuthService;
pub use certificate_service::CertificateService;
pub use course_service::CourseService;
pub use enrollment_service::EnrollmentService;
pub use lesson_service::LessonService;
pub use progress_service::ProgressService;
pub use security_log_service::SecurityLogService;
pub use user_service::UserService;
