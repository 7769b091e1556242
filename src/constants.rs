//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Default per-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum accepted request body size (1 MB)
pub const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

// =============================================================================
// DATABASE DEFAULTS
// =============================================================================

/// Default maximum database connections in the pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 20;

/// Default Redis URL
pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";

// =============================================================================
// AUTHENTICATION DEFAULTS
// =============================================================================

/// Default JWT token expiry in hours
pub const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;

/// Default refresh token expiry in days
pub const DEFAULT_REFRESH_TOKEN_EXPIRY_DAYS: i64 = 7;

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: u64 = 8;

/// Maximum password length
pub const MAX_PASSWORD_LENGTH: u64 = 128;

/// Username minimum length
pub const MIN_USERNAME_LENGTH: u64 = 3;

/// Username maximum length
pub const MAX_USERNAME_LENGTH: u64 = 32;

// =============================================================================
// USER ROLES
// =============================================================================

/// User role identifiers
pub mod roles {
    pub const ADMIN: &str = "admin";
    pub const TEACHER: &str = "teacher";
    pub const STUDENT: &str = "student";

    /// All user roles
    pub const ALL: &[&str] = &[ADMIN, TEACHER, STUDENT];

    /// Roles a user may pick for themselves at registration
    pub const SELF_ASSIGNABLE: &[&str] = &[TEACHER, STUDENT];

    /// Roles allowed to author course content
    pub const AUTHORS: &[&str] = &[ADMIN, TEACHER];
}

// =============================================================================
// COURSE SETTINGS
// =============================================================================

/// Course difficulty levels
pub mod levels {
    pub const BEGINNER: &str = "beginner";
    pub const INTERMEDIATE: &str = "intermediate";
    pub const ADVANCED: &str = "advanced";

    /// All supported levels
    pub const ALL: &[&str] = &[BEGINNER, INTERMEDIATE, ADVANCED];
}

/// Enrollment statuses
pub mod enrollment_status {
    pub const ACTIVE: &str = "active";
    pub const COMPLETED: &str = "completed";
    pub const DROPPED: &str = "dropped";
}

/// Default quiz passing score (percent)
pub const DEFAULT_PASSING_SCORE: i32 = 70;

/// Default certificate verification code prefix
pub const DEFAULT_CERTIFICATE_CODE_PREFIX: &str = "LL";

/// Number of `XXXX` groups in a verification code
pub const CERTIFICATE_CODE_GROUPS: usize = 3;

/// Characters per verification code group
pub const CERTIFICATE_CODE_GROUP_LEN: usize = 4;

// =============================================================================
// SECURITY LOG EVENTS
// =============================================================================

/// Security log event types
pub mod security_events {
    pub const REGISTER: &str = "register";
    pub const LOGIN_SUCCESS: &str = "login_success";
    pub const LOGIN_FAILURE: &str = "login_failure";
    pub const LOGOUT: &str = "logout";
    pub const TOKEN_REFRESH: &str = "token_refresh";
    pub const ACCESS_DENIED: &str = "access_denied";
    pub const ROLE_CHANGED: &str = "role_changed";
    pub const USER_SUSPENDED: &str = "user_suspended";
    pub const USER_REACTIVATED: &str = "user_reactivated";
    pub const USER_DELETED: &str = "user_deleted";
}

// =============================================================================
// API VERSIONING
// =============================================================================

/// Current API version
pub const API_VERSION: &str = "v1";

/// API base path
pub const API_BASE_PATH: &str = "/api/v1";

// =============================================================================
// RATE LIMITING
// =============================================================================

/// Rate limiting configuration
pub mod rate_limits {
    /// Auth endpoint - max requests
    pub const AUTH_MAX_REQUESTS: i64 = 5;
    /// Auth endpoint - window in seconds
    pub const AUTH_WINDOW_SECS: i64 = 60;

    /// Quiz submission endpoint - max requests
    pub const QUIZ_MAX_REQUESTS: i64 = 20;
    /// Quiz submission endpoint - window in seconds
    pub const QUIZ_WINDOW_SECS: i64 = 60;

    /// General API - max requests
    pub const GENERAL_MAX_REQUESTS: i64 = 100;
    /// General API - window in seconds
    pub const GENERAL_WINDOW_SECS: i64 = 60;
}

// =============================================================================
// REALTIME
// =============================================================================

/// Capacity of the realtime broadcast channel
pub const REALTIME_CHANNEL_CAPACITY: usize = 256;

/// Capacity of each socket's outbound queue
pub const REALTIME_SOCKET_BUFFER: usize = 64;

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for paginated results
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Maximum page size for paginated results
pub const MAX_PAGE_SIZE: u32 = 100;

// =============================================================================
// VALIDATION
// =============================================================================

/// Maximum course title length
pub const MAX_COURSE_TITLE_LENGTH: u64 = 256;

/// Maximum course description length
pub const MAX_COURSE_DESCRIPTION_LENGTH: u64 = 65535;

/// Maximum lesson title length
pub const MAX_LESSON_TITLE_LENGTH: u64 = 256;

/// Maximum lesson content length
pub const MAX_LESSON_CONTENT_LENGTH: u64 = 262_144;

/// Maximum number of questions in a single quiz
pub const MAX_QUIZ_QUESTIONS: usize = 100;

/// Maximum options per quiz question
pub const MAX_QUIZ_OPTIONS: usize = 10;
