//! Enrollment request DTOs

use serde::Deserialize;

/// Filter for the caller's enrollments
#[derive(Debug, Deserialize)]
pub struct MyEnrollmentsQuery {
    /// active, completed or dropped
    pub status: Option<String>,
}
