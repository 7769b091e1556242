//! Certificate model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Certificate database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Certificate {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub verification_code: String,
    pub final_score: Option<i32>,
    pub issued_at: DateTime<Utc>,
}

/// Certificate joined with holder and course, used for verification
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CertificateDetails {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub verification_code: String,
    pub final_score: Option<i32>,
    pub issued_at: DateTime<Utc>,
    pub holder_username: String,
    pub holder_display_name: Option<String>,
    pub course_title: String,
    pub course_language: String,
    pub course_teacher_id: Uuid,
}

impl CertificateDetails {
    pub fn holder_name(&self) -> &str {
        self.holder_display_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.holder_username)
    }
}
