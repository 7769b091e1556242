//! Certificate response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Certificate, CertificateDetails};

/// Certificate response
#[derive(Debug, Serialize)]
pub struct CertificateResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub verification_code: String,
    pub final_score: Option<i32>,
    pub issued_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holder_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_title: Option<String>,
}

impl From<Certificate> for CertificateResponse {
    fn from(certificate: Certificate) -> Self {
        Self {
            id: certificate.id,
            user_id: certificate.user_id,
            course_id: certificate.course_id,
            verification_code: certificate.verification_code,
            final_score: certificate.final_score,
            issued_at: certificate.issued_at,
            holder_name: None,
            course_title: None,
        }
    }
}

impl From<CertificateDetails> for CertificateResponse {
    fn from(details: CertificateDetails) -> Self {
        Self {
            holder_name: Some(details.holder_name().to_string()),
            id: details.id,
            user_id: details.user_id,
            course_id: details.course_id,
            verification_code: details.verification_code,
            final_score: details.final_score,
            issued_at: details.issued_at,
            course_title: Some(details.course_title),
        }
    }
}

/// Caller's certificates
#[derive(Debug, Serialize)]
pub struct CertificatesListResponse {
    pub certificates: Vec<CertificateResponse>,
}

/// Public verification result
#[derive(Debug, Serialize)]
pub struct VerificationResponse {
    pub valid: bool,
    pub verification_code: String,
    pub holder_name: String,
    pub course_title: String,
    pub course_language: String,
    pub final_score: Option<i32>,
    pub issued_at: DateTime<Utc>,
}

impl From<CertificateDetails> for VerificationResponse {
    fn from(details: CertificateDetails) -> Self {
        Self {
            valid: true,
            holder_name: details.holder_name().to_string(),
            verification_code: details.verification_code,
            course_title: details.course_title,
            course_language: details.course_language,
            final_score: details.final_score,
            issued_at: details.issued_at,
        }
    }
}
