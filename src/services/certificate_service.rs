//! Certificate service

use sqlx::{PgConnection, PgPool};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    config::LearningConfig,
    constants::roles,
    db::repositories::{CertificateRepository, CompletionRepository},
    error::{AppError, AppResult},
    models::{Certificate, CertificateDetails, Completion},
    realtime::{RealtimeHub, ServerMessage},
    utils::{generate_verification_code, validate_verification_code},
};

/// Attempts at drawing an unused verification code
const MAX_CODE_ATTEMPTS: usize = 5;

/// Certificate service for business logic
pub struct CertificateService;

impl CertificateService {
    /// Issue the certificate of a completed course. Returns the existing
    /// certificate when one was already issued.
    pub async fn issue_certificate(
        pool: &PgPool,
        learning: &LearningConfig,
        realtime: &RealtimeHub,
        user_id: &Uuid,
        course_id: &Uuid,
    ) -> AppResult<Certificate> {
        let completion = CompletionRepository::find(pool, user_id, course_id)
            .await?
            .filter(|c| c.is_completed)
            .ok_or_else(|| {
                AppError::Validation("Course must be completed before a certificate is issued".to_string())
            })?;

        let mut conn = pool.acquire().await?;
        let (certificate, issued) =
            Self::issue_for_completion(&mut *conn, learning, &completion).await?;

        if issued {
            realtime.publish(
                *course_id,
                ServerMessage::CertificateIssued {
                    course_id: *course_id,
                    user_id: *user_id,
                    certificate_id: certificate.id,
                },
            );
        }

        Ok(certificate)
    }

    /// Find or create the certificate for a completion. The flag is true when
    /// a new certificate was created.
    pub(crate) async fn issue_for_completion(
        conn: &mut PgConnection,
        learning: &LearningConfig,
        completion: &Completion,
    ) -> AppResult<(Certificate, bool)> {
        let (user_id, course_id) = (&completion.user_id, &completion.course_id);

        if let Some(existing) =
            CertificateRepository::find_for_user_course(&mut *conn, user_id, course_id).await?
        {
            return Ok((existing, false));
        }

        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = generate_verification_code(&learning.certificate_code_prefix);

            if let Some(certificate) = CertificateRepository::try_create(
                &mut *conn,
                user_id,
                course_id,
                &code,
                completion.score,
            )
            .await?
            {
                info!(
                    certificate_id = %certificate.id,
                    user_id = %user_id,
                    course_id = %course_id,
                    "Certificate issued"
                );
                return Ok((certificate, true));
            }

            // Either a concurrent issue won the race or the code collided
            if let Some(existing) =
                CertificateRepository::find_for_user_course(&mut *conn, user_id, course_id).await?
            {
                return Ok((existing, false));
            }
            warn!(user_id = %user_id, course_id = %course_id, "Verification code collision, retrying");
        }

        Err(AppError::Internal(anyhow::anyhow!(
            "Could not generate a unique verification code"
        )))
    }

    /// Public verification by code
    pub async fn verify(pool: &PgPool, code: &str) -> AppResult<CertificateDetails> {
        let code = code.trim().to_uppercase();
        validate_verification_code(&code).map_err(|e| AppError::Validation(e.to_string()))?;

        CertificateRepository::find_details_by_code(pool, &code)
            .await?
            .ok_or_else(|| AppError::NotFound("Certificate not found".to_string()))
    }

    /// Certificates held by the caller
    pub async fn my_certificates(pool: &PgPool, user_id: &Uuid) -> AppResult<Vec<CertificateDetails>> {
        CertificateRepository::list_for_user(pool, user_id).await
    }

    /// Get a certificate; holder, course owner or admin only
    pub async fn get_certificate(
        pool: &PgPool,
        id: &Uuid,
        user_id: &Uuid,
        role: &str,
    ) -> AppResult<CertificateDetails> {
        let certificate = CertificateRepository::find_details_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Certificate not found".to_string()))?;

        if !can_view(&certificate, user_id, role) {
            return Err(AppError::Forbidden(
                "Cannot view another user's certificate".to_string(),
            ));
        }

        Ok(certificate)
    }
}

fn can_view(certificate: &CertificateDetails, user_id: &Uuid, role: &str) -> bool {
    certificate.user_id == *user_id
        || certificate.course_teacher_id == *user_id
        || role == roles::ADMIN
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn details(holder: Uuid, teacher: Uuid) -> CertificateDetails {
        CertificateDetails {
            id: Uuid::new_v4(),
            user_id: holder,
            course_id: Uuid::new_v4(),
            verification_code: "LL-ABCD-EFGH-JKLM".to_string(),
            final_score: Some(88),
            issued_at: Utc::now(),
            holder_username: "marta".to_string(),
            holder_display_name: None,
            course_title: "Italian Basics".to_string(),
            course_language: "italian".to_string(),
            course_teacher_id: teacher,
        }
    }

    #[test]
    fn test_certificate_visibility() {
        let holder = Uuid::new_v4();
        let teacher = Uuid::new_v4();
        let cert = details(holder, teacher);

        assert!(can_view(&cert, &holder, roles::STUDENT));
        assert!(can_view(&cert, &teacher, roles::TEACHER));
        assert!(can_view(&cert, &Uuid::new_v4(), roles::ADMIN));
        assert!(!can_view(&cert, &Uuid::new_v4(), roles::STUDENT));
        assert!(!can_view(&cert, &Uuid::new_v4(), roles::TEACHER));
    }
}
