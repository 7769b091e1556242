//! Certificate handler implementations

use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    services::CertificateService,
    state::AppState,
};

use super::response::{CertificateResponse, CertificatesListResponse, VerificationResponse};

/// Issue (or fetch) the caller's certificate for a completed course
pub async fn issue_certificate(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(course_id): Path<Uuid>,
) -> AppResult<Json<CertificateResponse>> {
    let certificate = CertificateService::issue_certificate(
        state.db(),
        &state.config().learning,
        state.realtime(),
        &auth_user.id,
        &course_id,
    )
    .await?;

    Ok(Json(certificate.into()))
}

/// The caller's certificates
pub async fn my_certificates(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<CertificatesListResponse>> {
    let certificates = CertificateService::my_certificates(state.db(), &auth_user.id).await?;

    Ok(Json(CertificatesListResponse {
        certificates: certificates.into_iter().map(Into::into).collect(),
    }))
}

/// Get a certificate by ID
pub async fn get_certificate(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CertificateResponse>> {
    let certificate =
        CertificateService::get_certificate(state.db(), &id, &auth_user.id, &auth_user.role)
            .await?;
    Ok(Json(certificate.into()))
}

/// Public certificate verification
pub async fn verify_certificate(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<VerificationResponse>> {
    let details = CertificateService::verify(state.db(), &code).await?;
    Ok(Json(details.into()))
}
