//! Axum route handlers for the Application API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::application::dto::{ApplicationRequest, SubmissionDto};
use crate::auth::Identity;
use crate::errors::AppError;
use crate::language::Language;
use crate::models::application::ApplicationSummary;
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::validation::messages;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub message: String,
    pub availability_count: usize,
    pub competence_count: usize,
}

/// POST /application/
///
/// Identity comes from the credential cookie only; the body is re-validated
/// before the service sees it.
pub async fn handle_submit(
    State(state): State<AppState>,
    identity: Identity,
    lang: Language,
    body: Result<Json<ApplicationRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<SubmitResponse>>, AppError> {
    let Json(request) = body.map_err(|e| AppError::Validation(e.body_text()))?;

    let dto = SubmissionDto::from_request(&identity, request, lang).map_err(|errors| {
        warn!(
            "Application from user {} failed validation: {} error(s)",
            identity.user_id,
            errors.len()
        );
        AppError::validation(errors)
    })?;

    let receipt = state.submissions.submit(&dto).await?;

    Ok(ApiResponse::one(SubmitResponse {
        message: messages::application_submitted(lang),
        availability_count: receipt.availability_count,
        competence_count: receipt.competence_count,
    }))
}

/// GET /application/all
///
/// Recruiter-only listing of every submitted application, grouped per applicant.
pub async fn handle_list_applications(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<ApiResponse<ApplicationSummary>>, AppError> {
    if !state.config.roles.is_recruiter(identity.role_id) {
        return Err(AppError::Conflict(
            "Only recruiters can list applications".to_string(),
        ));
    }

    let summaries = state.applications.list().await?;
    info!(
        "Recruiter {} listed {} application(s)",
        identity.user_id,
        summaries.len()
    );
    Ok(ApiResponse::many(summaries))
}
