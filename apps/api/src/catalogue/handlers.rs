use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::language::Language;
use crate::models::competence::Competence;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /competence/all
///
/// The competence catalogue in the caller's `Accept-Language`, English fallback.
pub async fn handle_list_competences(
    State(state): State<AppState>,
    lang: Language,
) -> Result<Json<ApiResponse<Competence>>, AppError> {
    let catalogue = state.competences.all(lang).await?;
    Ok(ApiResponse::many(catalogue))
}
