use axum::Json;
use serde::{Deserialize, Serialize};

/// Success envelope shared by every endpoint: `{ "success": true, "data": [...] }`.
/// Single results are still wrapped in a one-element `data` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
}

impl<T> ApiResponse<T> {
    pub fn many(data: Vec<T>) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }

    pub fn one(item: T) -> Json<Self> {
        Self::many(vec![item])
    }
}

/// Failure envelope as seen by clients: `{ "success": false, "error": {...} }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub success: bool,
    pub error: ApiErrorBody,
}
