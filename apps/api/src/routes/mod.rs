pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::application::handlers as application;
use crate::catalogue::handlers as catalogue;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Competence catalogue
        .route("/competence/all", get(catalogue::handle_list_competences))
        // Applications
        .route("/application/", post(application::handle_submit))
        .route("/application/all", get(application::handle_list_applications))
        .with_state(state)
}
