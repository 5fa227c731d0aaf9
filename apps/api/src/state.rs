use std::sync::Arc;

use crate::application::service::ApplicationSubmitter;
use crate::auth::JwtVerifier;
use crate::config::Config;
use crate::persistence::{ApplicationReader, CompetenceDao};

/// Shared application state injected into all route handlers via Axum extractors.
/// Collaborators are built once in `main` and only read afterwards.
#[derive(Clone)]
pub struct AppState {
    pub submissions: Arc<dyn ApplicationSubmitter>,
    pub competences: Arc<dyn CompetenceDao>,
    /// Read side for recruiters.
    pub applications: Arc<dyn ApplicationReader>,
    pub verifier: Arc<JwtVerifier>,
    pub config: Config,
}
