//! Shared fixtures for handler and router tests.

use std::sync::Arc;

use crate::application::service::SubmissionService;
use crate::auth::{test_tokens, JwtVerifier};
use crate::config::Config;
use crate::persistence::memory::MemoryStore;
use crate::state::AppState;

pub const APPLICANT_ROLE: i32 = 2;
pub const RECRUITER_ROLE: i32 = 1;

/// Wires every collaborator to the same in-memory store, the way `main` wires Postgres.
pub fn state_with(store: &MemoryStore, config: Config) -> AppState {
    let shared = Arc::new(store.clone());
    let submissions = SubmissionService::new(
        store.clone(),
        shared.clone(),
        shared.clone(),
        shared.clone(),
        shared.clone(),
    )
    .with_roles(config.roles)
    .with_policy(config.resubmission);

    AppState {
        submissions: Arc::new(submissions),
        competences: shared.clone(),
        applications: shared,
        verifier: Arc::new(JwtVerifier::from_secret(test_tokens::SECRET)),
        config,
    }
}

pub fn state(store: &MemoryStore) -> AppState {
    state_with(store, Config::for_tests())
}
