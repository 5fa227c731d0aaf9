use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use portal::application::service::SubmissionService;
use portal::auth::JwtVerifier;
use portal::config::Config;
use portal::db::create_pool;
use portal::persistence::postgres::{
    PgApplicationReader, PgAvailabilityDao, PgCompetenceDao, PgCompetenceProfileDao,
    PgSubmissionLedger, PgTransactions, PgUserDao,
};
use portal::routes::build_router;
use portal::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting portal API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    let submissions = SubmissionService::new(
        PgTransactions::new(db.clone()),
        Arc::new(PgUserDao::new(db.clone())),
        Arc::new(PgAvailabilityDao),
        Arc::new(PgCompetenceProfileDao),
        Arc::new(PgSubmissionLedger),
    )
    .with_roles(config.roles)
    .with_policy(config.resubmission);
    info!(
        "Submission service ready (applicant role {}, recruiter role {}, resubmission {:?})",
        config.roles.applicant, config.roles.recruiter, config.resubmission
    );

    let cors = build_cors(&config)?;

    // Build app state
    let state = AppState {
        submissions: Arc::new(submissions),
        competences: Arc::new(PgCompetenceDao::new(db.clone())),
        applications: Arc::new(PgApplicationReader::new(db)),
        verifier: Arc::new(JwtVerifier::from_secret(config.jwt_secret.as_bytes())),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// The credential travels as a cookie, so a configured origin gets
/// credentialed CORS. Without one, CORS stays permissive for local work.
fn build_cors(config: &Config) -> Result<CorsLayer> {
    let Some(origin) = config.cors_origin.as_deref() else {
        return Ok(CorsLayer::permissive());
    };
    let origin = origin
        .parse::<HeaderValue>()
        .with_context(|| format!("CORS_ORIGIN '{origin}' is not a valid header value"))?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT_LANGUAGE]))
}
