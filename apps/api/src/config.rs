use anyhow::{bail, Context, Result};

use crate::application::service::ResubmissionPolicy;
use crate::models::user::RoleMap;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Name of the cookie carrying the signed login token.
    pub auth_cookie: String,
    pub roles: RoleMap,
    pub resubmission: ResubmissionPolicy,
    /// Browser origin allowed to send credentialed requests; permissive CORS when unset.
    pub cors_origin: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let roles = RoleMap {
            applicant: optional_env("APPLICANT_ROLE_ID", "2")
                .parse::<i32>()
                .context("APPLICANT_ROLE_ID must be an integer")?,
            recruiter: optional_env("RECRUITER_ROLE_ID", "1")
                .parse::<i32>()
                .context("RECRUITER_ROLE_ID must be an integer")?,
        };
        if roles.applicant == roles.recruiter {
            bail!(
                "APPLICANT_ROLE_ID and RECRUITER_ROLE_ID must differ (both are {})",
                roles.applicant
            );
        }

        let jwt_secret = require_env("JWT_SECRET")?;
        if jwt_secret.len() < 16 {
            bail!("JWT_SECRET must be at least 16 bytes");
        }

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            jwt_secret,
            auth_cookie: optional_env("AUTH_COOKIE", "authToken"),
            roles,
            resubmission: optional_env("RESUBMISSION_POLICY", "allow")
                .parse::<ResubmissionPolicy>()
                .map_err(anyhow::Error::msg)
                .context("RESUBMISSION_POLICY must be 'allow' or 'reject'")?,
            cors_origin: std::env::var("CORS_ORIGIN").ok().filter(|s| !s.is_empty()),
            port: optional_env("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/portal_test".to_string(),
            jwt_secret: String::from_utf8_lossy(crate::auth::test_tokens::SECRET).into_owned(),
            auth_cookie: "authToken".to_string(),
            roles: RoleMap::default(),
            resubmission: ResubmissionPolicy::Allow,
            cors_origin: None,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}
