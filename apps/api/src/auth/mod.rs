//! Authorization gate: turns the signed cookie credential into an [`Identity`].
//!
//! Verification is purely cryptographic plus a shape check on the claims.
//! There is no session store and no database lookup here.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::errors::AppError;
use crate::state::AppState;

/// Caller identity taken from a verified credential. The only trusted source
/// of user id and role for business logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub role_id: i32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("credential missing")]
    Missing,
    #[error("credential signature invalid")]
    BadSignature,
    #[error("credential expired")]
    Expired,
    #[error("credential claims malformed")]
    MalformedClaims,
    #[error("credential rejected: {0}")]
    Invalid(String),
}

/// Claims carried by the portal's login token.
#[derive(Debug, Deserialize)]
struct Claims {
    id: i64,
    #[serde(rename = "roleId")]
    role_id: i32,
}

#[derive(Clone)]
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            key: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            debug!("Rejected credential: {e}");
            match e.kind() {
                ErrorKind::InvalidSignature => AuthError::BadSignature,
                ErrorKind::ExpiredSignature => AuthError::Expired,
                ErrorKind::Json(_) | ErrorKind::MissingRequiredClaim(_) => {
                    AuthError::MalformedClaims
                }
                other => AuthError::Invalid(format!("{other:?}")),
            }
        })?;

        let Claims { id, role_id } = data.claims;
        if id <= 0 || role_id <= 0 {
            return Err(AuthError::MalformedClaims);
        }
        Ok(Identity {
            user_id: id,
            role_id,
        })
    }
}

/// Finds `name` across every `Cookie` header of the request.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"'))
        .filter(|value| !value.is_empty())
}

pub fn authenticate(
    headers: &HeaderMap,
    cookie_name: &str,
    verifier: &JwtVerifier,
) -> Result<Identity, AuthError> {
    let token = cookie_value(headers, cookie_name).ok_or(AuthError::Missing)?;
    verifier.verify(token)
}

#[async_trait]
impl FromRequestParts<AppState> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        Ok(authenticate(
            &parts.headers,
            &state.config.auth_cookie,
            &state.verifier,
        )?)
    }
}
