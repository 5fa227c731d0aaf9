use std::convert::Infallible;

use axum::{async_trait, extract::FromRequestParts, http::header, http::request::Parts};
use serde::{Deserialize, Serialize};

/// Display language for user-facing messages and catalogue names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Sv,
}

impl Language {
    /// Picks the first supported tag of an `Accept-Language` value.
    /// Quality weights are ignored; order decides.
    pub fn from_header(value: Option<&str>) -> Self {
        value
            .into_iter()
            .flat_map(|v| v.split(','))
            .filter_map(|tag| {
                let primary = tag.split(';').next()?.trim();
                let primary = primary.split(['-', '_']).next()?;
                Self::from_code(primary)
            })
            .next()
            .unwrap_or_default()
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_lowercase().as_str() {
            "en" => Some(Language::En),
            "sv" => Some(Language::Sv),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Sv => "sv",
        }
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Language {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok());
        Ok(Language::from_header(value))
    }
}
