//! HTTP client for the portal API, used by the applicant front end.
//!
//! Every response is read through the shared envelope: `data` on success,
//! `error.message` on failure. The login token is sent as the same cookie the
//! browser would carry.

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::application::dto::ApplicationRequest;
use crate::application::handlers::SubmitResponse;
use crate::form::session::{ApplicationGateway, GatewayError};
use crate::language::Language;
use crate::models::competence::Competence;
use crate::response::{ApiErrorResponse, ApiResponse};

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Clone)]
pub struct PortalClient {
    client: Client,
    base_url: String,
    cookie: String,
}

impl PortalClient {
    /// `cookie_name` must match the server's `AUTH_COOKIE`.
    pub fn new(base_url: &str, cookie_name: &str, token: &str) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            cookie: format!("{cookie_name}={token}"),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl ApplicationGateway for PortalClient {
    async fn fetch_competences(&self, language: Language) -> Result<Vec<Competence>, GatewayError> {
        let response = self
            .client
            .get(self.url("/competence/all"))
            .header(header::ACCEPT_LANGUAGE, language.code())
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        parse_envelope(status, &body)
    }

    async fn submit(
        &self,
        request: &ApplicationRequest,
        language: Language,
    ) -> Result<String, GatewayError> {
        let response = self
            .client
            .post(self.url("/application/"))
            .header(header::COOKIE, &self.cookie)
            .header(header::ACCEPT_LANGUAGE, language.code())
            .json(request)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        let receipt: Vec<SubmitResponse> = parse_envelope(status, &body)?;
        let receipt = receipt
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::Decode("empty data in success envelope".to_string()))?;
        debug!(
            "Submitted {} availability and {} competence row(s)",
            receipt.availability_count, receipt.competence_count
        );
        Ok(receipt.message)
    }
}

/// Unwraps `{success, data}` or turns `{success: false, error}` into
/// [`GatewayError::Rejected`].
fn parse_envelope<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<Vec<T>, GatewayError> {
    if status.is_success() {
        let envelope: ApiResponse<T> =
            serde_json::from_str(body).map_err(|e| GatewayError::Decode(e.to_string()))?;
        if !envelope.success {
            return Err(GatewayError::Decode(
                "success status with a failure envelope".to_string(),
            ));
        }
        return Ok(envelope.data);
    }

    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(envelope) => Err(GatewayError::Rejected {
            status: status.as_u16(),
            code: envelope.error.code,
            message: envelope.error.message,
        }),
        Err(_) => Err(GatewayError::Decode(format!(
            "status {} without an error envelope",
            status.as_u16()
        ))),
    }
}
