use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::application::dto::ApplicationRequest;
use crate::form::builder::build_submission;
use crate::form::state::{reduce, ApplicationForm, FormAction, FormPhase};
use crate::language::Language;
use crate::models::competence::Competence;
use crate::validation::messages;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server answered with its error envelope.
    #[error("{message} (status {status})")]
    Rejected {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Transport(err.to_string())
    }
}

/// The portal API as seen from the applicant's side.
#[async_trait]
pub trait ApplicationGateway: Send + Sync {
    async fn fetch_competences(&self, language: Language) -> Result<Vec<Competence>, GatewayError>;

    /// Returns the server's success message.
    async fn submit(
        &self,
        request: &ApplicationRequest,
        language: Language,
    ) -> Result<String, GatewayError>;
}

/// One applicant's form, from mount to submission.
pub struct FormSession<G> {
    gateway: G,
    form: ApplicationForm,
    mounted: bool,
}

impl<G: ApplicationGateway> FormSession<G> {
    pub fn new(gateway: G, language: Language) -> Self {
        Self {
            gateway,
            form: ApplicationForm::new(language),
            mounted: false,
        }
    }

    pub fn form(&self) -> &ApplicationForm {
        &self.form
    }

    /// Fetches the catalogue on first call only.
    pub async fn mount(&mut self) -> Result<(), GatewayError> {
        if self.mounted {
            return Ok(());
        }
        let catalogue = self.gateway.fetch_competences(self.form.language).await?;
        debug!("Loaded {} competence(s)", catalogue.len());
        self.dispatch(FormAction::CatalogueLoaded(catalogue));
        self.mounted = true;
        Ok(())
    }

    pub fn dispatch(&mut self, action: FormAction) {
        let form = std::mem::take(&mut self.form);
        self.form = reduce(form, action);
    }

    pub fn add_availability(&mut self) {
        self.dispatch(FormAction::AddAvailability { now: Utc::now() });
    }

    /// Sends the form if it is ready. The outcome lands in the form itself:
    /// `result_message` on success, `error_list` on failure.
    pub async fn submit(&mut self) -> FormPhase {
        if !self.form.can_submit() {
            return self.form.phase;
        }
        let request = match build_submission(&self.form) {
            Ok(request) => request,
            Err(e) => {
                warn!("Refusing to submit: {e}");
                return self.form.phase;
            }
        };

        self.dispatch(FormAction::SubmitStarted);
        let language = self.form.language;
        let outcome = self.gateway.submit(&request, language).await;

        let action = match outcome {
            Ok(message) => FormAction::SubmitSucceeded { message },
            Err(GatewayError::Rejected {
                status, message, ..
            }) => {
                warn!("Submission rejected with status {status}: {message}");
                FormAction::SubmitFailed { message }
            }
            Err(e) => {
                warn!("Submission failed: {e}");
                FormAction::SubmitFailed {
                    message: messages::something_went_wrong(language),
                }
            }
        };
        self.dispatch(action);
        self.form.phase
    }
}
