use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::language::Language;
use crate::models::application::{AvailabilityPeriod, CompetencyClaim};
use crate::models::competence::Competence;
use crate::validation::validate_application;

/// Where the form is in its lifecycle. Validation runs synchronously inside
/// every reducer call, so a field change lands directly in `Blocked` or
/// `ReadyToSubmit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormPhase {
    /// Nothing loaded or edited yet.
    #[default]
    Empty,
    Blocked,
    ReadyToSubmit,
    Submitting,
    Submitted,
    /// The server refused; the form is editable again.
    SubmissionFailed,
}

/// One in-progress application.
///
/// `error_list` is recomputed from the fields on every edit. While the form is
/// editable (`Blocked`, `ReadyToSubmit`, `SubmissionFailed`) it is empty exactly
/// when the application may be submitted. `Empty`, `Submitting` and `Submitted`
/// are never submittable, whatever the list holds.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApplicationForm {
    pub language: Language,
    pub catalogue: Vec<Competence>,
    pub availability_periods: Vec<AvailabilityPeriod>,
    pub competency_claims: Vec<CompetencyClaim>,
    pub error_list: Vec<String>,
    pub result_message: Option<String>,
    pub phase: FormPhase,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    CatalogueLoaded(Vec<Competence>),
    AddAvailability {
        now: DateTime<Utc>,
    },
    SetAvailabilityStart {
        key: u32,
        start: DateTime<Utc>,
    },
    SetAvailabilityEnd {
        key: u32,
        end: DateTime<Utc>,
    },
    RemoveAvailability {
        key: u32,
    },
    ToggleCompetence {
        competence_id: i32,
        has_competence: bool,
    },
    SetYearsOfExperience {
        competence_id: i32,
        years: Option<Decimal>,
    },
    SubmitStarted,
    SubmitSucceeded {
        message: String,
    },
    SubmitFailed {
        message: String,
    },
    Cancel,
}

impl FormAction {
    fn edits_fields(&self) -> bool {
        !matches!(
            self,
            FormAction::SubmitStarted
                | FormAction::SubmitSucceeded { .. }
                | FormAction::SubmitFailed { .. }
                | FormAction::Cancel
        )
    }
}

impl ApplicationForm {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ..Self::default()
        }
    }

    pub fn can_submit(&self) -> bool {
        self.phase == FormPhase::ReadyToSubmit
    }

    pub fn period(&self, key: u32) -> Option<&AvailabilityPeriod> {
        self.availability_periods.iter().find(|p| p.key == key)
    }

    pub fn claim(&self, competence_id: i32) -> Option<&CompetencyClaim> {
        self.competency_claims
            .iter()
            .find(|c| c.competence_id == competence_id)
    }

    fn period_mut(&mut self, key: u32) -> Option<&mut AvailabilityPeriod> {
        self.availability_periods.iter_mut().find(|p| p.key == key)
    }

    fn claim_mut(&mut self, competence_id: i32) -> Option<&mut CompetencyClaim> {
        self.competency_claims
            .iter_mut()
            .find(|c| c.competence_id == competence_id)
    }

    /// List length + 1, or the next integer above it that no period holds.
    fn next_period_key(&self) -> u32 {
        let mut key = self.availability_periods.len() as u32 + 1;
        while self.period(key).is_some() {
            key += 1;
        }
        key
    }

    /// Fresh form over the same catalogue.
    fn reset(&self) -> Self {
        Self {
            language: self.language,
            catalogue: self.catalogue.clone(),
            competency_claims: claims_from(&self.catalogue),
            ..Self::default()
        }
    }

    fn revalidate(mut self) -> Self {
        self.error_list = validate_application(
            &self.availability_periods,
            &self.competency_claims,
            self.language,
        );
        self.phase = if self.error_list.is_empty() {
            FormPhase::ReadyToSubmit
        } else {
            FormPhase::Blocked
        };
        self
    }
}

fn claims_from(catalogue: &[Competence]) -> Vec<CompetencyClaim> {
    catalogue
        .iter()
        .map(|c| CompetencyClaim {
            competence_id: c.id,
            competence_name: c.competence_name.clone(),
            has_competence: false,
            years_of_experience: Some(Decimal::ZERO),
        })
        .collect()
}

/// Applies one action. Field edits are ignored while a submission is in flight.
pub fn reduce(mut form: ApplicationForm, action: FormAction) -> ApplicationForm {
    if form.phase == FormPhase::Submitting && action.edits_fields() {
        return form;
    }

    match action {
        FormAction::CatalogueLoaded(catalogue) => {
            form.competency_claims = claims_from(&catalogue);
            form.catalogue = catalogue;
            form.revalidate()
        }
        FormAction::AddAvailability { now } => {
            let key = form.next_period_key();
            form.availability_periods.push(AvailabilityPeriod {
                key,
                start_date: now,
                end_date: now,
            });
            form.revalidate()
        }
        FormAction::SetAvailabilityStart { key, start } => {
            if let Some(period) = form.period_mut(key) {
                period.start_date = start;
            }
            form.revalidate()
        }
        FormAction::SetAvailabilityEnd { key, end } => {
            if let Some(period) = form.period_mut(key) {
                period.end_date = end;
            }
            form.revalidate()
        }
        FormAction::RemoveAvailability { key } => {
            form.availability_periods.retain(|p| p.key != key);
            form.revalidate()
        }
        FormAction::ToggleCompetence {
            competence_id,
            has_competence,
        } => {
            if let Some(claim) = form.claim_mut(competence_id) {
                claim.has_competence = has_competence;
            }
            form.revalidate()
        }
        FormAction::SetYearsOfExperience {
            competence_id,
            years,
        } => {
            if let Some(claim) = form.claim_mut(competence_id) {
                claim.years_of_experience = years;
            }
            form.revalidate()
        }
        FormAction::SubmitStarted => {
            if form.can_submit() {
                form.result_message = None;
                form.phase = FormPhase::Submitting;
            }
            form
        }
        FormAction::SubmitSucceeded { message } => {
            if form.phase != FormPhase::Submitting {
                return form;
            }
            let mut fresh = form.reset();
            fresh.result_message = Some(message);
            fresh.phase = FormPhase::Submitted;
            fresh
        }
        FormAction::SubmitFailed { message } => {
            if form.phase != FormPhase::Submitting {
                return form;
            }
            form.error_list = vec![message];
            form.phase = FormPhase::SubmissionFailed;
            form
        }
        FormAction::Cancel => form.reset().revalidate(),
    }
}
