use thiserror::Error;

use crate::application::dto::{ApplicationRequest, AvailabilityRequest, CompetenceRequest};
use crate::form::state::ApplicationForm;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("application has {0} unresolved validation error(s)")]
    Blocked(usize),

    #[error("competence {competence_id} has no years of experience")]
    MissingYears { competence_id: i32 },
}

/// Packages a validated form as the body of `POST /application/`.
///
/// Only opted-in competencies are sent. Identity is never part of the body;
/// the server takes it from the credential.
pub fn build_submission(form: &ApplicationForm) -> Result<ApplicationRequest, BuildError> {
    if !form.error_list.is_empty() {
        return Err(BuildError::Blocked(form.error_list.len()));
    }

    let availabilities = form
        .availability_periods
        .iter()
        .map(|p| AvailabilityRequest {
            from_date: p.start_date,
            to_date: p.end_date,
        })
        .collect();

    let competencies = form
        .competency_claims
        .iter()
        .filter(|c| c.has_competence)
        .map(|c| {
            let years = c.years_of_experience.ok_or(BuildError::MissingYears {
                competence_id: c.competence_id,
            })?;
            Ok(CompetenceRequest {
                competence_id: c.competence_id,
                years_of_experience: years,
            })
        })
        .collect::<Result<Vec<_>, BuildError>>()?;

    Ok(ApplicationRequest {
        availabilities,
        competencies,
    })
}
