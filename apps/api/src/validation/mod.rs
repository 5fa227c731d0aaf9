//! Pure validators for an in-progress application.
//!
//! Single-value validators return `None` when valid and a displayable message
//! otherwise. List validators return every message in input order; nothing is
//! deduplicated. No validator has side effects.

pub mod messages;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::language::Language;
use crate::models::application::{AvailabilityPeriod, CompetencyClaim};
use crate::models::YearsOfExperience;

pub fn validate_password_confirmation(
    password: &str,
    confirm: &str,
    lang: Language,
) -> Option<String> {
    (password != confirm).then(|| messages::passwords_do_not_match(lang))
}

/// Only opted-in claims are checked: years must be present, above zero, and
/// representable as [`YearsOfExperience`].
pub fn validate_competency(claim: &CompetencyClaim, lang: Language) -> Option<String> {
    if !claim.has_competence {
        return None;
    }
    let name = claim.competence_name.as_str();
    match claim.years_of_experience {
        None => Some(messages::years_required(lang, name)),
        Some(years) if years <= Decimal::ZERO => Some(messages::years_not_positive(lang, name)),
        Some(years) => YearsOfExperience::new(years)
            .err()
            .map(|_| messages::years_invalid(lang, name)),
    }
}

pub fn validate_competencies(claims: &[CompetencyClaim], lang: Language) -> Vec<String> {
    claims
        .iter()
        .filter_map(|claim| validate_competency(claim, lang))
        .collect()
}

pub fn validate_period(
    key: u32,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    lang: Language,
) -> Option<String> {
    (end <= start).then(|| messages::period_end_before_start(lang, key))
}

pub fn validate_availabilities(periods: &[AvailabilityPeriod], lang: Language) -> Vec<String> {
    periods
        .iter()
        .filter_map(|p| validate_period(p.key, p.start_date, p.end_date, lang))
        .collect()
}

/// Full error list for an application: periods first, then competencies.
pub fn validate_application(
    periods: &[AvailabilityPeriod],
    claims: &[CompetencyClaim],
    lang: Language,
) -> Vec<String> {
    let mut errors = validate_availabilities(periods, lang);
    errors.extend(validate_competencies(claims, lang));
    errors
}
