use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::YearsOfExperience;

// ────────────────────────────────────────────────────────────────────────────
// Client-held application parts
// ────────────────────────────────────────────────────────────────────────────

/// A date range the applicant declares themselves available in.
/// `key` is unique within one in-progress application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityPeriod {
    pub key: u32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// A competence the applicant may opt into, with the years they claim for it.
///
/// `years_of_experience` is the raw decimal as entered; it only becomes a
/// [`YearsOfExperience`] once validation has passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetencyClaim {
    pub competence_id: i32,
    pub competence_name: String,
    pub has_competence: bool,
    pub years_of_experience: Option<Decimal>,
}

// ────────────────────────────────────────────────────────────────────────────
// Rows written by a submission
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAvailability {
    pub person_id: i64,
    pub from_date: DateTime<Utc>,
    pub to_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompetenceProfile {
    pub person_id: i64,
    pub competence_id: i32,
    pub years_of_experience: YearsOfExperience,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRow {
    pub availability_id: i64,
    pub person_id: i64,
    pub from_date: DateTime<Utc>,
    pub to_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CompetenceProfileRow {
    pub competence_profile_id: i64,
    pub person_id: i64,
    pub competence_id: i32,
    pub years_of_experience: Decimal,
}

// ────────────────────────────────────────────────────────────────────────────
// Recruiter view
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityView {
    pub from_date: DateTime<Utc>,
    pub to_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetenceView {
    pub competence_id: i32,
    pub years_of_experience: Decimal,
}

/// Everything one applicant has submitted, across all their submissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSummary {
    pub person_id: i64,
    pub availabilities: Vec<AvailabilityView>,
    pub competencies: Vec<CompetenceView>,
}

/// Groups raw rows per applicant, ordered by person id; rows keep their input order.
pub fn summarize(
    availabilities: Vec<AvailabilityRow>,
    profiles: Vec<CompetenceProfileRow>,
) -> Vec<ApplicationSummary> {
    use std::collections::BTreeMap;

    let mut by_person: BTreeMap<i64, ApplicationSummary> = BTreeMap::new();
    fn summary_for(
        map: &mut BTreeMap<i64, ApplicationSummary>,
        person_id: i64,
    ) -> &mut ApplicationSummary {
        map.entry(person_id).or_insert_with(|| ApplicationSummary {
            person_id,
            availabilities: Vec::new(),
            competencies: Vec::new(),
        })
    }

    for row in availabilities {
        summary_for(&mut by_person, row.person_id)
            .availabilities
            .push(AvailabilityView {
                from_date: row.from_date,
                to_date: row.to_date,
            });
    }
    for row in profiles {
        summary_for(&mut by_person, row.person_id)
            .competencies
            .push(CompetenceView {
                competence_id: row.competence_id,
                years_of_experience: row.years_of_experience,
            });
    }

    by_person.into_values().collect()
}
