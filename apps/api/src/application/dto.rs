use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::auth::Identity;
use crate::language::Language;
use crate::models::application::{
    AvailabilityPeriod, CompetencyClaim, NewAvailability, NewCompetenceProfile,
};
use crate::models::YearsOfExperience;
use crate::validation::{messages, validate_application};

// ────────────────────────────────────────────────────────────────────────────
// Wire body of POST /application/
// ────────────────────────────────────────────────────────────────────────────

/// What the applicant's browser sends. Carries no identity; any `userId` or
/// `userRole` field a client adds is ignored during deserialisation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRequest {
    #[serde(default)]
    pub availabilities: Vec<AvailabilityRequest>,
    #[serde(default)]
    pub competencies: Vec<CompetenceRequest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRequest {
    pub from_date: DateTime<Utc>,
    pub to_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetenceRequest {
    pub competence_id: i32,
    pub years_of_experience: Decimal,
}

// ────────────────────────────────────────────────────────────────────────────
// Normalised submission handed to the service
// ────────────────────────────────────────────────────────────────────────────

/// A submission bound to a verified identity. Every nested `person_id` is the
/// identity's user id; [`SubmissionDto::from_request`] is the only constructor
/// used outside tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionDto {
    pub user_id: i64,
    pub user_role: i32,
    pub availabilities: Vec<NewAvailability>,
    pub competencies: Vec<NewCompetenceProfile>,
}

impl SubmissionDto {
    /// Re-validates the body server-side and binds it to `identity`.
    /// Returns every validation message on failure.
    pub fn from_request(
        identity: &Identity,
        request: ApplicationRequest,
        lang: Language,
    ) -> Result<Self, Vec<String>> {
        let periods: Vec<AvailabilityPeriod> = request
            .availabilities
            .iter()
            .zip(1u32..)
            .map(|(a, key)| AvailabilityPeriod {
                key,
                start_date: a.from_date,
                end_date: a.to_date,
            })
            .collect();
        let claims: Vec<CompetencyClaim> = request
            .competencies
            .iter()
            .map(|c| CompetencyClaim {
                competence_id: c.competence_id,
                competence_name: messages::competence_label(lang, c.competence_id),
                has_competence: true,
                years_of_experience: Some(c.years_of_experience),
            })
            .collect();

        let errors = validate_application(&periods, &claims, lang);
        if !errors.is_empty() {
            return Err(errors);
        }

        let person_id = identity.user_id;
        let availabilities = request
            .availabilities
            .into_iter()
            .map(|a| NewAvailability {
                person_id,
                from_date: a.from_date,
                to_date: a.to_date,
            })
            .collect();
        let competencies = request
            .competencies
            .into_iter()
            .map(|c| {
                YearsOfExperience::new(c.years_of_experience).map(|years| NewCompetenceProfile {
                    person_id,
                    competence_id: c.competence_id,
                    years_of_experience: years,
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| vec![e.to_string()])?;

        Ok(Self {
            user_id: identity.user_id,
            user_role: identity.role_id,
            availabilities,
            competencies,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn identity() -> Identity {
        Identity {
            user_id: 42,
            role_id: 2,
        }
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_binds_every_row_to_identity() {
        let request = ApplicationRequest {
            availabilities: vec![AvailabilityRequest {
                from_date: day(1),
                to_date: day(10),
            }],
            competencies: vec![CompetenceRequest {
                competence_id: 3,
                years_of_experience: Decimal::new(25, 1),
            }],
        };
        let dto = SubmissionDto::from_request(&identity(), request, Language::En).unwrap();
        assert_eq!(dto.user_id, 42);
        assert_eq!(dto.user_role, 2);
        assert_eq!(dto.availabilities[0].person_id, 42);
        assert_eq!(dto.competencies[0].person_id, 42);
        assert_eq!(dto.competencies[0].years_of_experience.to_string(), "2.50");
    }

    #[test]
    fn test_body_identity_fields_are_ignored() {
        let body = r#"{
            "userId": 7,
            "userRole": 1,
            "availabilities": [{"fromDate": "2025-01-01T00:00:00Z", "toDate": "2025-01-10T00:00:00Z", "personId": 7}],
            "competencies": []
        }"#;
        let request: ApplicationRequest = serde_json::from_str(body).unwrap();
        let dto = SubmissionDto::from_request(&identity(), request, Language::En).unwrap();
        assert_eq!(dto.user_id, 42);
        assert_eq!(dto.user_role, 2);
        assert_eq!(dto.availabilities[0].person_id, 42);
    }

    #[test]
    fn test_server_side_validation_collects_all_errors() {
        let request = ApplicationRequest {
            availabilities: vec![
                AvailabilityRequest {
                    from_date: day(5),
                    to_date: day(5),
                },
                AvailabilityRequest {
                    from_date: day(9),
                    to_date: day(2),
                },
            ],
            competencies: vec![CompetenceRequest {
                competence_id: 3,
                years_of_experience: Decimal::ZERO,
            }],
        };
        let errors = SubmissionDto::from_request(&identity(), request, Language::En).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[1].contains("period 2"));
    }

    #[test]
    fn test_swedish_errors_name_the_competence_in_swedish() {
        let request = ApplicationRequest {
            availabilities: vec![],
            competencies: vec![CompetenceRequest {
                competence_id: 3,
                years_of_experience: Decimal::ZERO,
            }],
        };
        let errors = SubmissionDto::from_request(&identity(), request, Language::Sv).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("kompetens 3"), "{}", errors[0]);
        assert!(!errors[0].contains("competence"));
    }

    #[test]
    fn test_years_accept_string_or_number_on_the_wire() {
        let body = r#"{"competencies": [
            {"competenceId": 1, "yearsOfExperience": "2.5"},
            {"competenceId": 2, "yearsOfExperience": 3}
        ]}"#;
        let request: ApplicationRequest = serde_json::from_str(body).unwrap();
        assert!(request.availabilities.is_empty());
        assert_eq!(request.competencies[0].years_of_experience, Decimal::new(25, 1));
        assert_eq!(request.competencies[1].years_of_experience, Decimal::new(3, 0));
    }
}
