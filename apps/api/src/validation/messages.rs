//! User-facing validation texts, one table per supported language.

use crate::language::Language;

pub fn passwords_do_not_match(lang: Language) -> String {
    match lang {
        Language::En => "Passwords do not match".to_string(),
        Language::Sv => "Lösenorden matchar inte".to_string(),
    }
}

/// Stands in for a competence name when only its id is known.
pub fn competence_label(lang: Language, competence_id: i32) -> String {
    match lang {
        Language::En => format!("competence {competence_id}"),
        Language::Sv => format!("kompetens {competence_id}"),
    }
}

pub fn years_required(lang: Language, competence: &str) -> String {
    match lang {
        Language::En => format!("Enter your years of experience in {competence}"),
        Language::Sv => format!("Ange antal års erfarenhet inom {competence}"),
    }
}

pub fn years_not_positive(lang: Language, competence: &str) -> String {
    match lang {
        Language::En => format!("Years of experience in {competence} must be greater than 0"),
        Language::Sv => format!("Antal års erfarenhet inom {competence} måste vara större än 0"),
    }
}

pub fn years_invalid(lang: Language, competence: &str) -> String {
    match lang {
        Language::En => format!(
            "Years of experience in {competence} must be at most 9999.99 with two decimals"
        ),
        Language::Sv => format!(
            "Antal års erfarenhet inom {competence} får vara högst 9999,99 med två decimaler"
        ),
    }
}

pub fn period_end_before_start(lang: Language, key: u32) -> String {
    match lang {
        Language::En => format!("Availability period {key}: end date must be after start date"),
        Language::Sv => format!("Tillgänglighetsperiod {key}: slutdatum måste vara efter startdatum"),
    }
}

pub fn application_submitted(lang: Language) -> String {
    match lang {
        Language::En => "Your application has been submitted".to_string(),
        Language::Sv => "Din ansökan har skickats in".to_string(),
    }
}

pub fn something_went_wrong(lang: Language) -> String {
    match lang {
        Language::En => "Something went wrong, please try again later".to_string(),
        Language::Sv => "Något gick fel, försök igen senare".to_string(),
    }
}
