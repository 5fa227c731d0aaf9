use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered person. Created at registration, only read by the submission pipeline.
/// The password hash never leaves the `person` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[sqlx(rename = "person_id")]
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    #[sqlx(rename = "pnr")]
    pub personal_number: Option<String>,
    pub role_id: i32,
}

/// Role a verified identity may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Applicant,
    Recruiter,
}

/// Numeric role identifiers as stored in the `role` table.
///
/// Which id means "applicant" is deployment configuration, not a constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleMap {
    pub applicant: i32,
    pub recruiter: i32,
}

impl RoleMap {
    pub fn resolve(&self, role_id: i32) -> Option<Role> {
        if role_id == self.applicant {
            Some(Role::Applicant)
        } else if role_id == self.recruiter {
            Some(Role::Recruiter)
        } else {
            None
        }
    }

    pub fn is_applicant(&self, role_id: i32) -> bool {
        self.resolve(role_id) == Some(Role::Applicant)
    }

    pub fn is_recruiter(&self, role_id: i32) -> bool {
        self.resolve(role_id) == Some(Role::Recruiter)
    }
}

impl Default for RoleMap {
    fn default() -> Self {
        Self {
            applicant: 2,
            recruiter: 1,
        }
    }
}
