use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One entry of the competence catalogue, already resolved to the caller's language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Competence {
    pub id: i32,
    pub competence_name: String,
}
