//! Data access for the submission pipeline.
//!
//! Writers take the transactional handle explicitly; nothing here opens or
//! closes a transaction on its own. Errors are returned as-is so the caller
//! holding the handle decides whether to roll back.

#[cfg(test)]
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::language::Language;
use crate::models::application::{
    summarize, ApplicationSummary, AvailabilityRow, CompetenceProfileRow, NewAvailability,
    NewCompetenceProfile,
};
use crate::models::competence::Competence;
use crate::models::user::User;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("constraint violated: {0}")]
    Constraint(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Hands out units of work. Dropping a handle without committing rolls it back.
#[async_trait]
pub trait TransactionManager: Send + Sync {
    type Tx: Send + 'static;

    async fn begin(&self) -> Result<Self::Tx, PersistenceError>;
    async fn commit(&self, tx: Self::Tx) -> Result<(), PersistenceError>;
    async fn rollback(&self, tx: Self::Tx) -> Result<(), PersistenceError>;
}

#[async_trait]
pub trait UserDao: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, PersistenceError>;
}

#[async_trait]
pub trait AvailabilityDao<Tx: Send>: Send + Sync {
    async fn create(&self, tx: &mut Tx, entry: &NewAvailability) -> Result<(), PersistenceError>;
}

#[async_trait]
pub trait CompetenceProfileDao<Tx: Send>: Send + Sync {
    async fn create(
        &self,
        tx: &mut Tx,
        entry: &NewCompetenceProfile,
    ) -> Result<(), PersistenceError>;
}

#[async_trait]
pub trait CompetenceDao: Send + Sync {
    /// Whole catalogue ordered by id, names translated where a translation exists.
    async fn all(&self, language: Language) -> Result<Vec<Competence>, PersistenceError>;
}

/// Per-applicant checks that must run inside the submitting unit of work.
#[async_trait]
pub trait SubmissionLedger<Tx: Send>: Send + Sync {
    /// Holds the applicant until `tx` ends, so a second unit of work for the
    /// same person waits here instead of racing past `has_submitted`.
    async fn lock_person(&self, tx: &mut Tx, person_id: i64) -> Result<(), PersistenceError>;

    /// Rows committed by earlier submissions plus anything already written through `tx`.
    async fn has_submitted(&self, tx: &mut Tx, person_id: i64) -> Result<bool, PersistenceError>;
}

/// Read side over submitted rows, used by recruiters.
#[async_trait]
pub trait ApplicationReader: Send + Sync {
    async fn availabilities(&self) -> Result<Vec<AvailabilityRow>, PersistenceError>;
    async fn competence_profiles(&self) -> Result<Vec<CompetenceProfileRow>, PersistenceError>;

    /// Every application grouped per applicant.
    async fn list(&self) -> Result<Vec<ApplicationSummary>, PersistenceError> {
        let availabilities = self.availabilities().await?;
        let profiles = self.competence_profiles().await?;
        Ok(summarize(availabilities, profiles))
    }
}
