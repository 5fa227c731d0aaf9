//! Application submission: precondition checks, then one all-or-nothing
//! unit of work across availability and competence-profile rows.
//!
//! `AppState` holds an `Arc<dyn ApplicationSubmitter>`, so handlers never see
//! which storage backend or transaction handle type is in use.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::application::dto::SubmissionDto;
use crate::models::user::RoleMap;
use crate::persistence::{
    AvailabilityDao, CompetenceProfileDao, PersistenceError, SubmissionLedger,
    TransactionManager, UserDao,
};

/// What happens when an applicant who already has rows submits again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResubmissionPolicy {
    /// Every submission adds a new set of rows.
    #[default]
    Allow,
    /// A second submission is a conflict.
    Reject,
}

impl std::str::FromStr for ResubmissionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow" => Ok(Self::Allow),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown resubmission policy '{other}'")),
        }
    }
}

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("role {role_id} may not submit applications")]
    RoleNotAllowed { role_id: i32 },

    #[error("user {user_id} does not exist")]
    UserNotFound { user_id: i64 },

    #[error("user {user_id} has already submitted an application")]
    AlreadySubmitted { user_id: i64 },

    #[error("persistence failure: {0}")]
    Persistence(#[from] PersistenceError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub availability_count: usize,
    pub competence_count: usize,
}

#[async_trait]
pub trait ApplicationSubmitter: Send + Sync {
    async fn submit(&self, dto: &SubmissionDto) -> Result<SubmissionReceipt, SubmissionError>;
}

pub struct SubmissionService<T: TransactionManager> {
    transactions: T,
    users: Arc<dyn UserDao>,
    availabilities: Arc<dyn AvailabilityDao<T::Tx>>,
    profiles: Arc<dyn CompetenceProfileDao<T::Tx>>,
    ledger: Arc<dyn SubmissionLedger<T::Tx>>,
    roles: RoleMap,
    policy: ResubmissionPolicy,
}

impl<T: TransactionManager> SubmissionService<T> {
    pub fn new(
        transactions: T,
        users: Arc<dyn UserDao>,
        availabilities: Arc<dyn AvailabilityDao<T::Tx>>,
        profiles: Arc<dyn CompetenceProfileDao<T::Tx>>,
        ledger: Arc<dyn SubmissionLedger<T::Tx>>,
    ) -> Self {
        Self {
            transactions,
            users,
            availabilities,
            profiles,
            ledger,
            roles: RoleMap::default(),
            policy: ResubmissionPolicy::default(),
        }
    }

    pub fn with_roles(mut self, roles: RoleMap) -> Self {
        self.roles = roles;
        self
    }

    pub fn with_policy(mut self, policy: ResubmissionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Role and existence checks. Runs before any transaction.
    async fn check_preconditions(&self, dto: &SubmissionDto) -> Result<(), SubmissionError> {
        if !self.roles.is_applicant(dto.user_role) {
            return Err(SubmissionError::RoleNotAllowed {
                role_id: dto.user_role,
            });
        }

        if self.users.find_by_id(dto.user_id).await?.is_none() {
            return Err(SubmissionError::UserNotFound {
                user_id: dto.user_id,
            });
        }

        Ok(())
    }

    /// Under `Reject`, locks the applicant inside `tx` and looks for earlier
    /// rows. A concurrent submission for the same person waits on the lock
    /// and then sees whatever this one committed.
    async fn check_resubmission(
        &self,
        tx: &mut T::Tx,
        dto: &SubmissionDto,
    ) -> Result<(), SubmissionError> {
        if self.policy == ResubmissionPolicy::Allow {
            return Ok(());
        }
        self.ledger.lock_person(tx, dto.user_id).await?;
        if self.ledger.has_submitted(tx, dto.user_id).await? {
            return Err(SubmissionError::AlreadySubmitted {
                user_id: dto.user_id,
            });
        }
        Ok(())
    }

    /// All availability rows first, then all competence-profile rows, in DTO order.
    async fn write_rows(&self, tx: &mut T::Tx, dto: &SubmissionDto) -> Result<(), PersistenceError> {
        for entry in &dto.availabilities {
            self.availabilities.create(tx, entry).await?;
        }
        for entry in &dto.competencies {
            self.profiles.create(tx, entry).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl<T> ApplicationSubmitter for SubmissionService<T>
where
    T: TransactionManager + 'static,
{
    async fn submit(&self, dto: &SubmissionDto) -> Result<SubmissionReceipt, SubmissionError> {
        if let Err(e) = self.check_preconditions(dto).await {
            warn!("Rejected application from user {}: {e}", dto.user_id);
            return Err(e);
        }

        let mut tx = self.transactions.begin().await?;
        if let Err(e) = self.check_resubmission(&mut tx, dto).await {
            warn!("Rejected application from user {}: {e}", dto.user_id);
            if let Err(rollback_err) = self.transactions.rollback(tx).await {
                error!("Rollback for user {} failed: {rollback_err}", dto.user_id);
            }
            return Err(e);
        }
        if let Err(e) = self.write_rows(&mut tx, dto).await {
            error!("Application write for user {} failed, rolling back: {e}", dto.user_id);
            if let Err(rollback_err) = self.transactions.rollback(tx).await {
                // the handle is gone either way; the backend discards the work
                error!("Rollback for user {} failed: {rollback_err}", dto.user_id);
            }
            return Err(e.into());
        }
        self.transactions.commit(tx).await.map_err(|e| {
            error!("Commit for user {} failed: {e}", dto.user_id);
            SubmissionError::from(e)
        })?;

        info!(
            "Stored application for user {}: {} availability, {} competence rows",
            dto.user_id,
            dto.availabilities.len(),
            dto.competencies.len()
        );
        Ok(SubmissionReceipt {
            availability_count: dto.availabilities.len(),
            competence_count: dto.competencies.len(),
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
