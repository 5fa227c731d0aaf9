use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;

use crate::language::Language;
use crate::models::application::{
    AvailabilityRow, CompetenceProfileRow, NewAvailability, NewCompetenceProfile,
};
use crate::models::competence::Competence;
use crate::models::user::User;
use crate::persistence::{
    ApplicationReader, AvailabilityDao, CompetenceDao, CompetenceProfileDao, PersistenceError,
    SubmissionLedger, TransactionManager, UserDao,
};

pub type PgTx = Transaction<'static, Postgres>;

/// Surfaces constraint names separately so they can be logged, never shown.
fn map_sqlx(err: sqlx::Error) -> PersistenceError {
    let constraint = err
        .as_database_error()
        .and_then(|db| db.constraint())
        .map(str::to_string);
    match constraint {
        Some(name) => PersistenceError::Constraint(name),
        None => PersistenceError::Database(err),
    }
}

#[derive(Clone)]
pub struct PgTransactions {
    pool: PgPool,
}

impl PgTransactions {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionManager for PgTransactions {
    type Tx = PgTx;

    async fn begin(&self) -> Result<PgTx, PersistenceError> {
        self.pool.begin().await.map_err(map_sqlx)
    }

    async fn commit(&self, tx: PgTx) -> Result<(), PersistenceError> {
        tx.commit().await.map_err(map_sqlx)
    }

    async fn rollback(&self, tx: PgTx) -> Result<(), PersistenceError> {
        tx.rollback().await.map_err(map_sqlx)
    }
}

#[derive(Clone)]
pub struct PgUserDao {
    pool: PgPool,
}

impl PgUserDao {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDao for PgUserDao {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, PersistenceError> {
        sqlx::query_as::<_, User>(
            "SELECT person_id, username, email, pnr, role_id FROM person WHERE person_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)
    }
}

pub struct PgAvailabilityDao;

#[async_trait]
impl AvailabilityDao<PgTx> for PgAvailabilityDao {
    async fn create(&self, tx: &mut PgTx, entry: &NewAvailability) -> Result<(), PersistenceError> {
        sqlx::query("INSERT INTO availability (person_id, from_date, to_date) VALUES ($1, $2, $3)")
            .bind(entry.person_id)
            .bind(entry.from_date)
            .bind(entry.to_date)
            .execute(&mut **tx)
            .await
            .map_err(map_sqlx)?;
        debug!("Inserted availability for person {}", entry.person_id);
        Ok(())
    }
}

pub struct PgCompetenceProfileDao;

#[async_trait]
impl CompetenceProfileDao<PgTx> for PgCompetenceProfileDao {
    async fn create(
        &self,
        tx: &mut PgTx,
        entry: &NewCompetenceProfile,
    ) -> Result<(), PersistenceError> {
        sqlx::query(
            r#"
            INSERT INTO competence_profile (person_id, competence_id, years_of_experience)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(entry.person_id)
        .bind(entry.competence_id)
        .bind(entry.years_of_experience.as_decimal())
        .execute(&mut **tx)
        .await
        .map_err(map_sqlx)?;
        debug!(
            "Inserted competence {} for person {}",
            entry.competence_id, entry.person_id
        );
        Ok(())
    }
}

#[derive(Clone)]
pub struct PgCompetenceDao {
    pool: PgPool,
}

impl PgCompetenceDao {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompetenceDao for PgCompetenceDao {
    async fn all(&self, language: Language) -> Result<Vec<Competence>, PersistenceError> {
        sqlx::query_as::<_, Competence>(
            r#"
            SELECT c.competence_id AS id,
                   COALESCE(t.name, c.name) AS competence_name
            FROM competence c
            LEFT JOIN competence_translation t
                ON t.competence_id = c.competence_id AND t.language = $1
            ORDER BY c.competence_id
            "#,
        )
        .bind(language.code())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)
    }
}

/// Serializes submissions per applicant with a row lock on `person`.
pub struct PgSubmissionLedger;

#[async_trait]
impl SubmissionLedger<PgTx> for PgSubmissionLedger {
    async fn lock_person(&self, tx: &mut PgTx, person_id: i64) -> Result<(), PersistenceError> {
        sqlx::query("SELECT person_id FROM person WHERE person_id = $1 FOR UPDATE")
            .bind(person_id)
            .fetch_optional(&mut **tx)
            .await
            .map_err(map_sqlx)?;
        debug!("Locked person {person_id} for submission");
        Ok(())
    }

    async fn has_submitted(&self, tx: &mut PgTx, person_id: i64) -> Result<bool, PersistenceError> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (SELECT 1 FROM availability WHERE person_id = $1)
                OR EXISTS (SELECT 1 FROM competence_profile WHERE person_id = $1)
            "#,
        )
        .bind(person_id)
        .fetch_one(&mut **tx)
        .await
        .map_err(map_sqlx)
    }
}

#[derive(Clone)]
pub struct PgApplicationReader {
    pool: PgPool,
}

impl PgApplicationReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicationReader for PgApplicationReader {
    async fn availabilities(&self) -> Result<Vec<AvailabilityRow>, PersistenceError> {
        sqlx::query_as::<_, AvailabilityRow>(
            "SELECT availability_id, person_id, from_date, to_date FROM availability ORDER BY availability_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn competence_profiles(&self) -> Result<Vec<CompetenceProfileRow>, PersistenceError> {
        sqlx::query_as::<_, CompetenceProfileRow>(
            r#"
            SELECT competence_profile_id, person_id, competence_id, years_of_experience
            FROM competence_profile
            ORDER BY competence_profile_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)
    }
}
