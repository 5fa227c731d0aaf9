//! In-memory store backing the service and HTTP tests.
//!
//! A transaction keeps its writes to itself until commit publishes them, so
//! other readers never see uncommitted rows. Dropping or rolling back simply
//! discards the pending rows. Person locks are held until the transaction
//! ends. Every collaborator call is counted so tests can assert what was touched.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

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

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    competences: Vec<(Competence, Option<String>)>,
    availabilities: Vec<AvailabilityRow>,
    profiles: Vec<CompetenceProfileRow>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn has_rows_for(&self, person_id: i64) -> bool {
        self.availabilities.iter().any(|r| r.person_id == person_id)
            || self.profiles.iter().any(|r| r.person_id == person_id)
    }
}

#[derive(Default)]
pub struct CallCounts {
    pub user_lookups: AtomicUsize,
    pub begins: AtomicUsize,
    pub commits: AtomicUsize,
    pub rollbacks: AtomicUsize,
    pub availability_writes: AtomicUsize,
    pub profile_writes: AtomicUsize,
    pub person_locks: AtomicUsize,
    pub submission_checks: AtomicUsize,
}

impl CallCounts {
    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    /// Total number of collaborator calls of any kind.
    pub fn total(&self) -> usize {
        [
            &self.user_lookups,
            &self.begins,
            &self.commits,
            &self.rollbacks,
            &self.availability_writes,
            &self.profile_writes,
            &self.person_locks,
            &self.submission_checks,
        ]
        .iter()
        .map(|c| Self::get(c))
        .sum()
    }
}

#[derive(Default)]
struct Faults {
    /// Fail the n-th (1-based) profile write.
    profile_write: Option<usize>,
    /// Fail the n-th (1-based) availability write.
    availability_write: Option<usize>,
    fail_commit: bool,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    faults: Arc<Mutex<Faults>>,
    person_locks: Arc<Mutex<BTreeMap<i64, Arc<AsyncMutex<()>>>>>,
    pub calls: Arc<CallCounts>,
}

/// Pending rows and held person locks. Nothing reaches the shared tables
/// before commit.
pub struct MemoryTx {
    availabilities: Vec<AvailabilityRow>,
    profiles: Vec<CompetenceProfileRow>,
    held: Vec<OwnedMutexGuard<()>>,
}

impl MemoryTx {
    fn has_rows_for(&self, person_id: i64) -> bool {
        self.availabilities.iter().any(|r| r.person_id == person_id)
            || self.profiles.iter().any(|r| r.person_id == person_id)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, id: i64, role_id: i32) -> Self {
        lock(&self.tables).users.insert(
            id,
            User {
                id,
                username: format!("user{id}"),
                email: Some(format!("user{id}@example.com")),
                personal_number: None,
                role_id,
            },
        );
        self
    }

    pub fn with_competence(self, id: i32, name: &str, swedish: Option<&str>) -> Self {
        lock(&self.tables).competences.push((
            Competence {
                id,
                competence_name: name.to_string(),
            },
            swedish.map(str::to_string),
        ));
        self
    }

    pub fn fail_profile_write(&self, nth: usize) {
        lock(&self.faults).profile_write = Some(nth);
    }

    pub fn fail_availability_write(&self, nth: usize) {
        lock(&self.faults).availability_write = Some(nth);
    }

    pub fn fail_commit(&self) {
        lock(&self.faults).fail_commit = true;
    }

    /// Committed availability rows.
    pub fn availability_rows(&self) -> Vec<AvailabilityRow> {
        lock(&self.tables).availabilities.clone()
    }

    /// Committed competence-profile rows.
    pub fn profile_rows(&self) -> Vec<CompetenceProfileRow> {
        lock(&self.tables).profiles.clone()
    }

    fn person_lock(&self, person_id: i64) -> Arc<AsyncMutex<()>> {
        Arc::clone(lock(&self.person_locks).entry(person_id).or_default())
    }
}

#[async_trait]
impl TransactionManager for MemoryStore {
    type Tx = MemoryTx;

    async fn begin(&self) -> Result<MemoryTx, PersistenceError> {
        self.calls.begins.fetch_add(1, Ordering::SeqCst);
        Ok(MemoryTx {
            availabilities: Vec::new(),
            profiles: Vec::new(),
            held: Vec::new(),
        })
    }

    async fn commit(&self, tx: MemoryTx) -> Result<(), PersistenceError> {
        self.calls.commits.fetch_add(1, Ordering::SeqCst);
        if lock(&self.faults).fail_commit {
            // `tx` drops here; its rows are discarded and its locks released
            return Err(PersistenceError::Unavailable("commit failed".to_string()));
        }
        let MemoryTx {
            availabilities,
            profiles,
            held,
        } = tx;
        {
            let mut tables = lock(&self.tables);
            tables.availabilities.extend(availabilities);
            tables.profiles.extend(profiles);
        }
        drop(held);
        Ok(())
    }

    async fn rollback(&self, tx: MemoryTx) -> Result<(), PersistenceError> {
        self.calls.rollbacks.fetch_add(1, Ordering::SeqCst);
        drop(tx);
        Ok(())
    }
}

#[async_trait]
impl UserDao for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, PersistenceError> {
        self.calls.user_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(lock(&self.tables).users.get(&id).cloned())
    }
}

#[async_trait]
impl AvailabilityDao<MemoryTx> for MemoryStore {
    async fn create(
        &self,
        tx: &mut MemoryTx,
        entry: &NewAvailability,
    ) -> Result<(), PersistenceError> {
        let nth = self.calls.availability_writes.fetch_add(1, Ordering::SeqCst) + 1;
        if lock(&self.faults).availability_write == Some(nth) {
            return Err(PersistenceError::Constraint("availability_period_check".to_string()));
        }
        let id = lock(&self.tables).next_id();
        tx.availabilities.push(AvailabilityRow {
            availability_id: id,
            person_id: entry.person_id,
            from_date: entry.from_date,
            to_date: entry.to_date,
        });
        Ok(())
    }
}

#[async_trait]
impl CompetenceProfileDao<MemoryTx> for MemoryStore {
    async fn create(
        &self,
        tx: &mut MemoryTx,
        entry: &NewCompetenceProfile,
    ) -> Result<(), PersistenceError> {
        let nth = self.calls.profile_writes.fetch_add(1, Ordering::SeqCst) + 1;
        if lock(&self.faults).profile_write == Some(nth) {
            return Err(PersistenceError::Constraint(
                "competence_profile_competence_id_fkey".to_string(),
            ));
        }
        let id = lock(&self.tables).next_id();
        tx.profiles.push(CompetenceProfileRow {
            competence_profile_id: id,
            person_id: entry.person_id,
            competence_id: entry.competence_id,
            years_of_experience: entry.years_of_experience.as_decimal(),
        });
        Ok(())
    }
}

#[async_trait]
impl SubmissionLedger<MemoryTx> for MemoryStore {
    async fn lock_person(&self, tx: &mut MemoryTx, person_id: i64) -> Result<(), PersistenceError> {
        self.calls.person_locks.fetch_add(1, Ordering::SeqCst);
        let guard = self.person_lock(person_id).lock_owned().await;
        tx.held.push(guard);
        Ok(())
    }

    async fn has_submitted(
        &self,
        tx: &mut MemoryTx,
        person_id: i64,
    ) -> Result<bool, PersistenceError> {
        self.calls.submission_checks.fetch_add(1, Ordering::SeqCst);
        let found = tx.has_rows_for(person_id) || lock(&self.tables).has_rows_for(person_id);
        // a database answers after a round trip; let other tasks run meanwhile
        tokio::task::yield_now().await;
        Ok(found)
    }
}

#[async_trait]
impl CompetenceDao for MemoryStore {
    async fn all(&self, language: Language) -> Result<Vec<Competence>, PersistenceError> {
        let tables = lock(&self.tables);
        let mut catalogue: Vec<Competence> = tables
            .competences
            .iter()
            .map(|(base, swedish)| match (language, swedish) {
                (Language::Sv, Some(name)) => Competence {
                    id: base.id,
                    competence_name: name.clone(),
                },
                _ => base.clone(),
            })
            .collect();
        catalogue.sort_by_key(|c| c.id);
        Ok(catalogue)
    }
}

#[async_trait]
impl ApplicationReader for MemoryStore {
    async fn availabilities(&self) -> Result<Vec<AvailabilityRow>, PersistenceError> {
        Ok(self.availability_rows())
    }

    async fn competence_profiles(&self) -> Result<Vec<CompetenceProfileRow>, PersistenceError> {
        Ok(self.profile_rows())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn availability(person_id: i64) -> NewAvailability {
        NewAvailability {
            person_id,
            from_date: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            to_date: Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_uncommitted_writes_stay_private_and_are_discarded_on_drop() {
        let store = MemoryStore::new();
        {
            let mut tx = store.begin().await.unwrap();
            AvailabilityDao::create(&store, &mut tx, &availability(1))
                .await
                .unwrap();
            assert!(store.availability_rows().is_empty());
            assert!(store.has_submitted(&mut tx, 1).await.unwrap());

            let mut other = store.begin().await.unwrap();
            assert!(!store.has_submitted(&mut other, 1).await.unwrap());
        }
        assert!(store.availability_rows().is_empty());
    }

    #[tokio::test]
    async fn test_commit_publishes_writes() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        AvailabilityDao::create(&store, &mut tx, &availability(1))
            .await
            .unwrap();
        store.commit(tx).await.unwrap();
        assert_eq!(store.availability_rows().len(), 1);

        let mut tx = store.begin().await.unwrap();
        assert!(store.has_submitted(&mut tx, 1).await.unwrap());
        assert!(!store.has_submitted(&mut tx, 2).await.unwrap());
    }

    #[tokio::test]
    async fn test_person_lock_is_held_until_the_transaction_ends() {
        let store = MemoryStore::new();
        let mut first = store.begin().await.unwrap();
        store.lock_person(&mut first, 42).await.unwrap();

        let mut second = store.begin().await.unwrap();
        let waiting = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            store.lock_person(&mut second, 42),
        )
        .await;
        assert!(waiting.is_err(), "second lock should wait for the first");

        // other applicants are not blocked
        let mut third = store.begin().await.unwrap();
        store.lock_person(&mut third, 7).await.unwrap();

        store.rollback(first).await.unwrap();
        store.lock_person(&mut second, 42).await.unwrap();
    }

    #[tokio::test]
    async fn test_catalogue_translation_falls_back() {
        let store = MemoryStore::new()
            .with_competence(2, "Lotteries", Some("Lotterier"))
            .with_competence(1, "Ticket sales", None);
        let sv = store.all(Language::Sv).await.unwrap();
        assert_eq!(sv[0].competence_name, "Ticket sales");
        assert_eq!(sv[1].competence_name, "Lotterier");
    }
}
