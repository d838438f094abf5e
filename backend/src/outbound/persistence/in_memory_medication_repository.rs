//! Process-local `MedicationRepository` implementation.
//!
//! Users are indexed by id behind a `RwLock`; each user aggregate sits behind
//! its own `Mutex`, so writes to one user serialise while other users proceed.
//! Guards are dropped before returning, never held across an `.await`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::ports::{MedicationRepository, MedicationRepositoryError};
use crate::domain::{Medicine, MedicineId, MedicineListError, MedicineUpdate, User, UserId};

#[derive(Default)]
struct UserIndex {
    order: Vec<UserId>,
    by_id: HashMap<UserId, Arc<Mutex<User>>>,
}

/// In-memory implementation of the medication repository port.
pub struct InMemoryMedicationRepository {
    users: RwLock<UserIndex>,
    next_user_id: AtomicI64,
    next_medicine_id: AtomicI64,
}

impl Default for InMemoryMedicationRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned(lock: &str) -> MedicationRepositoryError {
    warn!(lock, "in-memory store lock poisoned");
    MedicationRepositoryError::query(format!("{lock} lock poisoned"))
}

fn lock_user(user: &Mutex<User>) -> Result<MutexGuard<'_, User>, MedicationRepositoryError> {
    user.lock().map_err(|_| poisoned("user aggregate"))
}

fn map_list_error(user_id: UserId, error: MedicineListError) -> MedicationRepositoryError {
    match error {
        MedicineListError::Duplicate(medicine_id) => {
            MedicationRepositoryError::duplicate_medicine(user_id, medicine_id)
        }
        MedicineListError::Missing(medicine_id) => {
            MedicationRepositoryError::medicine_not_found(user_id, medicine_id)
        }
        MedicineListError::Invalid(err) => MedicationRepositoryError::rejected(err.to_string()),
    }
}

/// Advance `counter` past `taken` so generated ids never collide with
/// caller-supplied ones.
fn bump_past(counter: &AtomicI64, taken: i64) {
    counter.fetch_max(taken.saturating_add(1), Ordering::SeqCst);
}

impl InMemoryMedicationRepository {
    /// Create an empty store. Generated ids start at 1.
    pub fn new() -> Self {
        Self {
            users: RwLock::new(UserIndex::default()),
            next_user_id: AtomicI64::new(1),
            next_medicine_id: AtomicI64::new(1),
        }
    }

    fn aggregate(&self, user_id: UserId) -> Result<Arc<Mutex<User>>, MedicationRepositoryError> {
        let index = self.users.read().map_err(|_| poisoned("user index"))?;
        index
            .by_id
            .get(&user_id)
            .cloned()
            .ok_or_else(|| MedicationRepositoryError::user_not_found(user_id))
    }

    /// Hand out the counter's value and advance it. Once the counter reaches
    /// `i64::MAX` it stays there and allocation fails.
    fn allocate(counter: &AtomicI64, kind: &str) -> Result<i64, MedicationRepositoryError> {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |next| next.checked_add(1))
            .map_err(|_| {
                warn!(kind, "identifier sequence exhausted");
                MedicationRepositoryError::ids_exhausted(kind)
            })
    }
}

#[async_trait]
impl MedicationRepository for InMemoryMedicationRepository {
    async fn next_user_id(&self) -> Result<UserId, MedicationRepositoryError> {
        let index = self.users.read().map_err(|_| poisoned("user index"))?;
        loop {
            let candidate = UserId::new(Self::allocate(&self.next_user_id, "user")?)
                .map_err(|err| MedicationRepositoryError::query(err.to_string()))?;
            if !index.by_id.contains_key(&candidate) {
                return Ok(candidate);
            }
        }
    }

    async fn next_medicine_id(&self) -> Result<MedicineId, MedicationRepositoryError> {
        MedicineId::new(Self::allocate(&self.next_medicine_id, "medicine")?)
            .map_err(|err| MedicationRepositoryError::query(err.to_string()))
    }

    async fn insert_user(&self, user: &User) -> Result<(), MedicationRepositoryError> {
        let mut index = self.users.write().map_err(|_| poisoned("user index"))?;
        if index.by_id.contains_key(&user.id()) {
            debug!(user_id = %user.id(), "rejecting duplicate user id");
            return Err(MedicationRepositoryError::duplicate_user(user.id()));
        }
        bump_past(&self.next_user_id, user.id().get());
        for medicine in user.medicines() {
            bump_past(&self.next_medicine_id, medicine.id().get());
        }
        index.order.push(user.id());
        index
            .by_id
            .insert(user.id(), Arc::new(Mutex::new(user.clone())));
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, MedicationRepositoryError> {
        let aggregates: Vec<Arc<Mutex<User>>> = {
            let index = self.users.read().map_err(|_| poisoned("user index"))?;
            index
                .order
                .iter()
                .filter_map(|id| index.by_id.get(id).cloned())
                .collect()
        };
        aggregates
            .iter()
            .map(|user| lock_user(user).map(|guard| User::clone(&guard)))
            .collect()
    }

    async fn find_user(&self, user_id: UserId) -> Result<Option<User>, MedicationRepositoryError> {
        match self.aggregate(user_id) {
            Ok(user) => {
                let snapshot = lock_user(&user)?.clone();
                Ok(Some(snapshot))
            }
            Err(MedicationRepositoryError::UserNotFound { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn add_medicine(
        &self,
        user_id: UserId,
        medicine: &Medicine,
    ) -> Result<(), MedicationRepositoryError> {
        let user = self.aggregate(user_id)?;
        let mut guard = lock_user(&user)?;
        guard
            .add_medicine(medicine.clone())
            .map_err(|err| map_list_error(user_id, err))?;
        bump_past(&self.next_medicine_id, medicine.id().get());
        Ok(())
    }

    async fn update_medicine(
        &self,
        user_id: UserId,
        medicine_id: MedicineId,
        update: &MedicineUpdate,
    ) -> Result<Medicine, MedicationRepositoryError> {
        let user = self.aggregate(user_id)?;
        let mut guard = lock_user(&user)?;
        guard
            .update_medicine(medicine_id, update)
            .map_err(|err| map_list_error(user_id, err))
    }

    async fn remove_medicine(
        &self,
        user_id: UserId,
        medicine_id: MedicineId,
    ) -> Result<bool, MedicationRepositoryError> {
        let user = self.aggregate(user_id)?;
        let mut guard = lock_user(&user)?;
        Ok(guard.remove_medicine(medicine_id))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::{
        Dosage, DosesPerDay, EmailAddress, FieldUpdate, MedicineDraft, MedicineName, UserName,
    };

    fn user(id: i64) -> User {
        User::new(
            UserId::new(id).expect("user id"),
            UserName::new(format!("User {id}")).expect("name"),
            EmailAddress::new(format!("user{id}@example.com")).expect("email"),
        )
    }

    fn medicine(id: i64) -> Medicine {
        Medicine::new(
            MedicineId::new(id).expect("medicine id"),
            MedicineDraft {
                id: None,
                name: MedicineName::new("Aspirin").expect("name"),
                dosage: Dosage::new("100mg").expect("dosage"),
                frequency: DosesPerDay::new(2).expect("frequency"),
                start_date: Utc
                    .with_ymd_and_hms(2024, 1, 1, 8, 0, 0)
                    .single()
                    .expect("timestamp"),
                end_date: None,
                notes: None,
            },
        )
        .expect("medicine")
    }

    #[fixture]
    fn repo() -> InMemoryMedicationRepository {
        InMemoryMedicationRepository::new()
    }

    #[rstest]
    #[tokio::test]
    async fn users_are_listed_in_insertion_order(repo: InMemoryMedicationRepository) {
        repo.insert_user(&user(5)).await.expect("insert 5");
        repo.insert_user(&user(2)).await.expect("insert 2");

        let ids: Vec<i64> = repo
            .list_users()
            .await
            .expect("list")
            .iter()
            .map(|u| u.id().get())
            .collect();
        assert_eq!(ids, vec![5, 2]);
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_user_ids_are_rejected(repo: InMemoryMedicationRepository) {
        repo.insert_user(&user(1)).await.expect("insert");
        let err = repo.insert_user(&user(1)).await.expect_err("duplicate");
        assert_eq!(err, MedicationRepositoryError::duplicate_user(1_i64));
    }

    #[rstest]
    #[tokio::test]
    async fn generated_ids_skip_caller_supplied_ones(repo: InMemoryMedicationRepository) {
        repo.insert_user(&user(1)).await.expect("insert 1");
        repo.insert_user(&user(3)).await.expect("insert 3");

        let next = repo.next_user_id().await.expect("allocate");
        assert_eq!(next.get(), 4);
    }

    #[rstest]
    #[case(i64::MAX)]
    #[case(i64::MAX - 1)]
    #[tokio::test]
    async fn user_ids_stop_at_the_top_of_the_range(
        repo: InMemoryMedicationRepository,
        #[case] taken: i64,
    ) {
        repo.insert_user(&user(taken)).await.expect("insert");

        for _ in 0..2 {
            let err = repo.next_user_id().await.expect_err("exhausted");
            assert_eq!(err, MedicationRepositoryError::ids_exhausted("user"));
        }
        repo.insert_user(&user(7)).await.expect("explicit ids still work");
    }

    #[rstest]
    #[tokio::test]
    async fn medicine_ids_stop_at_the_top_of_the_range(repo: InMemoryMedicationRepository) {
        let owner = UserId::new(1).expect("id");
        repo.insert_user(&user(1)).await.expect("insert");
        repo.add_medicine(owner, &medicine(i64::MAX)).await.expect("add");

        for _ in 0..2 {
            let err = repo.next_medicine_id().await.expect_err("exhausted");
            assert_eq!(err, MedicationRepositoryError::ids_exhausted("medicine"));
        }
    }

    #[rstest]
    #[tokio::test]
    async fn medicine_writes_require_the_user(repo: InMemoryMedicationRepository) {
        let err = repo
            .add_medicine(UserId::new(9).expect("id"), &medicine(1))
            .await
            .expect_err("unknown user");
        assert_eq!(err, MedicationRepositoryError::user_not_found(9_i64));
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_medicine_ids_are_rejected(repo: InMemoryMedicationRepository) {
        let owner = UserId::new(1).expect("id");
        repo.insert_user(&user(1)).await.expect("insert");
        repo.add_medicine(owner, &medicine(10)).await.expect("add");

        let err = repo
            .add_medicine(owner, &medicine(10))
            .await
            .expect_err("duplicate");
        assert_eq!(
            err,
            MedicationRepositoryError::duplicate_medicine(1_i64, 10_i64)
        );
        assert_eq!(repo.next_medicine_id().await.expect("allocate").get(), 11);
    }

    #[rstest]
    #[tokio::test]
    async fn update_and_remove_work_on_the_stored_aggregate(repo: InMemoryMedicationRepository) {
        let owner = UserId::new(1).expect("id");
        let med_id = MedicineId::new(10).expect("id");
        repo.insert_user(&user(1)).await.expect("insert");
        repo.add_medicine(owner, &medicine(10)).await.expect("add");

        let update = MedicineUpdate {
            dosage: FieldUpdate::Set(Dosage::new("200mg").expect("dosage")),
            ..MedicineUpdate::default()
        };
        let updated = repo
            .update_medicine(owner, med_id, &update)
            .await
            .expect("update");
        assert_eq!(updated.dosage().as_ref(), "200mg");

        let stored = repo.find_user(owner).await.expect("find").expect("present");
        assert_eq!(stored.medicine(med_id), Some(&updated));

        assert!(repo.remove_medicine(owner, med_id).await.expect("remove"));
        assert!(!repo.remove_medicine(owner, med_id).await.expect("remove again"));
    }

    #[rstest]
    #[tokio::test]
    async fn rejected_updates_surface_as_rejected(repo: InMemoryMedicationRepository) {
        let owner = UserId::new(1).expect("id");
        repo.insert_user(&user(1)).await.expect("insert");
        repo.add_medicine(owner, &medicine(10)).await.expect("add");

        let update = MedicineUpdate {
            dosage: FieldUpdate::Clear,
            ..MedicineUpdate::default()
        };
        let err = repo
            .update_medicine(owner, MedicineId::new(10).expect("id"), &update)
            .await
            .expect_err("rejected");
        assert!(matches!(err, MedicationRepositoryError::Rejected { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn find_user_returns_none_for_unknown_ids(repo: InMemoryMedicationRepository) {
        let found = repo
            .find_user(UserId::new(3).expect("id"))
            .await
            .expect("lookup");
        assert!(found.is_none());
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_adds_to_one_user_are_not_lost() {
        let repo = Arc::new(InMemoryMedicationRepository::new());
        let owner = UserId::new(1).expect("id");
        repo.insert_user(&user(1)).await.expect("insert");

        let tasks: Vec<_> = (1..=32)
            .map(|id| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move { repo.add_medicine(owner, &medicine(id)).await })
            })
            .collect();
        for task in tasks {
            task.await.expect("task joined").expect("add succeeds");
        }

        let stored = repo.find_user(owner).await.expect("find").expect("present");
        assert_eq!(stored.medicines().len(), 32);
    }
}
