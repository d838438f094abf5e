//! Port for the user aggregate store: users and the medicines they own.

use async_trait::async_trait;

use crate::domain::{Medicine, MedicineId, MedicineUpdate, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by medication repository adapters.
    pub enum MedicationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "medication repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "medication repository query failed: {message}",
        UserNotFound { user_id: i64 } => "user {user_id} not found",
        MedicineNotFound { user_id: i64, medicine_id: i64 } =>
            "medicine {medicine_id} not found for user {user_id}",
        DuplicateUser { user_id: i64 } => "user {user_id} already exists",
        DuplicateMedicine { user_id: i64, medicine_id: i64 } =>
            "medicine {medicine_id} already exists for user {user_id}",
        /// The identifier sequence cannot advance any further.
        IdsExhausted { kind: String } => "{kind} id space exhausted",
        /// The aggregate refused a mutation that fails validation.
        Rejected { message: String } => "{message}",
    }
}

/// Port for reading and mutating user aggregates.
///
/// Every mutation of a user's medicine list is atomic with respect to other
/// mutations of the same user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MedicationRepository: Send + Sync {
    /// Reserve the next free user identifier.
    async fn next_user_id(&self) -> Result<UserId, MedicationRepositoryError>;

    /// Reserve the next free medicine identifier.
    async fn next_medicine_id(&self) -> Result<MedicineId, MedicationRepositoryError>;

    /// Store a new user; fails with `DuplicateUser` if the id is taken.
    async fn insert_user(&self, user: &User) -> Result<(), MedicationRepositoryError>;

    /// All users in insertion order.
    async fn list_users(&self) -> Result<Vec<User>, MedicationRepositoryError>;

    /// Snapshot of one user, medicines included.
    async fn find_user(&self, user_id: UserId) -> Result<Option<User>, MedicationRepositoryError>;

    /// Append a medicine to a user's list.
    async fn add_medicine(
        &self,
        user_id: UserId,
        medicine: &Medicine,
    ) -> Result<(), MedicationRepositoryError>;

    /// Apply a partial update and return the stored result.
    async fn update_medicine(
        &self,
        user_id: UserId,
        medicine_id: MedicineId,
        update: &MedicineUpdate,
    ) -> Result<Medicine, MedicationRepositoryError>;

    /// Remove a medicine, reporting whether one was removed.
    async fn remove_medicine(
        &self,
        user_id: UserId,
        medicine_id: MedicineId,
    ) -> Result<bool, MedicationRepositoryError>;
}
