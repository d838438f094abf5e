//! User aggregate: identity, contact details and the owned medicine list.

use std::collections::HashMap;
use std::fmt;

use crate::domain::medicine::{
    Medicine, MedicineDraft, MedicineId, MedicineUpdate, MedicineValidationError,
};

/// Maximum number of characters accepted for a user name.
pub const USER_NAME_MAX: usize = 120;

/// Validation errors returned by user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    NonPositiveId { value: i64 },
    EmptyName,
    NameTooLong { max: usize },
    EmptyEmail,
    InvalidEmail,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveId { value } => {
                write!(f, "user id must be a positive integer, got {value}")
            }
            Self::EmptyName => write!(f, "user name must not be empty"),
            Self::NameTooLong { max } => write!(f, "user name must be at most {max} characters"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must look like local@domain"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(i64);

impl UserId {
    /// Validate and construct a [`UserId`].
    ///
    /// # Examples
    /// ```
    /// use medtrack::domain::UserId;
    ///
    /// assert!(UserId::new(1).is_ok());
    /// assert!(UserId::new(0).is_err());
    /// ```
    pub fn new(value: i64) -> Result<Self, UserValidationError> {
        if value <= 0 {
            return Err(UserValidationError::NonPositiveId { value });
        }
        Ok(Self(value))
    }

    /// Raw integer value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for UserId {
    type Error = UserValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for i64 {
    fn from(value: UserId) -> Self {
        value.0
    }
}

/// Human readable user name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserName(String);

impl UserName {
    /// Validate and construct a [`UserName`]; surrounding whitespace is trimmed.
    pub fn new(name: impl Into<String>) -> Result<Self, UserValidationError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if trimmed.chars().count() > USER_NAME_MAX {
            return Err(UserValidationError::NameTooLong {
                max: USER_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Contact email address.
///
/// Only the shape `local@domain` is checked; deliverability is out of scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into();
        let trimmed = email.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        match trimmed.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(trimmed.to_owned()))
            }
            _ => Err(UserValidationError::InvalidEmail),
        }
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Validated input for registering a user. The store assigns ids when `id`
/// (or a medicine's `id`) is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    pub id: Option<UserId>,
    pub name: UserName,
    pub email: EmailAddress,
    /// Medicines registered together with the user.
    pub medicines: Vec<MedicineDraft>,
}

/// Failures raised while mutating a user's medicine list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MedicineListError {
    Duplicate(MedicineId),
    Missing(MedicineId),
    Invalid(MedicineValidationError),
}

impl fmt::Display for MedicineListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate(id) => write!(f, "medicine {id} already exists"),
            Self::Missing(id) => write!(f, "medicine {id} not found"),
            Self::Invalid(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for MedicineListError {}

/// Registered user and the medicines they take.
///
/// ## Invariants
/// - Medicine ids are unique within one user.
/// - `medicines` keeps insertion order.
/// - `positions` maps every medicine id to its index in `medicines`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: UserName,
    email: EmailAddress,
    medicines: Vec<Medicine>,
    positions: HashMap<MedicineId, usize>,
}

impl User {
    /// Build a user without medicines.
    pub fn new(id: UserId, name: UserName, email: EmailAddress) -> Self {
        Self {
            id,
            name,
            email,
            medicines: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Stable user identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &UserName {
        &self.name
    }

    /// Contact email.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Owned medicines in the order they were added.
    pub fn medicines(&self) -> &[Medicine] {
        &self.medicines
    }

    /// Look up one of the user's medicines.
    pub fn medicine(&self, medicine_id: MedicineId) -> Option<&Medicine> {
        self.positions
            .get(&medicine_id)
            .and_then(|&position| self.medicines.get(position))
    }

    /// Whether the user owns a medicine with this id.
    pub fn owns(&self, medicine_id: MedicineId) -> bool {
        self.medicine(medicine_id).is_some()
    }

    /// Medicines whose name contains `query`, ignoring case.
    pub fn search_medicines(&self, query: &str) -> Vec<Medicine> {
        self.medicines
            .iter()
            .filter(|med| med.name_matches(query))
            .cloned()
            .collect()
    }

    /// Append a medicine, rejecting duplicate ids.
    pub fn add_medicine(&mut self, medicine: Medicine) -> Result<(), MedicineListError> {
        if self.owns(medicine.id()) {
            return Err(MedicineListError::Duplicate(medicine.id()));
        }
        self.positions.insert(medicine.id(), self.medicines.len());
        self.medicines.push(medicine);
        Ok(())
    }

    /// Apply a partial update to one medicine and return the new value.
    ///
    /// The list is left untouched when validation fails.
    pub fn update_medicine(
        &mut self,
        medicine_id: MedicineId,
        update: &MedicineUpdate,
    ) -> Result<Medicine, MedicineListError> {
        let slot = self
            .positions
            .get(&medicine_id)
            .and_then(|&position| self.medicines.get_mut(position))
            .ok_or(MedicineListError::Missing(medicine_id))?;
        let updated = slot.apply(update).map_err(MedicineListError::Invalid)?;
        *slot = updated.clone();
        Ok(updated)
    }

    /// Remove a medicine, returning whether anything was removed.
    pub fn remove_medicine(&mut self, medicine_id: MedicineId) -> bool {
        let Some(position) = self.positions.remove(&medicine_id) else {
            return false;
        };
        self.medicines.remove(position);
        for (index, med) in self.medicines.iter().enumerate().skip(position) {
            self.positions.insert(med.id(), index);
        }
        true
    }
}
