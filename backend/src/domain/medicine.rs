//! Medicine entity, its value objects and the partial update model.

use std::fmt;

use chrono::{DateTime, Utc};

/// Upper bound on doses per day; keeps the slot interval at one minute or more.
pub const MAX_DOSES_PER_DAY: u32 = 24 * 60;

/// Validation errors returned by medicine constructors and updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MedicineValidationError {
    NonPositiveId {
        value: i64,
    },
    EmptyName,
    EmptyDosage,
    NegativeFrequency {
        value: i64,
    },
    FrequencyTooHigh {
        max: u32,
    },
    EndBeforeStart {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    /// A required field was sent as an explicit clear.
    CannotClear {
        field: &'static str,
    },
}

impl fmt::Display for MedicineValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveId { value } => {
                write!(f, "medicine id must be a positive integer, got {value}")
            }
            Self::EmptyName => write!(f, "medicine name must not be empty"),
            Self::EmptyDosage => write!(f, "dosage must not be empty"),
            Self::NegativeFrequency { value } => {
                write!(f, "frequency must not be negative, got {value}")
            }
            Self::FrequencyTooHigh { max } => {
                write!(f, "frequency must be at most {max} doses per day")
            }
            Self::EndBeforeStart { start, end } => write!(
                f,
                "end date {} precedes start date {}",
                end.to_rfc3339(),
                start.to_rfc3339()
            ),
            Self::CannotClear { field } => write!(f, "{field} cannot be cleared"),
        }
    }
}

impl std::error::Error for MedicineValidationError {}

/// Medicine identifier, unique within the owning user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MedicineId(i64);

impl MedicineId {
    /// Validate and construct a [`MedicineId`].
    pub fn new(value: i64) -> Result<Self, MedicineValidationError> {
        if value <= 0 {
            return Err(MedicineValidationError::NonPositiveId { value });
        }
        Ok(Self(value))
    }

    /// Raw integer value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for MedicineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<MedicineId> for i64 {
    fn from(value: MedicineId) -> Self {
        value.0
    }
}

/// Medicine name as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedicineName(String);

impl MedicineName {
    pub fn new(name: impl Into<String>) -> Result<Self, MedicineValidationError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(MedicineValidationError::EmptyName);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for MedicineName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Free-text dosage such as `"500mg"` or `"2 puffs"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dosage(String);

impl Dosage {
    pub fn new(dosage: impl Into<String>) -> Result<Self, MedicineValidationError> {
        let dosage = dosage.into();
        if dosage.trim().is_empty() {
            return Err(MedicineValidationError::EmptyDosage);
        }
        Ok(Self(dosage))
    }
}

impl AsRef<str> for Dosage {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Expected doses per day. Zero means "as needed".
///
/// # Examples
/// ```
/// use medtrack::domain::DosesPerDay;
///
/// assert!(DosesPerDay::new(0).expect("as needed").is_as_needed());
/// assert!(DosesPerDay::new(-1).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DosesPerDay(u32);

impl DosesPerDay {
    pub fn new(value: i64) -> Result<Self, MedicineValidationError> {
        if value < 0 {
            return Err(MedicineValidationError::NegativeFrequency { value });
        }
        match u32::try_from(value) {
            Ok(count) if count <= MAX_DOSES_PER_DAY => Ok(Self(count)),
            _ => Err(MedicineValidationError::FrequencyTooHigh {
                max: MAX_DOSES_PER_DAY,
            }),
        }
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn is_as_needed(self) -> bool {
        self.0 == 0
    }
}

/// Three-state field used by partial updates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldUpdate<T> {
    /// Field absent from the request.
    #[default]
    Keep,
    Set(T),
    /// Field sent as an explicit `null`.
    Clear,
}

impl<T> FieldUpdate<T> {
    /// Map absent, `null` and present values onto the three states.
    pub fn from_nullable(value: Option<Option<T>>) -> Self {
        match value {
            None => Self::Keep,
            Some(None) => Self::Clear,
            Some(Some(inner)) => Self::Set(inner),
        }
    }

    /// Map the carried value, keeping the state.
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<FieldUpdate<U>, E> {
        Ok(match self {
            Self::Keep => FieldUpdate::Keep,
            Self::Clear => FieldUpdate::Clear,
            Self::Set(value) => FieldUpdate::Set(f(value)?),
        })
    }

    fn apply_required(
        &self,
        current: &T,
        field: &'static str,
    ) -> Result<T, MedicineValidationError>
    where
        T: Clone,
    {
        match self {
            Self::Keep => Ok(current.clone()),
            Self::Set(value) => Ok(value.clone()),
            Self::Clear => Err(MedicineValidationError::CannotClear { field }),
        }
    }

    fn apply_optional(&self, current: Option<&T>) -> Option<T>
    where
        T: Clone,
    {
        match self {
            Self::Keep => current.cloned(),
            Self::Set(value) => Some(value.clone()),
            Self::Clear => None,
        }
    }
}

/// Partial update of the mutable medicine fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MedicineUpdate {
    pub dosage: FieldUpdate<Dosage>,
    pub frequency: FieldUpdate<DosesPerDay>,
    pub end_date: FieldUpdate<DateTime<Utc>>,
    pub notes: FieldUpdate<String>,
}

/// Validated input for adding a medicine. The store assigns an id when `id`
/// is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedicineDraft {
    pub id: Option<MedicineId>,
    pub name: MedicineName,
    pub dosage: Dosage,
    pub frequency: DosesPerDay,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// A medicine on a user's schedule.
///
/// ## Invariants
/// - `end_date`, when present, is not before `start_date`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Medicine {
    id: MedicineId,
    name: MedicineName,
    dosage: Dosage,
    frequency: DosesPerDay,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    notes: Option<String>,
}

fn check_dates(
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
) -> Result<(), MedicineValidationError> {
    match end {
        Some(end) if end < start => Err(MedicineValidationError::EndBeforeStart { start, end }),
        _ => Ok(()),
    }
}

impl Medicine {
    /// Build a medicine from a draft using the resolved identifier.
    pub fn new(id: MedicineId, draft: MedicineDraft) -> Result<Self, MedicineValidationError> {
        let MedicineDraft {
            name,
            dosage,
            frequency,
            start_date,
            end_date,
            notes,
            ..
        } = draft;
        check_dates(start_date, end_date)?;
        Ok(Self {
            id,
            name,
            dosage,
            frequency,
            start_date,
            end_date,
            notes,
        })
    }

    pub fn id(&self) -> MedicineId {
        self.id
    }

    pub fn name(&self) -> &MedicineName {
        &self.name
    }

    pub fn dosage(&self) -> &Dosage {
        &self.dosage
    }

    pub fn frequency(&self) -> DosesPerDay {
        self.frequency
    }

    pub fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<DateTime<Utc>> {
        self.end_date
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Case-insensitive substring match on the name.
    pub fn name_matches(&self, query: &str) -> bool {
        self.name
            .as_ref()
            .to_lowercase()
            .contains(&query.to_lowercase())
    }

    /// Return a copy with `update` applied, or the first validation failure.
    ///
    /// # Examples
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use medtrack::domain::{
    ///     Dosage, DosesPerDay, FieldUpdate, Medicine, MedicineDraft, MedicineId, MedicineName,
    ///     MedicineUpdate,
    /// };
    ///
    /// let draft = MedicineDraft {
    ///     id: None,
    ///     name: MedicineName::new("Aspirin").expect("name"),
    ///     dosage: Dosage::new("100mg").expect("dosage"),
    ///     frequency: DosesPerDay::new(2).expect("frequency"),
    ///     start_date: Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
    ///     end_date: None,
    ///     notes: None,
    /// };
    /// let medicine = Medicine::new(MedicineId::new(1).expect("id"), draft).expect("medicine");
    /// let update = MedicineUpdate {
    ///     dosage: FieldUpdate::Set(Dosage::new("200mg").expect("dosage")),
    ///     ..MedicineUpdate::default()
    /// };
    /// let updated = medicine.apply(&update).expect("valid update");
    /// assert_eq!(updated.dosage().as_ref(), "200mg");
    /// assert_eq!(updated.frequency(), medicine.frequency());
    /// ```
    pub fn apply(&self, update: &MedicineUpdate) -> Result<Self, MedicineValidationError> {
        let dosage = update.dosage.apply_required(&self.dosage, "dosage")?;
        let frequency = update.frequency.apply_required(&self.frequency, "frequency")?;
        let end_date = update.end_date.apply_optional(self.end_date.as_ref());
        let notes = update.notes.apply_optional(self.notes.as_ref());
        check_dates(self.start_date, end_date)?;
        Ok(Self {
            id: self.id,
            name: self.name.clone(),
            dosage,
            frequency,
            start_date: self.start_date,
            end_date,
            notes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[fixture]
    fn medicine() -> Medicine {
        Medicine::new(
            MedicineId::new(3).expect("id"),
            MedicineDraft {
                id: None,
                name: MedicineName::new("Ibuprofen").expect("name"),
                dosage: Dosage::new("200mg").expect("dosage"),
                frequency: DosesPerDay::new(3).expect("frequency"),
                start_date: at(1, 8),
                end_date: Some(at(10, 8)),
                notes: Some("with food".to_owned()),
            },
        )
        .expect("valid medicine")
    }

    #[rstest]
    #[case(0)]
    #[case(-4)]
    fn medicine_id_rejects_non_positive(#[case] value: i64) {
        assert_eq!(
            MedicineId::new(value),
            Err(MedicineValidationError::NonPositiveId { value })
        );
    }

    #[rstest]
    #[case(-1, false)]
    #[case(0, true)]
    #[case(24, true)]
    #[case(i64::from(MAX_DOSES_PER_DAY) + 1, false)]
    fn doses_per_day_bounds(#[case] value: i64, #[case] ok: bool) {
        assert_eq!(DosesPerDay::new(value).is_ok(), ok);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn dosage_rejects_blank(#[case] raw: &str) {
        assert_eq!(Dosage::new(raw), Err(MedicineValidationError::EmptyDosage));
    }

    #[rstest]
    fn new_rejects_end_before_start() {
        let draft = MedicineDraft {
            id: None,
            name: MedicineName::new("Ibuprofen").expect("name"),
            dosage: Dosage::new("200mg").expect("dosage"),
            frequency: DosesPerDay::new(1).expect("frequency"),
            start_date: at(5, 8),
            end_date: Some(at(4, 8)),
            notes: None,
        };
        let result = Medicine::new(MedicineId::new(1).expect("id"), draft);
        assert!(matches!(
            result,
            Err(MedicineValidationError::EndBeforeStart { .. })
        ));
    }

    #[rstest]
    fn empty_update_is_identity(medicine: Medicine) {
        let updated = medicine
            .apply(&MedicineUpdate::default())
            .expect("empty update is valid");
        assert_eq!(updated, medicine);
    }

    #[rstest]
    fn frequency_can_be_set_to_zero(medicine: Medicine) {
        let update = MedicineUpdate {
            frequency: FieldUpdate::Set(DosesPerDay::new(0).expect("zero")),
            ..MedicineUpdate::default()
        };
        let updated = medicine.apply(&update).expect("valid update");
        assert!(updated.frequency().is_as_needed());
        assert_eq!(updated.dosage(), medicine.dosage());
    }

    #[rstest]
    fn empty_notes_are_stored(medicine: Medicine) {
        let update = MedicineUpdate {
            notes: FieldUpdate::Set(String::new()),
            ..MedicineUpdate::default()
        };
        let updated = medicine.apply(&update).expect("valid update");
        assert_eq!(updated.notes(), Some(""));
    }

    #[rstest]
    fn optional_fields_can_be_cleared(medicine: Medicine) {
        let update = MedicineUpdate {
            end_date: FieldUpdate::Clear,
            notes: FieldUpdate::Clear,
            ..MedicineUpdate::default()
        };
        let updated = medicine.apply(&update).expect("valid update");
        assert!(updated.end_date().is_none());
        assert!(updated.notes().is_none());
    }

    #[rstest]
    fn required_fields_cannot_be_cleared(medicine: Medicine) {
        let update = MedicineUpdate {
            dosage: FieldUpdate::Clear,
            ..MedicineUpdate::default()
        };
        assert_eq!(
            medicine.apply(&update),
            Err(MedicineValidationError::CannotClear { field: "dosage" })
        );
    }

    #[rstest]
    fn update_rejects_end_before_start(medicine: Medicine) {
        let update = MedicineUpdate {
            end_date: FieldUpdate::Set(at(1, 7)),
            ..MedicineUpdate::default()
        };
        assert!(matches!(
            medicine.apply(&update),
            Err(MedicineValidationError::EndBeforeStart { .. })
        ));
    }

    #[rstest]
    #[case("ibu", true)]
    #[case("PROFEN", true)]
    #[case("aspirin", false)]
    fn name_matching_ignores_case(medicine: Medicine, #[case] query: &str, #[case] hit: bool) {
        assert_eq!(medicine.name_matches(query), hit);
    }

    #[rstest]
    fn nullable_maps_to_three_states() {
        assert_eq!(FieldUpdate::<u8>::from_nullable(None), FieldUpdate::Keep);
        assert_eq!(FieldUpdate::<u8>::from_nullable(Some(None)), FieldUpdate::Clear);
        assert_eq!(FieldUpdate::from_nullable(Some(Some(4_u8))), FieldUpdate::Set(4));
    }
}
