//! Request and response bodies shared by the medication handlers.
//!
//! Request types carry raw wire values; each exposes a conversion into the
//! matching domain draft that validates field by field, so failures name the
//! offending field in `details`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use utoipa::ToSchema;

use crate::domain::{
    ConsumptionRecord, Dosage, DosesPerDay, EmailAddress, Error, FieldUpdate, Medicine,
    MedicineDraft, MedicineId, MedicineName, MedicineUpdate, MedicineValidationError, MissedDose,
    OverdueDose, User, UserDraft, UserId, UserName,
};
use crate::inbound::http::validation::{
    FieldName, MEDICINE_ID, USER_ID, medicine_validation_error, nullable, parse_medicine_id,
    parse_optional_timestamp, parse_timestamp, parse_user_id, user_validation_error,
};

/// `{user_id}` path segment.
#[derive(Debug, Deserialize)]
pub(crate) struct UserPath {
    user_id: i64,
}

impl UserPath {
    pub(crate) fn parse(self) -> Result<UserId, Error> {
        parse_user_id(self.user_id, USER_ID)
    }
}

/// `{user_id}/medicines/{medicine_id}` path segments.
#[derive(Debug, Deserialize)]
pub(crate) struct MedicinePath {
    user_id: i64,
    medicine_id: i64,
}

impl MedicinePath {
    pub(crate) fn parse(self) -> Result<(UserId, MedicineId), Error> {
        Ok((
            parse_user_id(self.user_id, USER_ID)?,
            parse_medicine_id(self.medicine_id, MEDICINE_ID)?,
        ))
    }
}

/// Medicine as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MedicineBody {
    pub id: i64,
    pub name: String,
    pub dosage: String,
    /// Doses per day; `0` means as needed.
    pub frequency: u32,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl From<&Medicine> for MedicineBody {
    fn from(value: &Medicine) -> Self {
        Self {
            id: value.id().get(),
            name: value.name().as_ref().to_owned(),
            dosage: value.dosage().as_ref().to_owned(),
            frequency: value.frequency().get(),
            start_date: value.start_date(),
            end_date: value.end_date(),
            notes: value.notes().map(str::to_owned),
        }
    }
}

impl From<Medicine> for MedicineBody {
    fn from(value: Medicine) -> Self {
        Self::from(&value)
    }
}

/// User with the medicines it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserBody {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub medicines: Vec<MedicineBody>,
}

impl From<User> for UserBody {
    fn from(value: User) -> Self {
        Self {
            id: value.id().get(),
            name: value.name().as_ref().to_owned(),
            email: value.email().as_ref().to_owned(),
            medicines: value.medicines().iter().map(MedicineBody::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConsumptionRecordBody {
    pub user_id: i64,
    pub medicine_id: i64,
    pub time_taken: DateTime<Utc>,
    pub notes: Option<String>,
}

impl From<ConsumptionRecord> for ConsumptionRecordBody {
    fn from(value: ConsumptionRecord) -> Self {
        Self {
            user_id: value.user_id().get(),
            medicine_id: value.medicine_id().get(),
            time_taken: value.time_taken(),
            notes: value.notes().map(str::to_owned),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MissedDoseBody {
    pub user_id: i64,
    pub medicine_id: i64,
    pub time_missed: DateTime<Utc>,
    pub reason: Option<String>,
}

impl From<MissedDose> for MissedDoseBody {
    fn from(value: MissedDose) -> Self {
        Self {
            user_id: value.user_id().get(),
            medicine_id: value.medicine_id().get(),
            time_missed: value.time_missed(),
            reason: value.reason().map(str::to_owned),
        }
    }
}

/// A scheduled dose slot for today that is due and not yet taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OverdueDoseBody {
    pub medicine_id: i64,
    pub name: String,
    pub scheduled_at: DateTime<Utc>,
}

impl From<OverdueDose> for OverdueDoseBody {
    fn from(value: OverdueDose) -> Self {
        Self {
            medicine_id: value.medicine_id.get(),
            name: value.medicine_name,
            scheduled_at: value.scheduled_at,
        }
    }
}

/// Medicine as submitted when adding it, alone or inline with a new user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MedicineRequest {
    /// Assigned by the server when omitted.
    pub id: Option<i64>,
    pub name: String,
    pub dosage: String,
    pub frequency: i64,
    #[schema(format = "date-time")]
    pub start_date: String,
    #[schema(format = "date-time")]
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl MedicineRequest {
    pub(crate) fn into_draft(self) -> Result<MedicineDraft, Error> {
        let id = self
            .id
            .map(|id| parse_medicine_id(id, FieldName::new("id")))
            .transpose()?;
        Ok(MedicineDraft {
            id,
            name: MedicineName::new(self.name).map_err(medicine_validation_error)?,
            dosage: Dosage::new(self.dosage).map_err(medicine_validation_error)?,
            frequency: DosesPerDay::new(self.frequency).map_err(medicine_validation_error)?,
            start_date: parse_timestamp(self.start_date, FieldName::new("start_date"))?,
            end_date: parse_optional_timestamp(self.end_date, FieldName::new("end_date"))?,
            notes: self.notes,
        })
    }
}

/// New user, optionally with medicines attached from the start.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    /// Assigned by the server when omitted.
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub medicines: Vec<MedicineRequest>,
}

/// Tag a nested medicine failure with its position in the request.
fn at_medicine_index(error: Error, index: usize) -> Error {
    let mut details = error.details().cloned().unwrap_or_else(|| json!({}));
    if let Value::Object(map) = &mut details {
        map.insert("parent".to_owned(), json!("medicines"));
        map.insert("index".to_owned(), json!(index));
    }
    error.with_details(details)
}

impl CreateUserRequest {
    pub(crate) fn into_draft(self) -> Result<UserDraft, Error> {
        let id = self
            .id
            .map(|id| parse_user_id(id, FieldName::new("id")))
            .transpose()?;
        let name = UserName::new(self.name).map_err(user_validation_error)?;
        let email = EmailAddress::new(self.email).map_err(user_validation_error)?;
        let medicines = self
            .medicines
            .into_iter()
            .enumerate()
            .map(|(index, medicine)| {
                medicine
                    .into_draft()
                    .map_err(|err| at_medicine_index(err, index))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(UserDraft {
            id,
            name,
            email,
            medicines,
        })
    }
}

/// Partial medicine update.
///
/// An absent field is left unchanged; an explicit `null` clears it, which
/// only `end_date` and `notes` allow.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateMedicineRequest {
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub dosage: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<i64>)]
    pub frequency: Option<Option<i64>>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, format = "date-time")]
    pub end_date: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
}

fn required<T>(update: FieldUpdate<T>, field: &'static str) -> Result<FieldUpdate<T>, Error> {
    match update {
        FieldUpdate::Clear => Err(medicine_validation_error(
            MedicineValidationError::CannotClear { field },
        )),
        other => Ok(other),
    }
}

impl UpdateMedicineRequest {
    pub(crate) fn into_update(self) -> Result<MedicineUpdate, Error> {
        let dosage = required(FieldUpdate::from_nullable(self.dosage), "dosage")?
            .try_map(Dosage::new)
            .map_err(medicine_validation_error)?;
        let frequency = required(FieldUpdate::from_nullable(self.frequency), "frequency")?
            .try_map(DosesPerDay::new)
            .map_err(medicine_validation_error)?;
        let end_date = FieldUpdate::from_nullable(self.end_date)
            .try_map(|raw| parse_timestamp(raw, FieldName::new("end_date")))?;
        Ok(MedicineUpdate {
            dosage,
            frequency,
            end_date,
            notes: FieldUpdate::from_nullable(self.notes),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConsumptionRequest {
    #[schema(format = "date-time")]
    pub time_taken: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ConsumptionRequest {
    pub(crate) fn into_record(
        self,
        user_id: UserId,
        medicine_id: MedicineId,
    ) -> Result<ConsumptionRecord, Error> {
        let time_taken = parse_timestamp(self.time_taken, FieldName::new("time_taken"))?;
        Ok(ConsumptionRecord::new(
            user_id,
            medicine_id,
            time_taken,
            self.notes,
        ))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MissedDoseRequest {
    #[schema(format = "date-time")]
    pub time_missed: String,
    #[serde(default)]
    pub reason: Option<String>,
}

impl MissedDoseRequest {
    pub(crate) fn into_missed_dose(
        self,
        user_id: UserId,
        medicine_id: MedicineId,
    ) -> Result<MissedDose, Error> {
        let time_missed = parse_timestamp(self.time_missed, FieldName::new("time_missed"))?;
        Ok(MissedDose::new(user_id, medicine_id, time_missed, self.reason))
    }
}

/// Acknowledgement carrying only a message.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub msg: String,
}

impl MessageResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}
