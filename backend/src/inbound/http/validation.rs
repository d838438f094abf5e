//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every failure becomes an `invalid_request` error whose `details` name the
//! offending field and a stable code.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::json;

use crate::domain::{
    Error, MedicineId, MedicineValidationError, UserId, UserValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidId,
    InvalidTimestamp,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidId => "invalid_id",
            ErrorCode::InvalidTimestamp => "invalid_timestamp",
            ErrorCode::InvalidValue => "invalid_value",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field: field.as_str(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<serde_json::Value>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) const USER_ID: FieldName = FieldName::new("user_id");
pub(crate) const MEDICINE_ID: FieldName = FieldName::new("medicine_id");

pub(crate) fn parse_user_id(value: i64, field: FieldName) -> Result<UserId, Error> {
    UserId::new(value).map_err(|err| {
        ValidationError::new(field, err.to_string()).with_value(ErrorCode::InvalidId, value)
    })
}

pub(crate) fn parse_medicine_id(value: i64, field: FieldName) -> Result<MedicineId, Error> {
    MedicineId::new(value).map_err(|err| {
        ValidationError::new(field, err.to_string()).with_value(ErrorCode::InvalidId, value)
    })
}

pub(crate) fn invalid_timestamp_error(field: FieldName, value: &str) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("{name} must be an ISO 8601 timestamp"))
        .with_value(ErrorCode::InvalidTimestamp, value)
}

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an RFC 3339 timestamp, or a naive one which is read as UTC.
///
/// # Examples
/// ```ignore
/// let parsed = parse_timestamp("2024-01-01T08:00:00".into(), FieldName::new("start_date"))?;
/// assert_eq!(parsed.to_rfc3339(), "2024-01-01T08:00:00+00:00");
/// ```
pub(crate) fn parse_timestamp(value: String, field: FieldName) -> Result<DateTime<Utc>, Error> {
    let raw = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| invalid_timestamp_error(field, &value))
}

pub(crate) fn parse_optional_timestamp(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<DateTime<Utc>>, Error> {
    value.map(|raw| parse_timestamp(raw, field)).transpose()
}

/// Map a user value-object failure onto the request field that caused it.
pub(crate) fn user_validation_error(err: UserValidationError) -> Error {
    let field = match err {
        UserValidationError::NonPositiveId { .. } => FieldName::new("id"),
        UserValidationError::EmptyName | UserValidationError::NameTooLong { .. } => {
            FieldName::new("name")
        }
        UserValidationError::EmptyEmail | UserValidationError::InvalidEmail => {
            FieldName::new("email")
        }
    };
    ValidationError::new(field, err.to_string()).with_code(ErrorCode::InvalidValue)
}

/// Map a medicine value-object failure onto the request field that caused it.
pub(crate) fn medicine_validation_error(err: MedicineValidationError) -> Error {
    let field = match &err {
        MedicineValidationError::NonPositiveId { .. } => FieldName::new("id"),
        MedicineValidationError::EmptyName => FieldName::new("name"),
        MedicineValidationError::EmptyDosage => FieldName::new("dosage"),
        MedicineValidationError::NegativeFrequency { .. }
        | MedicineValidationError::FrequencyTooHigh { .. } => FieldName::new("frequency"),
        MedicineValidationError::EndBeforeStart { .. } => FieldName::new("end_date"),
        MedicineValidationError::CannotClear { field } => FieldName::new(*field),
    };
    ValidationError::new(field, err.to_string()).with_code(ErrorCode::InvalidValue)
}

/// Deserialize a field as `Some(value)` when present, so `#[serde(default)]`
/// leaves absent fields as `None` and explicit `null` as `Some(None)`.
pub(crate) fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    const START: FieldName = FieldName::new("start_date");

    #[rstest]
    #[case("2024-01-01T08:00:00Z", "2024-01-01T08:00:00+00:00")]
    #[case("2024-01-01T10:00:00+02:00", "2024-01-01T08:00:00+00:00")]
    #[case("2024-01-01T08:00:00", "2024-01-01T08:00:00+00:00")]
    #[case("2024-01-01T08:00:00.250", "2024-01-01T08:00:00.250+00:00")]
    #[case("2024-01-01 08:00:00", "2024-01-01T08:00:00+00:00")]
    fn timestamps_accept_offset_and_naive(#[case] raw: &str, #[case] expected: &str) {
        let parsed = parse_timestamp(raw.to_owned(), START).expect("valid timestamp");
        assert_eq!(parsed.to_rfc3339(), expected);
    }

    #[rstest]
    #[case("yesterday")]
    #[case("2024-13-01T08:00:00")]
    #[case("")]
    fn invalid_timestamps_name_the_field(#[case] raw: &str) {
        let err = parse_timestamp(raw.to_owned(), START).expect_err("invalid");
        let details = err.details().expect("details present");
        assert_eq!(details["field"], "start_date");
        assert_eq!(details["code"], "invalid_timestamp");
        assert_eq!(details["value"], raw);
    }

    #[rstest]
    fn non_positive_ids_are_rejected() {
        let err = parse_user_id(0, USER_ID).expect_err("invalid id");
        let details = err.details().expect("details present");
        assert_eq!(details["field"], "user_id");
        assert_eq!(details["value"], 0);
        assert_eq!(details["code"], "invalid_id");
    }

    #[rstest]
    #[case(UserValidationError::InvalidEmail, "email")]
    #[case(UserValidationError::EmptyName, "name")]
    fn user_errors_point_at_fields(#[case] err: UserValidationError, #[case] field: &str) {
        let mapped = user_validation_error(err);
        assert_eq!(mapped.details().expect("details")["field"], field);
    }

    #[rstest]
    #[case(MedicineValidationError::EmptyDosage, "dosage")]
    #[case(MedicineValidationError::CannotClear { field: "frequency" }, "frequency")]
    #[case(MedicineValidationError::NegativeFrequency { value: -1 }, "frequency")]
    fn medicine_errors_point_at_fields(#[case] err: MedicineValidationError, #[case] field: &str) {
        let mapped = medicine_validation_error(err);
        assert_eq!(mapped.details().expect("details")["field"], field);
    }
}
